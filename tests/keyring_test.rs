use std::fs;

use bytes::Bytes;
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

use pgp_keyring::armor::{self, BlockType};
use pgp_keyring::crypto::{EccCurve, HashAlgorithm, PublicKeyAlgorithm, SymmetricKeyAlgorithm};
use pgp_keyring::errors::Error;
use pgp_keyring::packet::{write_packet, PublicKey, SignatureType, UserId};
use pgp_keyring::types::{KeyVersion, Mpi, PublicParams, RsaPublicParams, Tag};
use pgp_keyring::KeyRing;

fn read_fixture(name: &str) -> String {
    fs::read_to_string(format!("./tests/unit-tests/{name}")).expect("missing fixture")
}

#[test]
fn test_portwood_armor_block() {
    let _ = pretty_env_logger::try_init();
    let input = read_fixture("portwood.asc");

    let block = armor::decode_str(&input).unwrap();

    assert_eq!(block.typ, BlockType::PublicKey);
    assert_eq!(block.headers["Version"], vec!["SKS 1.1.5".to_string()]);
    assert_eq!(
        block.headers["Comment"],
        vec!["Hostname: pgp.mit.edu".to_string()]
    );
    assert_eq!(block.payload.len(), 2612);
    assert_eq!(block.checksum, Some(0x0066_3ABF));
}

#[test]
fn test_portwood_keyring() {
    let _ = pretty_env_logger::try_init();
    let input = read_fixture("portwood.asc");

    let ring = KeyRing::from_armor_str(&input).unwrap();

    assert_eq!(ring.len(), 1);
    assert!(ring.skipped().is_empty());

    let key = &ring.keys()[0];
    assert_eq!(key.version(), KeyVersion::V4);
    assert_eq!(key.algorithm(), PublicKeyAlgorithm::ECDSA);
    assert_eq!(key.created_at().timestamp(), 1_433_446_098);
    assert_eq!(
        hex::encode(key.fingerprint().as_bytes()),
        "77d4529f2cefb65f878086f12875d7c7398ecfc4"
    );
    assert_eq!(hex::encode(key.key_id().as_ref()), "2875d7c7398ecfc4");

    match key.primary_key.public_params() {
        PublicParams::ECDSA(params) => {
            assert_eq!(params.curve, EccCurve::P521);
        }
        other => panic!("unexpected params: {other:?}"),
    }

    // exactly two user ids, each carrying two certifications by the key itself
    assert_eq!(key.users.len(), 2);
    assert_eq!(
        key.users[0].id.id(),
        "Charles R. Portwood II <charlesportwoodii@erianna.com>"
    );
    assert_eq!(
        key.users[1].id.id(),
        "Charles R. Portwood II <charlesportwoodii@ethreal.net>"
    );
    for user in &key.users {
        assert_eq!(user.signatures.len(), 2);
        for sig in &user.signatures {
            assert!(sig.typ().is_certification());
            assert_eq!(sig.pub_alg(), PublicKeyAlgorithm::ECDSA);
            assert_eq!(sig.hash_alg(), HashAlgorithm::Sha512);
            assert_eq!(sig.issuer(), Some(&key.key_id()));
        }
    }

    assert!(key.revocation_signatures.is_empty());
    assert!(key.direct_signatures.is_empty());

    // an ECDH and an RSA subkey, each with a binding signature
    assert_eq!(key.public_subkeys.len(), 2);

    let ecdh = &key.public_subkeys[0];
    assert_eq!(ecdh.algorithm(), PublicKeyAlgorithm::ECDH);
    assert_eq!(
        hex::encode(ecdh.fingerprint().as_bytes()),
        "a591bc03ee31e041f33b392c5ddae4d4676294c4"
    );
    match ecdh.key.public_params() {
        PublicParams::ECDH(params) => {
            assert_eq!(params.curve, EccCurve::P521);
            assert_eq!(params.hash, HashAlgorithm::Sha512);
            assert_eq!(params.alg_sym, SymmetricKeyAlgorithm::AES256);
        }
        other => panic!("unexpected params: {other:?}"),
    }

    let rsa = &key.public_subkeys[1];
    assert_eq!(rsa.algorithm(), PublicKeyAlgorithm::RSA);
    assert_eq!(
        hex::encode(rsa.fingerprint().as_bytes()),
        "359f463e811bcb6c5dce8183c3d841d57c80a3e0"
    );
    match rsa.key.public_params() {
        PublicParams::RSA(params) => {
            assert_eq!(params.modulus_bits(), 4096);
        }
        other => panic!("unexpected params: {other:?}"),
    }

    for subkey in &key.public_subkeys {
        assert_eq!(subkey.signatures.len(), 1);
        assert_eq!(subkey.signatures[0].typ(), SignatureType::SubkeyBinding);
    }
}

#[test]
fn test_portwood_binary_matches_armored() {
    let input = read_fixture("portwood.asc");

    let block = armor::decode_str(&input).unwrap();
    let from_binary = KeyRing::from_bytes(block.payload).unwrap();
    let from_armor = KeyRing::from_armor_str(&input).unwrap();

    assert_eq!(from_binary, from_armor);
}

#[test]
fn test_roundtrip() {
    let _ = pretty_env_logger::try_init();
    let input = read_fixture("portwood.asc");

    let ring = KeyRing::from_armor_str(&input).unwrap();
    let armored = ring.to_armored_string(None).unwrap();
    let ring2 = KeyRing::from_armor_str(&armored).unwrap();

    assert_eq!(ring.len(), ring2.len());
    for (a, b) in ring.keys().iter().zip(ring2.keys()) {
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(
            a.users.iter().map(|u| u.id.id()).collect::<Vec<_>>(),
            b.users.iter().map(|u| u.id.id()).collect::<Vec<_>>()
        );
    }
    assert_eq!(ring, ring2);
}

#[test]
fn test_checksum_sensitivity() {
    let input = read_fixture("portwood.asc");

    // flip a character in the base64 body without touching the checksum line
    let corrupted = input.replace("JyI7k2BJ", "JyI7k2BK");
    assert_ne!(corrupted, input);

    let err = KeyRing::from_armor_str(&corrupted).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidChecksum {
            expected: 0x0066_3ABF,
            ..
        }
    ));
}

#[test]
fn test_truncated_payload() {
    let input = read_fixture("portwood.asc");
    let payload = armor::decode_str(&input).unwrap().payload;

    // cut inside the final signature packet
    let err = KeyRing::from_bytes(payload.slice(..2000)).unwrap_err();
    assert!(matches!(err, Error::PacketIncomplete { .. }));

    // cut inside a packet header
    let err = KeyRing::from_bytes(payload.slice(..150)).unwrap_err();
    assert!(matches!(err, Error::PacketIncomplete { .. }));
}

#[test]
fn test_empty_input_is_an_error() {
    let err = KeyRing::from_armor_str("").unwrap_err();
    assert!(matches!(err, Error::InvalidArmorWrappers));
}

#[test]
fn test_empty_payload_is_an_empty_ring() {
    let ring = KeyRing::from_bytes(Bytes::new()).unwrap();
    assert!(ring.is_empty());
    assert!(ring.skipped().is_empty());
}

fn test_key(algorithm: PublicKeyAlgorithm, params: PublicParams) -> PublicKey {
    let created_at = Utc.timestamp_opt(1_600_000_000, 0).single().unwrap();
    PublicKey::new(KeyVersion::V4, algorithm, created_at, None, params).unwrap()
}

fn rsa_params(seed: u8) -> PublicParams {
    PublicParams::RSA(RsaPublicParams {
        n: Mpi::from_slice(&[seed, 0x01, 0xFF]),
        e: Mpi::from_slice(&[0x01, 0x00, 0x01]),
    })
}

#[test]
fn test_multi_key_tolerance() {
    let _ = pretty_env_logger::try_init();

    // three keys, the second with an algorithm id we do not recognize
    let keys = [
        (
            test_key(PublicKeyAlgorithm::RSA, rsa_params(0x11)),
            "first <first@example.org>",
        ),
        (
            test_key(
                PublicKeyAlgorithm::Unknown(99),
                PublicParams::Unknown {
                    data: Bytes::from_static(&[0xAA, 0xBB, 0xCC]),
                },
            ),
            "second <second@example.org>",
        ),
        (
            test_key(PublicKeyAlgorithm::RSA, rsa_params(0x33)),
            "third <third@example.org>",
        ),
    ];

    let mut buf = Vec::new();
    for (key, uid) in &keys {
        write_packet(&mut buf, Tag::PublicKey, key).unwrap();
        write_packet(&mut buf, Tag::UserId, &UserId::from_str(uid)).unwrap();
    }

    let ring = KeyRing::from_bytes(buf).unwrap();

    assert_eq!(ring.len(), 2);
    assert_eq!(ring.keys()[0].fingerprint(), keys[0].0.fingerprint());
    assert_eq!(ring.keys()[1].fingerprint(), keys[2].0.fingerprint());
    assert_eq!(ring.keys()[0].users[0].id.id(), "first <first@example.org>");
    assert_eq!(ring.keys()[1].users[0].id.id(), "third <third@example.org>");

    // the bad key is reported, with its position and cause
    assert_eq!(ring.skipped().len(), 1);
    assert_eq!(ring.skipped()[0].index, 1);
    assert!(ring.skipped()[0].reason.contains("99"));
}

#[test]
fn test_all_keys_failed_is_not_empty_input() {
    let key = test_key(
        PublicKeyAlgorithm::Unknown(42),
        PublicParams::Unknown {
            data: Bytes::from_static(&[0x01]),
        },
    );

    let mut buf = Vec::new();
    write_packet(&mut buf, Tag::PublicKey, &key).unwrap();

    let ring = KeyRing::from_bytes(buf).unwrap();
    assert_eq!(ring.len(), 0);
    assert_eq!(ring.skipped().len(), 1);
}

#[test]
fn test_stray_packets_are_skipped() {
    let input = read_fixture("portwood.asc");
    let payload = armor::decode_str(&input).unwrap().payload;

    // a marker packet before the actual key material
    let mut buf = vec![0xCA, 0x03, b'P', b'G', b'P'];
    buf.extend_from_slice(&payload);

    let ring = KeyRing::from_bytes(buf).unwrap();
    assert_eq!(ring.len(), 1);
}

#[test]
fn test_signature_block_is_rejected() {
    let c = "-----BEGIN PGP SIGNATURE-----\n\
         \n\
         aGVsbG8gd29ybGQ=\n\
         -----END PGP SIGNATURE-----\n";

    assert!(KeyRing::from_armor_str(c).is_err());
}

#[test]
fn test_synthetic_roundtrip() {
    let key = test_key(PublicKeyAlgorithm::RSA, rsa_params(0x44));
    let mut buf = Vec::new();
    write_packet(&mut buf, Tag::PublicKey, &key).unwrap();
    write_packet(
        &mut buf,
        Tag::UserId,
        &UserId::from_str("only <only@example.org>"),
    )
    .unwrap();

    let ring = KeyRing::from_bytes(buf).unwrap();
    let armored = ring.to_armored_string(None).unwrap();
    let ring2 = KeyRing::from_armor_str(&armored).unwrap();

    assert_eq!(ring, ring2);
}
