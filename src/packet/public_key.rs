use std::io;

use byteorder::{BigEndian, WriteBytesExt};
use bytes::Buf;
use chrono::{DateTime, TimeZone, Utc};
use md5::Md5;
use sha1::{Digest, Sha1};
use sha2::Sha256;

use crate::crypto::PublicKeyAlgorithm;
use crate::errors::{ensure, ensure_eq, format_err, unsupported_err, Error, Result};
use crate::packet::Packet;
use crate::parsing::BufParsing;
use crate::ser::Serialize;
use crate::types::{Fingerprint, KeyId, KeyVersion, PublicParams, Tag};

/// Public Key packet (Tag 6) and Public Subkey packet (Tag 14) body.
///
/// Ref: <https://www.rfc-editor.org/rfc/rfc9580.html#name-public-key-packet-type-id-6>
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PublicKey {
    version: KeyVersion,
    algorithm: PublicKeyAlgorithm,
    created_at: DateTime<Utc>,
    expiration: Option<u16>,
    public_params: PublicParams,
}

impl PublicKey {
    pub fn new(
        version: KeyVersion,
        algorithm: PublicKeyAlgorithm,
        created_at: DateTime<Utc>,
        expiration: Option<u16>,
        public_params: PublicParams,
    ) -> Result<Self> {
        ensure!(
            matches!(
                version,
                KeyVersion::V2 | KeyVersion::V3 | KeyVersion::V4 | KeyVersion::V6
            ),
            "unsupported key version {:?}",
            version
        );
        ensure!(
            expiration.is_none() || matches!(version, KeyVersion::V2 | KeyVersion::V3),
            "expiration days are only valid on v2 and v3 keys"
        );

        Ok(PublicKey {
            version,
            algorithm,
            created_at,
            expiration,
            public_params,
        })
    }

    /// Parses a public key packet body.
    pub fn from_buf<B: Buf>(mut i: B) -> Result<Self> {
        let version = i.read_u8().map(KeyVersion::from)?;
        match version {
            KeyVersion::V2 | KeyVersion::V3 => Self::from_buf_v2_v3(version, i),
            KeyVersion::V4 => Self::from_buf_v4(i),
            KeyVersion::V6 => Self::from_buf_v6(i),
            KeyVersion::V5 | KeyVersion::Other(_) => {
                unsupported_err!("key version {:?}", version);
            }
        }
    }

    fn from_buf_v2_v3<B: Buf>(version: KeyVersion, mut i: B) -> Result<Self> {
        let created_at = read_timestamp(&mut i)?;
        let exp = i.read_be_u16()?;
        let algorithm = i.read_u8().map(PublicKeyAlgorithm::from)?;
        let public_params = PublicParams::try_from_buf(algorithm, &mut i)?;
        ensure_eq!(i.remaining(), 0, "trailing bytes in key packet");

        Ok(PublicKey {
            version,
            algorithm,
            created_at,
            expiration: Some(exp),
            public_params,
        })
    }

    fn from_buf_v4<B: Buf>(mut i: B) -> Result<Self> {
        let created_at = read_timestamp(&mut i)?;
        let algorithm = i.read_u8().map(PublicKeyAlgorithm::from)?;
        let public_params = PublicParams::try_from_buf(algorithm, &mut i)?;
        ensure_eq!(i.remaining(), 0, "trailing bytes in key packet");

        Ok(PublicKey {
            version: KeyVersion::V4,
            algorithm,
            created_at,
            expiration: None,
            public_params,
        })
    }

    fn from_buf_v6<B: Buf>(mut i: B) -> Result<Self> {
        let created_at = read_timestamp(&mut i)?;
        let algorithm = i.read_u8().map(PublicKeyAlgorithm::from)?;

        // "scalar octet count for the following public key material"
        let len = i.read_be_u32()?;
        ensure!(len > 0, "key length must not be 0");
        let mut material = i.read_take(len as usize)?;
        let public_params = PublicParams::try_from_buf(algorithm, &mut material)?;
        ensure_eq!(material.remaining(), 0, "inconsistent key material length");
        ensure_eq!(i.remaining(), 0, "trailing bytes in key packet");

        Ok(PublicKey {
            version: KeyVersion::V6,
            algorithm,
            created_at,
            expiration: None,
            public_params,
        })
    }

    pub fn version(&self) -> KeyVersion {
        self.version
    }

    pub fn algorithm(&self) -> PublicKeyAlgorithm {
        self.algorithm
    }

    pub fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }

    /// v2/v3 only: days until expiration, 0 meaning never.
    pub fn expiration(&self) -> Option<u16> {
        self.expiration
    }

    pub fn public_params(&self) -> &PublicParams {
        &self.public_params
    }

    /// Is the key material of a kind this crate knows the structure of?
    pub fn is_supported(&self) -> bool {
        self.public_params.is_supported()
    }

    /// Calculates the fingerprint of this key.
    pub fn fingerprint(&self) -> Fingerprint {
        match self.version {
            KeyVersion::V2 | KeyVersion::V3 => {
                // MD5 over the raw key material bytes, without length prefixes
                let mut h = Md5::new();
                match &self.public_params {
                    PublicParams::RSA(params) => {
                        h.update(params.n.as_ref());
                        h.update(params.e.as_ref());
                    }
                    params => {
                        let buf = params.to_bytes().expect("serialize to vec");
                        h.update(&buf);
                    }
                }
                let digest = h.finalize();

                if self.version == KeyVersion::V2 {
                    Fingerprint::V2(digest.into())
                } else {
                    Fingerprint::V3(digest.into())
                }
            }
            KeyVersion::V4 => {
                // SHA1 over 0x99, the two-octet body length and the body
                let body = self.to_bytes().expect("serialize to vec");

                let mut h = Sha1::new();
                h.update([0x99]);
                h.update((body.len() as u16).to_be_bytes());
                h.update(&body);
                let digest = h.finalize();

                Fingerprint::V4(digest.into())
            }
            KeyVersion::V6 => {
                // SHA256 over 0x9B, the four-octet body length and the body
                let body = self.to_bytes().expect("serialize to vec");

                let mut h = Sha256::new();
                h.update([0x9B]);
                h.update((body.len() as u32).to_be_bytes());
                h.update(&body);
                let digest = h.finalize();

                Fingerprint::V6(digest.into())
            }
            KeyVersion::V5 | KeyVersion::Other(_) => {
                unreachable!("constructors reject unknown key versions")
            }
        }
    }

    /// The key id, derived from the fingerprint (or the RSA modulus for
    /// v2/v3 keys).
    pub fn key_id(&self) -> KeyId {
        match self.version {
            KeyVersion::V2 | KeyVersion::V3 => match &self.public_params {
                // the low 64 bits of the public modulus
                PublicParams::RSA(params) => {
                    let n = params.n.as_ref();
                    if n.len() >= 8 {
                        KeyId::from_slice(&n[n.len() - 8..]).expect("fixed size")
                    } else {
                        KeyId::from([0u8; 8])
                    }
                }
                _ => KeyId::from([0u8; 8]),
            },
            KeyVersion::V4 => {
                let f = self.fingerprint();
                let f = f.as_bytes();
                KeyId::from_slice(&f[f.len() - 8..]).expect("fixed size")
            }
            KeyVersion::V6 => {
                let f = self.fingerprint();
                KeyId::from_slice(&f.as_bytes()[..8]).expect("fixed size")
            }
            KeyVersion::V5 | KeyVersion::Other(_) => {
                unreachable!("constructors reject unknown key versions")
            }
        }
    }
}

fn read_timestamp<B: Buf>(mut i: B) -> Result<DateTime<Utc>> {
    i.read_be_u32()
        .map(|v| Utc.timestamp_opt(i64::from(v), 0).single())?
        .ok_or_else(|| format_err!("invalid created at timestamp"))
}

impl TryFrom<Packet> for PublicKey {
    type Error = Error;

    fn try_from(packet: Packet) -> Result<Self> {
        ensure!(
            matches!(packet.tag(), Tag::PublicKey | Tag::PublicSubkey),
            "invalid tag for public key packet: {:?}",
            packet.tag()
        );

        Self::from_buf(packet.into_body())
    }
}

impl Serialize for PublicKey {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(self.version.into())?;
        writer.write_u32::<BigEndian>(self.created_at.timestamp() as u32)?;

        match self.version {
            KeyVersion::V2 | KeyVersion::V3 => {
                writer.write_u16::<BigEndian>(self.expiration.unwrap_or(0))?;
                writer.write_u8(self.algorithm.into())?;
                self.public_params.to_writer(writer)?;
            }
            KeyVersion::V4 => {
                writer.write_u8(self.algorithm.into())?;
                self.public_params.to_writer(writer)?;
            }
            KeyVersion::V6 => {
                writer.write_u8(self.algorithm.into())?;
                writer.write_u32::<BigEndian>(self.public_params.write_len() as u32)?;
                self.public_params.to_writer(writer)?;
            }
            KeyVersion::V5 | KeyVersion::Other(_) => {
                unreachable!("constructors reject unknown key versions")
            }
        }

        Ok(())
    }

    fn write_len(&self) -> usize {
        let params_len = self.public_params.write_len();
        match self.version {
            KeyVersion::V2 | KeyVersion::V3 => 1 + 4 + 2 + 1 + params_len,
            KeyVersion::V4 => 1 + 4 + 1 + params_len,
            KeyVersion::V6 => 1 + 4 + 1 + 4 + params_len,
            KeyVersion::V5 | KeyVersion::Other(_) => {
                unreachable!("constructors reject unknown key versions")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use hex_literal::hex;

    use super::*;

    // v4 RSA key: created 2020-09-13, n = 0x01FF, e = 0x010001
    const RSA_KEY: [u8; 15] = hex!("045f5e100001000901ff0011010001");

    #[test]
    fn test_parse_v4_rsa() {
        let key = PublicKey::from_buf(&mut &RSA_KEY[..]).unwrap();

        assert_eq!(key.version(), KeyVersion::V4);
        assert_eq!(key.algorithm(), PublicKeyAlgorithm::RSA);
        assert_eq!(key.created_at().timestamp(), 1_600_000_000);
        assert_eq!(key.expiration(), None);
        assert!(key.is_supported());

        assert_eq!(key.to_bytes().unwrap(), RSA_KEY);
        assert_eq!(key.write_len(), RSA_KEY.len());
    }

    #[test]
    fn test_v4_fingerprint_and_key_id() {
        let key = PublicKey::from_buf(&mut &RSA_KEY[..]).unwrap();

        assert_eq!(
            key.fingerprint().as_bytes(),
            hex!("e2cb06c9a886be387af57fd03feba9b0d566e807")
        );
        assert_eq!(key.key_id().as_ref(), hex!("3feba9b0d566e807"));
    }

    #[test]
    fn test_parse_unknown_version() {
        let raw = hex!("635f5e100001");
        let err = PublicKey::from_buf(&mut &raw[..]).unwrap_err();
        assert!(matches!(err, Error::Unsupported { .. }));
    }

    #[test]
    fn test_parse_unknown_algorithm() {
        // algorithm 99, two opaque bytes of key material
        let raw = hex!("045f5e1000630102");
        let key = PublicKey::from_buf(&mut &raw[..]).unwrap();

        assert_eq!(key.algorithm(), PublicKeyAlgorithm::Unknown(99));
        assert!(!key.is_supported());
        assert_eq!(key.to_bytes().unwrap(), raw);
    }

    #[test]
    fn test_parse_truncated_material() {
        // RSA key whose modulus is cut short
        let raw = hex!("045f5e100001000901");
        let err = PublicKey::from_buf(&mut &raw[..]).unwrap_err();
        assert!(matches!(err, Error::PacketIncomplete { .. }));
    }
}
