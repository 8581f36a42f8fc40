use std::io;

use bytes::{Buf, Bytes};
use chrono::{DateTime, TimeZone, Utc};
use num_enum::{FromPrimitive, IntoPrimitive};

use crate::crypto::{HashAlgorithm, PublicKeyAlgorithm};
use crate::errors::{ensure, ensure_eq, unsupported_err, Error, Result};
use crate::packet::Packet;
use crate::parsing::BufParsing;
use crate::ser::Serialize;
use crate::types::{KeyId, Tag};

/// Signature types.
///
/// Ref: <https://www.rfc-editor.org/rfc/rfc9580.html#name-signature-types>
#[derive(Debug, PartialEq, Eq, Clone, Copy, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
#[non_exhaustive]
pub enum SignatureType {
    /// Signature of a binary document
    Binary = 0x00,
    /// Signature of a canonical text document
    Text = 0x01,
    Standalone = 0x02,
    /// Generic certification of a User ID and Public-Key packet
    CertGeneric = 0x10,
    /// Persona certification of a User ID and Public-Key packet
    CertPersona = 0x11,
    /// Casual certification of a User ID and Public-Key packet
    CertCasual = 0x12,
    /// Positive certification of a User ID and Public-Key packet
    CertPositive = 0x13,
    /// Subkey Binding Signature
    SubkeyBinding = 0x18,
    /// Primary Key Binding Signature
    KeyBinding = 0x19,
    /// Signature directly on a key
    Key = 0x1F,
    /// Key revocation signature
    KeyRevocation = 0x20,
    /// Subkey revocation signature
    SubkeyRevocation = 0x28,
    /// Certification revocation signature
    CertRevocation = 0x30,
    Timestamp = 0x40,
    /// Third-Party Confirmation signature
    ThirdParty = 0x50,

    #[num_enum(catch_all)]
    Other(u8),
}

impl SignatureType {
    pub fn is_certification(&self) -> bool {
        matches!(
            self,
            SignatureType::CertGeneric
                | SignatureType::CertPersona
                | SignatureType::CertCasual
                | SignatureType::CertPositive
        )
    }
}

/// Signature packet (Tag 2).
///
/// Parsed opportunistically: the framing fields and the subpackets we care
/// about (creation time, issuer) are decoded, the signature material itself
/// is kept as raw bytes and is never cryptographically verified.
///
/// Ref: <https://www.rfc-editor.org/rfc/rfc9580.html#name-signature-packet-type-id-2>
#[derive(Clone, PartialEq, Eq, derive_more::Debug)]
pub struct Signature {
    version: u8,
    typ: SignatureType,
    pub_alg: PublicKeyAlgorithm,
    hash_alg: HashAlgorithm,
    created: Option<DateTime<Utc>>,
    issuer: Option<KeyId>,
    #[debug("{} bytes", raw.len())]
    raw: Bytes,
}

impl Signature {
    /// Parses a signature packet body.
    pub fn from_bytes(body: Bytes) -> Result<Self> {
        let raw = body.clone();
        let mut i = body;

        let version = i.read_u8()?;
        match version {
            2 | 3 => {
                // one-octet length of the hashed material, must be 5
                let hashed_len = i.read_u8()?;
                ensure_eq!(hashed_len, 5, "invalid v{} hashed material length", version);

                let typ = SignatureType::from(i.read_u8()?);
                let created = Utc.timestamp_opt(i64::from(i.read_be_u32()?), 0).single();
                let issuer = KeyId::from(i.read_array::<8>()?);
                let pub_alg = i.read_u8().map(PublicKeyAlgorithm::from)?;
                let hash_alg = i.read_u8().map(HashAlgorithm::from)?;

                Ok(Signature {
                    version,
                    typ,
                    pub_alg,
                    hash_alg,
                    created,
                    issuer: Some(issuer),
                    raw,
                })
            }
            4 => {
                let typ = SignatureType::from(i.read_u8()?);
                let pub_alg = i.read_u8().map(PublicKeyAlgorithm::from)?;
                let hash_alg = i.read_u8().map(HashAlgorithm::from)?;

                let hashed_len = i.read_be_u16()?;
                let hashed = i.read_take(hashed_len.into())?;
                let unhashed_len = i.read_be_u16()?;
                let unhashed = i.read_take(unhashed_len.into())?;
                // the left 16 bits of the hash and the signature MPIs follow,
                // they are carried opaquely in `raw`

                let mut created = None;
                let mut issuer = None;
                scan_subpackets(hashed, &mut created, &mut issuer)?;
                if issuer.is_none() {
                    // GnuPG puts the issuer in the unhashed area
                    scan_subpackets(unhashed, &mut created, &mut issuer)?;
                }

                Ok(Signature {
                    version,
                    typ,
                    pub_alg,
                    hash_alg,
                    created,
                    issuer,
                    raw,
                })
            }
            6 => {
                // like v4, but with four-octet subpacket area lengths
                let typ = SignatureType::from(i.read_u8()?);
                let pub_alg = i.read_u8().map(PublicKeyAlgorithm::from)?;
                let hash_alg = i.read_u8().map(HashAlgorithm::from)?;

                let hashed_len = i.read_be_u32()?;
                let hashed = i.read_take(hashed_len as usize)?;
                let unhashed_len = i.read_be_u32()?;
                let unhashed = i.read_take(unhashed_len as usize)?;

                let mut created = None;
                let mut issuer = None;
                scan_subpackets(hashed, &mut created, &mut issuer)?;
                if issuer.is_none() {
                    scan_subpackets(unhashed, &mut created, &mut issuer)?;
                }

                Ok(Signature {
                    version,
                    typ,
                    pub_alg,
                    hash_alg,
                    created,
                    issuer,
                    raw,
                })
            }
            _ => {
                unsupported_err!("signature version {}", version);
            }
        }
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn typ(&self) -> SignatureType {
        self.typ
    }

    pub fn pub_alg(&self) -> PublicKeyAlgorithm {
        self.pub_alg
    }

    pub fn hash_alg(&self) -> HashAlgorithm {
        self.hash_alg
    }

    pub fn created(&self) -> Option<&DateTime<Utc>> {
        self.created.as_ref()
    }

    /// The key id of the issuing key, if the signature carries one.
    pub fn issuer(&self) -> Option<&KeyId> {
        self.issuer.as_ref()
    }
}

/// Walks a signature subpacket area, picking out creation time and issuer.
///
/// Ref: <https://www.rfc-editor.org/rfc/rfc9580.html#name-signature-subpacket-specifi>
fn scan_subpackets(
    mut area: Bytes,
    created: &mut Option<DateTime<Utc>>,
    issuer: &mut Option<KeyId>,
) -> Result<()> {
    while !area.is_empty() {
        let olen = area.read_u8()?;
        let len: usize = match olen {
            // One-Octet Lengths
            0..=191 => olen.into(),
            // Two-Octet Lengths
            192..=254 => {
                let a = area.read_u8()?;
                ((usize::from(olen) - 192) << 8) + 192 + usize::from(a)
            }
            // Five-Octet Lengths
            255 => area.read_be_u32()? as usize,
        };
        // the length includes the type octet
        ensure!(len > 0, "invalid subpacket length 0");

        let mut body = area.read_take(len)?;
        // the high bit flags the subpacket as critical
        let typ = body.read_u8()? & 0x7F;
        match typ {
            // Signature Creation Time
            2 => {
                if body.remaining() >= 4 {
                    *created = Utc.timestamp_opt(i64::from(body.read_be_u32()?), 0).single();
                }
            }
            // Issuer Key ID
            16 => {
                if body.remaining() >= 8 {
                    *issuer = Some(KeyId::from(body.read_array::<8>()?));
                }
            }
            _ => {}
        }
    }

    Ok(())
}

impl TryFrom<Packet> for Signature {
    type Error = Error;

    fn try_from(packet: Packet) -> Result<Self> {
        ensure!(
            packet.tag() == Tag::Signature,
            "invalid tag for signature packet: {:?}",
            packet.tag()
        );

        Self::from_bytes(packet.into_body())
    }
}

impl Serialize for Signature {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.raw)?;

        Ok(())
    }

    fn write_len(&self) -> usize {
        self.raw.len()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn v4_sig_body() -> Vec<u8> {
        let mut body = vec![
            0x04, // version
            0x13, // positive certification
            0x01, // RSA
            0x08, // SHA256
        ];
        // hashed area: creation time subpacket
        let hashed: &[u8] = &[0x05, 0x02, 0x5F, 0x5E, 0x10, 0x00];
        body.extend_from_slice(&(hashed.len() as u16).to_be_bytes());
        body.extend_from_slice(hashed);
        // unhashed area: issuer subpacket
        let unhashed: &[u8] = &[0x09, 0x10, 0xDE, 0xAD, 0xBE, 0xEF, 0x01, 0x02, 0x03, 0x04];
        body.extend_from_slice(&(unhashed.len() as u16).to_be_bytes());
        body.extend_from_slice(unhashed);
        // left 16 bits of the hash
        body.extend_from_slice(&[0xAB, 0xCD]);
        // dummy signature mpi
        body.extend_from_slice(&[0x00, 0x08, 0xFF]);
        body
    }

    #[test]
    fn test_parse_v4() {
        let body = v4_sig_body();
        let sig = Signature::from_bytes(body.clone().into()).unwrap();

        assert_eq!(sig.version(), 4);
        assert_eq!(sig.typ(), SignatureType::CertPositive);
        assert!(sig.typ().is_certification());
        assert_eq!(sig.pub_alg(), PublicKeyAlgorithm::RSA);
        assert_eq!(sig.hash_alg(), HashAlgorithm::Sha256);
        assert_eq!(sig.created().unwrap().timestamp(), 1_600_000_000);
        assert_eq!(
            sig.issuer().unwrap().as_ref(),
            &[0xDE, 0xAD, 0xBE, 0xEF, 0x01, 0x02, 0x03, 0x04]
        );

        // serialization re-emits the original bytes
        assert_eq!(sig.to_bytes().unwrap(), body);
    }

    #[test]
    fn test_parse_v3() {
        let body: &[u8] = &[
            0x03, // version
            0x05, // hashed material length
            0x10, // generic certification
            0x5F, 0x5E, 0x10, 0x00, // created
            0xDE, 0xAD, 0xBE, 0xEF, 0x01, 0x02, 0x03, 0x04, // issuer
            0x01, // RSA
            0x02, // SHA1
            0xAB, 0xCD, // left 16
            0x00, 0x08, 0xFF, // dummy mpi
        ];
        let sig = Signature::from_bytes(Bytes::from_static(body)).unwrap();

        assert_eq!(sig.version(), 3);
        assert_eq!(sig.typ(), SignatureType::CertGeneric);
        assert_eq!(sig.hash_alg(), HashAlgorithm::Sha1);
        assert_eq!(sig.created().unwrap().timestamp(), 1_600_000_000);
        assert!(sig.issuer().is_some());
    }

    #[test]
    fn test_parse_unknown_version() {
        let body = Bytes::from_static(&[0x07, 0x00]);
        let err = Signature::from_bytes(body).unwrap_err();
        assert!(matches!(err, Error::Unsupported { .. }));
    }

    #[test]
    fn test_truncated_subpacket_area() {
        let body = Bytes::from_static(&[
            0x04, 0x13, 0x01, 0x08, // framing
            0x00, 0x20, // hashed area claims 32 bytes
            0x05, 0x02, 0x5F, 0x5E, 0x10, 0x00, // only 6 present
        ]);
        let err = Signature::from_bytes(body).unwrap_err();
        assert!(matches!(err, Error::PacketIncomplete { .. }));
    }
}
