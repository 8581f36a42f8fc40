use std::io;

use bytes::{Buf, Bytes};

use crate::crypto::public_key::PublicKeyAlgorithm;
use crate::errors::Result;
use crate::parsing::BufParsing;
use crate::ser::Serialize;

mod dsa;
mod ecdh;
mod ecdsa;
mod ed25519;
mod eddsa_legacy;
mod elgamal;
mod rsa;
mod x25519;

pub use self::dsa::DsaPublicParams;
pub use self::ecdh::EcdhPublicParams;
pub use self::ecdsa::EcdsaPublicParams;
pub use self::ed25519::Ed25519PublicParams;
pub use self::eddsa_legacy::EddsaLegacyPublicParams;
pub use self::elgamal::ElgamalPublicParams;
pub use self::rsa::RsaPublicParams;
pub use self::x25519::X25519PublicParams;

/// Represent the public parameters for the different algorithms.
#[derive(PartialEq, Eq, Clone, derive_more::Debug)]
pub enum PublicParams {
    RSA(RsaPublicParams),
    DSA(DsaPublicParams),
    ECDSA(EcdsaPublicParams),
    ECDH(EcdhPublicParams),
    Elgamal(ElgamalPublicParams),
    EdDSALegacy(EddsaLegacyPublicParams),
    Ed25519(Ed25519PublicParams),
    X25519(X25519PublicParams),
    /// Key material belonging to an algorithm we do not know how to parse.
    /// The packet framing bounds the raw data, so it is kept opaquely.
    Unknown {
        #[debug("{}", hex::encode(data))]
        data: Bytes,
    },
}

impl PublicParams {
    /// Parses the public parameters of a key, dispatching on the algorithm.
    pub fn try_from_buf<B: Buf>(typ: PublicKeyAlgorithm, mut i: B) -> Result<PublicParams> {
        match typ {
            PublicKeyAlgorithm::RSA
            | PublicKeyAlgorithm::RSAEncrypt
            | PublicKeyAlgorithm::RSASign => {
                let params = RsaPublicParams::try_from_buf(i)?;
                Ok(PublicParams::RSA(params))
            }
            PublicKeyAlgorithm::DSA => {
                let params = DsaPublicParams::try_from_buf(i)?;
                Ok(PublicParams::DSA(params))
            }
            PublicKeyAlgorithm::ECDSA => {
                let params = EcdsaPublicParams::try_from_buf(i)?;
                Ok(PublicParams::ECDSA(params))
            }
            PublicKeyAlgorithm::ECDH => {
                let params = EcdhPublicParams::try_from_buf(i)?;
                Ok(PublicParams::ECDH(params))
            }
            PublicKeyAlgorithm::Elgamal | PublicKeyAlgorithm::ElgamalSign => {
                let params = ElgamalPublicParams::try_from_buf(i)?;
                Ok(PublicParams::Elgamal(params))
            }
            PublicKeyAlgorithm::EdDSALegacy => {
                let params = EddsaLegacyPublicParams::try_from_buf(i)?;
                Ok(PublicParams::EdDSALegacy(params))
            }
            PublicKeyAlgorithm::Ed25519 => {
                let params = Ed25519PublicParams::try_from_buf(i)?;
                Ok(PublicParams::Ed25519(params))
            }
            PublicKeyAlgorithm::X25519 => {
                let params = X25519PublicParams::try_from_buf(i)?;
                Ok(PublicParams::X25519(params))
            }
            PublicKeyAlgorithm::DiffieHellman
            | PublicKeyAlgorithm::X448
            | PublicKeyAlgorithm::Ed448
            | PublicKeyAlgorithm::Unknown(_) => Ok(PublicParams::Unknown { data: i.rest() }),
        }
    }

    /// Is this key material of a kind this crate knows the structure of?
    pub fn is_supported(&self) -> bool {
        !matches!(self, PublicParams::Unknown { .. })
    }
}

impl Serialize for PublicParams {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            PublicParams::RSA(params) => params.to_writer(writer),
            PublicParams::DSA(params) => params.to_writer(writer),
            PublicParams::ECDSA(params) => params.to_writer(writer),
            PublicParams::ECDH(params) => params.to_writer(writer),
            PublicParams::Elgamal(params) => params.to_writer(writer),
            PublicParams::EdDSALegacy(params) => params.to_writer(writer),
            PublicParams::Ed25519(params) => params.to_writer(writer),
            PublicParams::X25519(params) => params.to_writer(writer),
            PublicParams::Unknown { data } => {
                writer.write_all(data)?;
                Ok(())
            }
        }
    }

    fn write_len(&self) -> usize {
        match self {
            PublicParams::RSA(params) => params.write_len(),
            PublicParams::DSA(params) => params.write_len(),
            PublicParams::ECDSA(params) => params.write_len(),
            PublicParams::ECDH(params) => params.write_len(),
            PublicParams::Elgamal(params) => params.write_len(),
            PublicParams::EdDSALegacy(params) => params.write_len(),
            PublicParams::Ed25519(params) => params.write_len(),
            PublicParams::X25519(params) => params.write_len(),
            PublicParams::Unknown { data } => data.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_unknown_algorithm_is_opaque() {
        let data = Bytes::from_static(&[1, 2, 3, 4]);
        let params =
            PublicParams::try_from_buf(PublicKeyAlgorithm::Unknown(99), &mut data.clone()).unwrap();

        assert!(!params.is_supported());
        assert_eq!(params.to_bytes().unwrap(), data.as_ref());
    }
}
