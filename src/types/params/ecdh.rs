use std::io;

use byteorder::WriteBytesExt;
use bytes::Buf;

use crate::crypto::ecc_curve::{ecc_curve_from_oid, EccCurve};
use crate::crypto::{HashAlgorithm, SymmetricKeyAlgorithm};
use crate::errors::{ensure_eq, Result};
use crate::parsing::BufParsing;
use crate::ser::Serialize;
use crate::types::Mpi;

/// ECDH public key material: curve, public point and the KDF parameters.
///
/// Ref: <https://www.rfc-editor.org/rfc/rfc9580.html#name-algorithm-specific-part-for-ecdh>
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct EcdhPublicParams {
    pub curve: EccCurve,
    pub p: Mpi,
    pub hash: HashAlgorithm,
    pub alg_sym: SymmetricKeyAlgorithm,
}

impl EcdhPublicParams {
    pub fn try_from_buf<B: Buf>(mut i: B) -> Result<Self> {
        let curve_len = i.read_u8()?;
        let curve = ecc_curve_from_oid(&i.read_take(curve_len.into())?);
        let p = Mpi::from_buf(&mut i)?;

        // KDF parameters: a one-octet size, a one-octet reserved value (1),
        // the KDF hash algorithm and the KEK symmetric algorithm.
        let kdf_len = i.read_u8()?;
        ensure_eq!(kdf_len, 3, "invalid KDF parameter field length");
        let version = i.read_u8()?;
        ensure_eq!(version, 1, "invalid KDF parameter version");
        let hash = i.read_u8()?.into();
        let alg_sym = i.read_u8()?.into();

        Ok(EcdhPublicParams {
            curve,
            p,
            hash,
            alg_sym,
        })
    }
}

impl Serialize for EcdhPublicParams {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        let oid = self.curve.oid();
        writer.write_u8(oid.len() as u8)?;
        writer.write_all(oid)?;
        self.p.to_writer(writer)?;

        writer.write_u8(3)?;
        writer.write_u8(1)?;
        writer.write_u8(self.hash.into())?;
        writer.write_u8(self.alg_sym.into())?;

        Ok(())
    }

    fn write_len(&self) -> usize {
        1 + self.curve.oid().len() + self.p.write_len() + 4
    }
}
