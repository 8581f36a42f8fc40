use std::io;

use byteorder::WriteBytesExt;
use bytes::Buf;

use crate::crypto::ecc_curve::{ecc_curve_from_oid, EccCurve};
use crate::errors::Result;
use crate::parsing::BufParsing;
use crate::ser::Serialize;
use crate::types::Mpi;

/// Legacy EdDSA public key material (algorithm 22).
///
/// Deprecated in RFC 9580 in favor of the dedicated Ed25519 algorithm.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct EddsaLegacyPublicParams {
    pub curve: EccCurve,
    pub p: Mpi,
}

impl EddsaLegacyPublicParams {
    pub fn try_from_buf<B: Buf>(mut i: B) -> Result<Self> {
        let curve_len = i.read_u8()?;
        let curve = ecc_curve_from_oid(&i.read_take(curve_len.into())?);
        let p = Mpi::from_buf(&mut i)?;

        Ok(EddsaLegacyPublicParams { curve, p })
    }
}

impl Serialize for EddsaLegacyPublicParams {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        let oid = self.curve.oid();
        writer.write_u8(oid.len() as u8)?;
        writer.write_all(oid)?;
        self.p.to_writer(writer)?;

        Ok(())
    }

    fn write_len(&self) -> usize {
        1 + self.curve.oid().len() + self.p.write_len()
    }
}
