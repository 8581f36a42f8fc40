use std::io;

use byteorder::WriteBytesExt;
use bytes::Buf;

use crate::crypto::ecc_curve::{ecc_curve_from_oid, EccCurve};
use crate::errors::Result;
use crate::parsing::BufParsing;
use crate::ser::Serialize;
use crate::types::Mpi;

/// ECDSA public key material: the curve OID and the public point.
///
/// Ref: <https://www.rfc-editor.org/rfc/rfc9580.html#name-algorithm-specific-part-for-ec>
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct EcdsaPublicParams {
    pub curve: EccCurve,
    pub p: Mpi,
}

impl EcdsaPublicParams {
    pub fn try_from_buf<B: Buf>(mut i: B) -> Result<Self> {
        // a one-octet size of the following field
        let curve_len = i.read_u8()?;
        // octets representing a curve OID
        let curve = ecc_curve_from_oid(&i.read_take(curve_len.into())?);
        // MPI of an EC point representing a public key
        let p = Mpi::from_buf(&mut i)?;

        Ok(EcdsaPublicParams { curve, p })
    }
}

impl Serialize for EcdsaPublicParams {
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

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_parse_p256() {
        // oid len | P-256 oid | MPI with a 3-octet dummy point
        let raw = [
            0x08, 0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x03, 0x01, 0x07, 0x00, 0x12, 0x02, 0x01, 0x03,
        ];
        let params = EcdsaPublicParams::try_from_buf(&mut &raw[..]).unwrap();

        assert_eq!(params.curve, EccCurve::P256);
        assert_eq!(params.p.as_ref(), &[0x02, 0x01, 0x03]);
        assert_eq!(params.to_bytes().unwrap(), raw);
    }
}
