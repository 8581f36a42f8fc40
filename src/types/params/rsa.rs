use std::io;

use bytes::Buf;

use crate::errors::Result;
use crate::ser::Serialize;
use crate::types::Mpi;

/// RSA public key material: modulus and public exponent.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RsaPublicParams {
    pub n: Mpi,
    pub e: Mpi,
}

impl RsaPublicParams {
    pub fn try_from_buf<B: Buf>(mut i: B) -> Result<Self> {
        let n = Mpi::from_buf(&mut i)?;
        let e = Mpi::from_buf(&mut i)?;

        Ok(RsaPublicParams { n, e })
    }

    /// Size of the modulus, in bits.
    pub fn modulus_bits(&self) -> usize {
        self.n.bits()
    }
}

impl Serialize for RsaPublicParams {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        self.n.to_writer(writer)?;
        self.e.to_writer(writer)?;

        Ok(())
    }

    fn write_len(&self) -> usize {
        self.n.write_len() + self.e.write_len()
    }
}
