use std::io;

use bytes::Buf;

use crate::errors::Result;
use crate::ser::Serialize;
use crate::types::Mpi;

/// DSA public key material.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DsaPublicParams {
    pub p: Mpi,
    pub q: Mpi,
    pub g: Mpi,
    pub y: Mpi,
}

impl DsaPublicParams {
    pub fn try_from_buf<B: Buf>(mut i: B) -> Result<Self> {
        let p = Mpi::from_buf(&mut i)?;
        let q = Mpi::from_buf(&mut i)?;
        let g = Mpi::from_buf(&mut i)?;
        let y = Mpi::from_buf(&mut i)?;

        Ok(DsaPublicParams { p, q, g, y })
    }
}

impl Serialize for DsaPublicParams {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        self.p.to_writer(writer)?;
        self.q.to_writer(writer)?;
        self.g.to_writer(writer)?;
        self.y.to_writer(writer)?;

        Ok(())
    }

    fn write_len(&self) -> usize {
        self.p.write_len() + self.q.write_len() + self.g.write_len() + self.y.write_len()
    }
}
