use std::io;

use bytes::Buf;

use crate::errors::Result;
use crate::parsing::BufParsing;
use crate::ser::Serialize;

/// Ed25519 public key material (RFC 9580): 32 raw octets.
#[derive(PartialEq, Eq, Clone, derive_more::Debug)]
pub struct Ed25519PublicParams {
    #[debug("{}", hex::encode(key))]
    pub key: [u8; 32],
}

impl Ed25519PublicParams {
    pub fn try_from_buf<B: Buf>(mut i: B) -> Result<Self> {
        let key = i.read_array::<32>()?;

        Ok(Ed25519PublicParams { key })
    }
}

impl Serialize for Ed25519PublicParams {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.key)?;

        Ok(())
    }

    fn write_len(&self) -> usize {
        32
    }
}
