mod header;
mod many;
mod public_key;
mod signature;
mod user_id;

use std::io;

use bytes::Bytes;

pub use self::header::PacketHeader;
pub use self::many::PacketParser;
pub use self::public_key::PublicKey;
pub use self::signature::{Signature, SignatureType};
pub use self::user_id::UserId;

use crate::errors::Result;
use crate::ser::Serialize;
use crate::types::{PacketHeaderVersion, Tag};

/// A single raw packet: header plus body bytes.
#[derive(Clone, PartialEq, Eq, derive_more::Debug)]
pub struct Packet {
    header: PacketHeader,
    #[debug("{} bytes", body.len())]
    body: Bytes,
}

impl Packet {
    pub(crate) fn new(header: PacketHeader, body: Bytes) -> Self {
        Packet { header, body }
    }

    pub fn tag(&self) -> Tag {
        self.header.tag()
    }

    pub fn header(&self) -> PacketHeader {
        self.header
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_body(self) -> Bytes {
        self.body
    }
}

/// Writes a packet body with a new style header computed from its length.
pub fn write_packet<W: io::Write>(writer: &mut W, tag: Tag, body: &impl Serialize) -> Result<()> {
    let len = body.write_len();
    PacketHeaderVersion::New.write_header(writer, tag, len)?;
    body.to_writer(writer)
}

/// Number of bytes [`write_packet`] produces for the given body.
pub fn packet_write_len(body: &impl Serialize) -> usize {
    let len = body.write_len();
    PacketHeaderVersion::New.header_len(len) + len
}
