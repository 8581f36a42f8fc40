use std::borrow::Cow;
use std::fmt;
use std::io;

use bytes::Bytes;

use crate::errors::{ensure, Error, Result};
use crate::packet::Packet;
use crate::ser::Serialize;
use crate::types::Tag;

/// User ID Packet (Tag 13)
///
/// The raw bytes are kept as is; OpenPGP does not mandate an encoding,
/// even though user ids are UTF-8 in practice.
///
/// Ref: <https://www.rfc-editor.org/rfc/rfc9580.html#name-user-id-packet-type-id-13>
#[derive(Clone, PartialEq, Eq)]
pub struct UserId(Bytes);

impl UserId {
    pub fn from_bytes(input: impl Into<Bytes>) -> Self {
        UserId(input.into())
    }

    pub fn from_str(input: &str) -> Self {
        UserId(input.as_bytes().to_vec().into())
    }

    /// The id, lossily converted if it is not valid utf-8.
    pub fn id(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }
}

impl TryFrom<Packet> for UserId {
    type Error = Error;

    fn try_from(packet: Packet) -> Result<Self> {
        ensure!(
            packet.tag() == Tag::UserId,
            "invalid tag for user id packet: {:?}",
            packet.tag()
        );

        Ok(UserId::from_bytes(packet.into_body()))
    }
}

impl Serialize for UserId {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.0)?;

        Ok(())
    }

    fn write_len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({:?})", self.id())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lossy_id() {
        let id = UserId::from_bytes(&b"alice <alice@example.org>"[..]);
        assert_eq!(id.id(), "alice <alice@example.org>");

        let id = UserId::from_bytes(&[0x61, 0xFF, 0x62][..]);
        assert_eq!(id.id(), "a\u{FFFD}b");
    }
}
