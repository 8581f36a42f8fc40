use bytes::{Buf, Bytes};
use log::debug;

use crate::errors::Result;
use crate::packet::{Packet, PacketHeader};
use crate::parsing::BufParsing;
use crate::types::PacketLength;

/// Parses raw packets from an in-memory buffer, one at a time.
///
/// Body bytes are sliced out of the input without copying. The iterator
/// stops after the first error, as the packet boundary is lost at that
/// point.
#[derive(Debug)]
pub struct PacketParser {
    input: Bytes,
    failed: bool,
}

impl PacketParser {
    pub fn new(input: impl Into<Bytes>) -> Self {
        PacketParser {
            input: input.into(),
            failed: false,
        }
    }

    fn next_packet(&mut self) -> Result<Packet> {
        let header = PacketHeader::from_buf(&mut self.input)?;
        let len = match header.packet_length() {
            PacketLength::Fixed(len) => len as usize,
            PacketLength::Indeterminate => self.input.remaining(),
        };
        let body = self.input.read_take(len)?;
        debug!("-- parsed packet {:?} ({} bytes) --", header.tag(), len);

        Ok(Packet::new(header, body))
    }
}

impl Iterator for PacketParser {
    type Item = Result<Packet>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.input.is_empty() {
            return None;
        }

        let res = self.next_packet();
        if res.is_err() {
            self.failed = true;
        }

        Some(res)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::errors::Error;
    use crate::types::Tag;

    #[test]
    fn test_parse_two_packets() {
        // marker packet "PGP" followed by a user id packet
        let raw: Vec<u8> = vec![
            0xCA, 0x03, b'P', b'G', b'P', // marker
            0xCD, 0x05, b'a', b'l', b'i', b'c', b'e', // user id
        ];

        let packets = PacketParser::new(raw)
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(packets.len(), 2);
        assert_eq!(packets[0].tag(), Tag::Marker);
        assert_eq!(packets[1].tag(), Tag::UserId);
        assert_eq!(packets[1].body().as_ref(), b"alice");
    }

    #[test]
    fn test_truncated_packet() {
        // user id packet declaring 5 bytes, with only 3 available
        let raw: Vec<u8> = vec![0xCD, 0x05, b'a', b'l', b'i'];

        let mut parser = PacketParser::new(raw);
        let err = parser.next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            Error::PacketIncomplete {
                needed: 5,
                remaining: 3
            }
        ));

        // the parser does not resume after an error
        assert!(parser.next().is_none());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(PacketParser::new(Bytes::new()).count(), 0);
    }
}
