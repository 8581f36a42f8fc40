use bytes::Buf;

use crate::errors::{bail, unimplemented_err, unsupported_err, Result};
use crate::parsing::BufParsing;
use crate::ser::Serialize;
use crate::types::{PacketHeaderVersion, PacketLength, Tag};

/// Represents a packet header.
///
/// Ref: <https://www.rfc-editor.org/rfc/rfc9580.html#name-packet-headers>
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PacketHeader {
    version: PacketHeaderVersion,
    tag: Tag,
    length: PacketLength,
}

impl PacketHeader {
    /// Parse a single packet header from the given buffer.
    pub fn from_buf<B: Buf>(mut i: B) -> Result<Self> {
        let header = i.read_u8()?;

        let first_two_bits = header & 0b1100_0000;
        match first_two_bits {
            0b1100_0000 => {
                // new format, tag in the low six bits
                let tag = Tag::from(header & 0b0011_1111);
                let olen = i.read_u8()?;
                let length = match olen {
                    // One-Octet Lengths
                    0..=191 => PacketLength::Fixed(olen.into()),
                    // Two-Octet Lengths
                    192..=223 => {
                        let a = i.read_u8()?;
                        let l = ((u32::from(olen) - 192) << 8) + 192 + u32::from(a);
                        PacketLength::Fixed(l)
                    }
                    // Partial Body Lengths are not valid for key material
                    224..=254 => {
                        unsupported_err!("partial body length for packet {:?}", tag);
                    }
                    // Five-Octet Lengths
                    255 => PacketLength::Fixed(i.read_be_u32()?),
                };
                Ok(PacketHeader {
                    version: PacketHeaderVersion::New,
                    tag,
                    length,
                })
            }
            0b1000_0000 => {
                // old format, tag in bits 5-2, length type in the low two bits
                let tag = Tag::from((header & 0b0011_1100) >> 2);
                let length = match header & 0b0000_0011 {
                    // One-Octet Lengths
                    0 => PacketLength::Fixed(i.read_u8()?.into()),
                    // Two-Octet Lengths
                    1 => PacketLength::Fixed(i.read_be_u16()?.into()),
                    // Four-Octet Lengths
                    2 => PacketLength::Fixed(i.read_be_u32()?),
                    3 => PacketLength::Indeterminate,
                    _ => unreachable!("old packet length type is only 2 bits"),
                };
                Ok(PacketHeader {
                    version: PacketHeaderVersion::Old,
                    tag,
                    length,
                })
            }
            _ => {
                bail!("unknown packet header version {:b}", header);
            }
        }
    }

    /// Creates a `New` style packet header.
    pub fn new_fixed(tag: Tag, length: u32) -> Self {
        PacketHeader {
            version: PacketHeaderVersion::New,
            tag,
            length: PacketLength::Fixed(length),
        }
    }

    /// Returns the packet header version.
    pub const fn version(&self) -> PacketHeaderVersion {
        self.version
    }

    /// Returns the packet length.
    pub const fn packet_length(&self) -> PacketLength {
        self.length
    }

    /// Returns the packet tag.
    pub const fn tag(&self) -> Tag {
        self.tag
    }
}

impl Serialize for PacketHeader {
    fn to_writer<W: std::io::Write>(&self, writer: &mut W) -> Result<()> {
        match self.length {
            PacketLength::Fixed(len) => self.version.write_header(writer, self.tag, len as usize),
            PacketLength::Indeterminate => {
                unimplemented_err!("indeterminate length headers are not written");
            }
        }
    }

    fn write_len(&self) -> usize {
        match self.length {
            PacketLength::Fixed(len) => self.version.header_len(len as usize),
            PacketLength::Indeterminate => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_new_format_two_octet() {
        // # off=5053201 ctb=d1 tag=17 hlen=6 plen=4973 new-ctb
        let raw = hex::decode("d1ff0000136d").unwrap();
        let header = PacketHeader::from_buf(&mut &raw[..]).unwrap();

        assert_eq!(header.version(), PacketHeaderVersion::New);
        assert_eq!(header.tag(), Tag::UserAttribute);
        assert_eq!(header.packet_length(), PacketLength::Fixed(4973));
    }

    #[test]
    fn test_old_format() {
        // public key packet, one octet length 147
        let raw = hex::decode("9893").unwrap();
        let header = PacketHeader::from_buf(&mut &raw[..]).unwrap();

        assert_eq!(header.version(), PacketHeaderVersion::Old);
        assert_eq!(header.tag(), Tag::PublicKey);
        assert_eq!(header.packet_length(), PacketLength::Fixed(147));

        // public subkey packet, two octet length 525
        let raw = hex::decode("b9020d").unwrap();
        let header = PacketHeader::from_buf(&mut &raw[..]).unwrap();

        assert_eq!(header.version(), PacketHeaderVersion::Old);
        assert_eq!(header.tag(), Tag::PublicSubkey);
        assert_eq!(header.packet_length(), PacketLength::Fixed(525));
    }

    #[test]
    fn test_indeterminate_length() {
        let raw = [0b1000_1011u8];
        let header = PacketHeader::from_buf(&mut &raw[..]).unwrap();
        assert_eq!(header.tag(), Tag::CompressedData);
        assert_eq!(header.packet_length(), PacketLength::Indeterminate);
    }

    #[test]
    fn test_partial_length_rejected() {
        // new format literal data with a partial length octet
        let raw = [0b1100_1011u8, 0xE0];
        assert!(PacketHeader::from_buf(&mut &raw[..]).is_err());
    }

    #[test]
    fn test_not_a_packet() {
        let raw = [0b0010_0000u8, 0x01];
        assert!(PacketHeader::from_buf(&mut &raw[..]).is_err());
    }

    proptest! {
        #[test]
        fn header_roundtrip(tag_raw in 1u8..22, len in 1u32..100_000) {
            let header = PacketHeader::new_fixed(Tag::from(tag_raw), len);

            let mut buf = Vec::new();
            header.to_writer(&mut buf).unwrap();
            prop_assert_eq!(buf.len(), header.write_len());

            let back = PacketHeader::from_buf(&mut &buf[..]).unwrap();
            prop_assert_eq!(header, back);
        }
    }
}
