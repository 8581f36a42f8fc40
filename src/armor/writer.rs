use std::collections::BTreeMap;
use std::hash::Hasher;
use std::io::Write;

use base64::engine::{general_purpose::STANDARD, Engine as _};
use crc24::Crc24Hasher;

use crate::armor::BlockType;
use crate::errors::Result;
use crate::ser::Serialize;

/// Number of base64 characters per armor line.
const LINE_LENGTH: usize = 64;

/// Writes `source` as an ASCII armored block, including the CRC24 checksum
/// line.
pub fn write(
    source: &impl Serialize,
    typ: BlockType,
    writer: &mut impl Write,
    headers: Option<&BTreeMap<String, String>>,
) -> Result<()> {
    // armor header
    writer.write_all(b"-----BEGIN ")?;
    write!(writer, "{typ}")?;
    writer.write_all(b"-----\n")?;

    // armor headers
    if let Some(headers) = headers {
        for (key, value) in headers.iter() {
            writer.write_all(key.as_bytes())?;
            writer.write_all(b": ")?;
            writer.write_all(value.as_bytes())?;
            writer.write_all(b"\n")?;
        }
    }

    writer.write_all(b"\n")?;

    // body
    let body = source.to_bytes()?;
    let encoded = STANDARD.encode(&body);
    for chunk in encoded.as_bytes().chunks(LINE_LENGTH) {
        writer.write_all(chunk)?;
        writer.write_all(b"\n")?;
    }

    // crc
    let mut crc_hasher = Crc24Hasher::new();
    crc_hasher.write(&body);
    let crc = crc_hasher.finish() as u32;
    let crc_buf = [(crc >> 16) as u8, (crc >> 8) as u8, crc as u8];

    writer.write_all(b"=")?;
    writer.write_all(STANDARD.encode(crc_buf).as_bytes())?;
    writer.write_all(b"\n")?;

    // armor footer
    writer.write_all(b"-----END ")?;
    write!(writer, "{typ}")?;
    writer.write_all(b"-----\n")?;

    Ok(())
}
