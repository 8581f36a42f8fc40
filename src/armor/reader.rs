use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hasher;
use std::str;

use base64::engine::{general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use log::debug;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_until, take_until1};
use nom::character::complete::{line_ending, not_line_ending, space0};
use nom::combinator::{complete, map_res, opt, value};
use nom::multi::many0;
use nom::sequence::{delimited, pair};
use nom::IResult;

use crate::errors::{Error, Result};

/// Armor block types.
///
/// Ref: <https://www.rfc-editor.org/rfc/rfc9580.html#name-forming-ascii-armor>
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum BlockType {
    /// PGP public key
    PublicKey,
    /// PGP private key
    PrivateKey,
    Message,
    Signature,
    // gnupg extension
    File,
    /// Cleartext Framework message
    CleartextMessage,
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockType::PublicKey => f.write_str("PGP PUBLIC KEY BLOCK"),
            BlockType::PrivateKey => f.write_str("PGP PRIVATE KEY BLOCK"),
            BlockType::Message => f.write_str("PGP MESSAGE"),
            BlockType::Signature => f.write_str("PGP SIGNATURE"),
            BlockType::File => f.write_str("PGP ARMORED FILE"),
            BlockType::CleartextMessage => f.write_str("PGP SIGNED MESSAGE"),
        }
    }
}

/// Armor Headers.
pub type Headers = BTreeMap<String, Vec<String>>;

/// A decoded armor block: framing label, headers and the binary payload.
#[derive(Clone, PartialEq, Eq, derive_more::Debug)]
pub struct ArmoredBlock {
    pub typ: BlockType,
    pub headers: Headers,
    #[debug("{} bytes", payload.len())]
    pub payload: Bytes,
    /// The 24 bit checksum from the `=XXXX` footer line, if one was present.
    pub checksum: Option<u32>,
}

/// Parses a single ascii armor header separator.
fn armor_header_sep(i: &[u8]) -> IResult<&[u8], &[u8]> {
    tag(&b"-----"[..])(i)
}

/// Parses the type inside of an ascii armor header.
fn armor_header_type(i: &[u8]) -> IResult<&[u8], BlockType> {
    alt((
        value(BlockType::PublicKey, tag("PGP PUBLIC KEY BLOCK")),
        value(BlockType::PrivateKey, tag("PGP PRIVATE KEY BLOCK")),
        value(BlockType::CleartextMessage, tag("PGP SIGNED MESSAGE")),
        value(BlockType::Message, tag("PGP MESSAGE")),
        value(BlockType::Signature, tag("PGP SIGNATURE")),
        value(BlockType::File, tag("PGP ARMORED FILE")),
    ))(i)
}

/// Parses a single armor header line.
fn armor_header_line(i: &[u8]) -> IResult<&[u8], BlockType> {
    delimited(
        pair(armor_header_sep, tag(&b"BEGIN "[..])),
        armor_header_type,
        pair(armor_header_sep, line_ending),
    )(i)
}

/// Parses a single armor footer line, stripped of any line ending.
fn armor_footer_line(i: &[u8]) -> IResult<&[u8], BlockType> {
    delimited(
        pair(armor_header_sep, tag(&b"END "[..])),
        armor_header_type,
        pair(armor_header_sep, opt(line_ending)),
    )(i)
}

/// Parses a single key value pair, for the header.
fn key_value_pair(i: &[u8]) -> IResult<&[u8], (&str, &str)> {
    let (i, key) = map_res(
        alt((
            complete(take_until1(":\r\n")),
            complete(take_until1(":\n")),
            complete(take_until1(": ")),
        )),
        str::from_utf8,
    )(i)?;

    // consume the ":"
    let (i, _) = tag(":")(i)?;
    let (i, t) = alt((tag(" "), line_ending))(i)?;

    let (i, value) = if t == b" " {
        let (i, value) = map_res(not_line_ending, str::from_utf8)(i)?;
        let (i, _) = line_ending(i)?;
        (i, value)
    } else {
        // empty value
        (i, "")
    };

    Ok((i, (key, value)))
}

/// Parses the armor headers, merging repeated keys.
fn armor_headers(i: &[u8]) -> IResult<&[u8], Headers> {
    let (i, pairs) = many0(complete(key_value_pair))(i)?;

    let mut out = Headers::new();
    for (k, v) in pairs {
        let e = out.entry(k.to_string()).or_default();
        e.push(v.to_string());
    }

    Ok((i, out))
}

/// Parses everything up to and including the blank line separating the
/// armor headers from the base64 body. Data before the first `-----` is
/// tolerated, as armored blocks are frequently embedded in other text.
fn header_parser(i: &[u8]) -> IResult<&[u8], (BlockType, Headers)> {
    let (i, _prefix) = take_until("-----")(i)?;
    let (i, typ) = armor_header_line(i)?;
    let (i, headers) = armor_headers(i)?;
    // "A blank (zero length or containing only whitespace) line"
    let (i, _) = pair(space0, line_ending)(i)?;

    Ok((i, (typ, headers)))
}

/// Read the checksum from a base64 encoded buffer.
fn read_checksum(input: &[u8]) -> Result<u32> {
    let checksum = STANDARD.decode(input)?;

    let mut buf = [0u8; 4];
    let mut i = checksum.len();
    for a in checksum.iter().rev() {
        buf[i] = *a;
        i -= 1;
    }

    Ok(u32::from_be_bytes(buf))
}

/// Decodes a single ASCII armored block.
///
/// When a `=XXXX` checksum line is present, the CRC24 of the payload is
/// validated against it and a mismatch is an error.
pub fn decode(input: impl AsRef<[u8]>) -> Result<ArmoredBlock> {
    let input = input.as_ref();
    let (body, (typ, headers)) = header_parser(input).map_err(|_| Error::InvalidArmorWrappers)?;
    debug!("dearmoring {:?} block", typ);

    let mut b64 = Vec::with_capacity(body.len());
    let mut checksum = None;
    let mut footer = None;

    for line in body.split(|b| *b == b'\n') {
        let line = line.trim_ascii();
        if line.is_empty() {
            continue;
        }
        if line.starts_with(b"-----") {
            let (_, typ) = armor_footer_line(line).map_err(|_| Error::InvalidArmorWrappers)?;
            footer = Some(typ);
            break;
        }
        if let Some(enc) = line.strip_prefix(b"=") {
            // the optional 24 bit checksum line
            if enc.len() == 4 {
                checksum = Some(read_checksum(enc)?);
            }
            continue;
        }
        b64.extend_from_slice(line);
    }

    let Some(footer) = footer else {
        return Err(Error::InvalidArmorWrappers);
    };
    if footer != typ {
        return Err(Error::ArmorTypeMismatch {
            header: typ,
            footer,
        });
    }

    let payload: Bytes = STANDARD.decode(&b64)?.into();

    if let Some(expected) = checksum {
        let mut crc = crc24::Crc24Hasher::new();
        crc.write(&payload);
        let actual = crc.finish() as u32;
        if expected != actual {
            return Err(Error::InvalidChecksum { expected, actual });
        }
    }

    Ok(ArmoredBlock {
        typ,
        headers,
        payload,
        checksum,
    })
}

/// Decodes a single ASCII armored block from a string.
pub fn decode_str(input: &str) -> Result<ArmoredBlock> {
    decode(input.as_bytes())
}
