use std::collections::BTreeMap;
use std::io;
use std::iter::Peekable;

use bytes::Bytes;
use log::{debug, warn};

use crate::armor::{self, BlockType};
use crate::composed::{SignedPublicKey, SignedPublicSubKey, SignedUser};
use crate::errors::{bail, Error, Result};
use crate::packet::{Packet, PacketParser, PublicKey, Signature, SignatureType, UserId};
use crate::ser::Serialize;
use crate::types::Tag;

/// Diagnostic for a key packet that could not be decoded and was dropped,
/// together with everything attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedKey {
    /// Position among the primary key packets of the stream, 0 based.
    pub index: usize,
    /// Why the key was skipped.
    pub reason: String,
}

/// An ordered collection of public keys, as parsed from a single armored
/// block or raw packet stream.
///
/// Keys that use an algorithm or version we do not understand are dropped
/// and recorded in [`skipped`](Self::skipped), so that an empty ring from
/// empty input can be told apart from a ring whose keys all failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyRing {
    keys: Vec<SignedPublicKey>,
    skipped: Vec<SkippedKey>,
}

impl KeyRing {
    /// Parses a key ring from an ASCII armored public key block.
    pub fn from_armor_str(input: &str) -> Result<Self> {
        Self::from_armored(input.as_bytes())
    }

    /// Parses a key ring from ASCII armored bytes.
    pub fn from_armored(input: impl AsRef<[u8]>) -> Result<Self> {
        let block = armor::decode(input)?;
        match block.typ {
            BlockType::PublicKey | BlockType::File => Self::from_bytes(block.payload),
            typ => bail!("unexpected block type: {}", typ),
        }
    }

    /// Parses a key ring from raw binary packet data.
    pub fn from_bytes(input: impl Into<Bytes>) -> Result<Self> {
        let mut packets = PacketParser::new(input).peekable();

        let mut keys = Vec::new();
        let mut skipped = Vec::new();
        let mut index = 0;

        loop {
            // ignore stray packets between keys
            skip_non_key_packets(&mut packets)?;
            let Some(res) = packets.next() else {
                break;
            };
            let packet = res?;

            match PublicKey::try_from(packet) {
                Ok(primary) if primary.is_supported() => {
                    keys.push(next_key(primary, &mut packets)?);
                }
                Ok(primary) => {
                    let reason = format!("unknown algorithm {:?}", primary.algorithm());
                    warn!("skipping key {}: {}", index, reason);
                    skip_non_key_packets(&mut packets)?;
                    skipped.push(SkippedKey { index, reason });
                }
                Err(Error::Unsupported { message }) => {
                    warn!("skipping key {}: {}", index, message);
                    skip_non_key_packets(&mut packets)?;
                    skipped.push(SkippedKey {
                        index,
                        reason: message,
                    });
                }
                Err(e) => return Err(e),
            }
            index += 1;
        }

        Ok(KeyRing { keys, skipped })
    }

    /// Number of successfully parsed keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[SignedPublicKey] {
        &self.keys
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SignedPublicKey> {
        self.keys.iter()
    }

    pub fn into_keys(self) -> Vec<SignedPublicKey> {
        self.keys
    }

    /// Keys that were dropped during parsing, with the cause.
    pub fn skipped(&self) -> &[SkippedKey] {
        &self.skipped
    }

    pub fn to_armored_writer(
        &self,
        writer: &mut impl io::Write,
        headers: Option<&BTreeMap<String, String>>,
    ) -> Result<()> {
        armor::write(self, BlockType::PublicKey, writer, headers)
    }

    pub fn to_armored_string(&self, headers: Option<&BTreeMap<String, String>>) -> Result<String> {
        let mut buf = Vec::new();
        self.to_armored_writer(&mut buf, headers)?;

        Ok(String::from_utf8(buf).expect("armor is ascii"))
    }
}

impl IntoIterator for KeyRing {
    type Item = SignedPublicKey;
    type IntoIter = std::vec::IntoIter<SignedPublicKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.into_iter()
    }
}

impl Serialize for KeyRing {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        self.keys.to_writer(writer)
    }

    fn write_len(&self) -> usize {
        self.keys.write_len()
    }
}

/// Assembles one key from the packets following its primary key packet.
///
/// The packet sequence of a transferable public key is:
/// revocation/direct signatures, then user ids with their certifications,
/// then subkeys with their binding signatures.
fn next_key<I>(primary_key: PublicKey, packets: &mut Peekable<I>) -> Result<SignedPublicKey>
where
    I: Iterator<Item = Result<Packet>>,
{
    debug!("primary key: {:?}", primary_key.key_id());

    // -- Zero or more revocation signatures,
    // -- followed by zero or more direct signatures
    let mut revocation_signatures = Vec::new();
    let mut direct_signatures = Vec::new();

    for sig in read_signatures(packets)? {
        if sig.typ() == SignatureType::KeyRevocation {
            revocation_signatures.push(sig);
        } else {
            direct_signatures.push(sig);
        }
    }

    // -- Zero or more User ID packets
    let mut users = Vec::new();
    while let Some(res) = packets.next_if(|p| {
        p.as_ref()
            .is_ok_and(|p| matches!(p.tag(), Tag::UserId | Tag::UserAttribute))
    }) {
        let packet = res?;
        match packet.tag() {
            Tag::UserId => {
                let id = UserId::try_from(packet)?;
                let sigs = read_signatures(packets)?;
                users.push(SignedUser::new(id, sigs));
            }
            Tag::UserAttribute => {
                // image attributes are not modeled, drop them together with
                // their signatures
                warn!("ignoring user attribute packet");
                let _ = read_signatures(packets)?;
            }
            _ => unreachable!("matched above"),
        }
    }

    if users.is_empty() {
        warn!("missing user ids for {:?}", primary_key.key_id());
    }

    // -- Zero or more Subkey packets
    let mut public_subkeys = Vec::new();
    while let Some(res) =
        packets.next_if(|p| p.as_ref().is_ok_and(|p| p.tag() == Tag::PublicSubkey))
    {
        let packet = res?;
        match PublicKey::try_from(packet) {
            Ok(subkey) => {
                let sigs = read_signatures(packets)?;
                public_subkeys.push(SignedPublicSubKey::new(subkey, sigs));
            }
            Err(Error::Unsupported { message }) => {
                warn!("ignoring subkey: {}", message);
                let _ = read_signatures(packets)?;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(SignedPublicKey::new(
        primary_key,
        revocation_signatures,
        direct_signatures,
        users,
        public_subkeys,
    ))
}

/// Reads consecutive signature packets. Signatures with an unsupported
/// version are logged and dropped, everything else is an error.
fn read_signatures<I>(packets: &mut Peekable<I>) -> Result<Vec<Signature>>
where
    I: Iterator<Item = Result<Packet>>,
{
    let mut sigs = Vec::new();
    while let Some(res) = packets.next_if(|p| p.as_ref().is_ok_and(|p| p.tag() == Tag::Signature)) {
        let packet = res?;
        match Signature::try_from(packet) {
            Ok(sig) => sigs.push(sig),
            Err(Error::Unsupported { message }) => {
                warn!("ignoring signature: {}", message);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(sigs)
}

/// Consumes packets up to the next primary key packet (or the end of the
/// stream). Errors stay in the iterator for the caller to surface.
fn skip_non_key_packets<I>(packets: &mut Peekable<I>) -> Result<()>
where
    I: Iterator<Item = Result<Packet>>,
{
    while let Some(res) = packets.next_if(|p| p.as_ref().is_ok_and(|p| p.tag() != Tag::PublicKey)) {
        let packet = res?;
        debug!("ignoring {:?} packet", packet.tag());
    }

    Ok(())
}
