use std::collections::BTreeMap;
use std::io;

use chrono::{DateTime, Utc};
use log::warn;

use crate::armor;
use crate::crypto::PublicKeyAlgorithm;
use crate::errors::Result;
use crate::packet::{packet_write_len, write_packet, PublicKey, Signature, UserId};
use crate::ser::Serialize;
use crate::types::{Fingerprint, KeyId, KeyVersion, Tag};

/// A user id with its certification signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUser {
    pub id: UserId,
    pub signatures: Vec<Signature>,
}

impl SignedUser {
    pub fn new(id: UserId, signatures: Vec<Signature>) -> Self {
        SignedUser { id, signatures }
    }
}

impl Serialize for SignedUser {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        write_packet(writer, Tag::UserId, &self.id)?;
        for sig in &self.signatures {
            write_packet(writer, Tag::Signature, sig)?;
        }

        Ok(())
    }

    fn write_len(&self) -> usize {
        packet_write_len(&self.id)
            + self
                .signatures
                .iter()
                .map(|sig| packet_write_len(sig))
                .sum::<usize>()
    }
}

/// A public subkey with its binding signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPublicSubKey {
    pub key: PublicKey,
    pub signatures: Vec<Signature>,
}

impl SignedPublicSubKey {
    pub fn new(key: PublicKey, signatures: Vec<Signature>) -> Self {
        SignedPublicSubKey { key, signatures }
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.key.fingerprint()
    }

    pub fn key_id(&self) -> KeyId {
        self.key.key_id()
    }

    pub fn algorithm(&self) -> PublicKeyAlgorithm {
        self.key.algorithm()
    }
}

impl Serialize for SignedPublicSubKey {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        write_packet(writer, Tag::PublicSubkey, &self.key)?;
        for sig in &self.signatures {
            write_packet(writer, Tag::Signature, sig)?;
        }

        Ok(())
    }

    fn write_len(&self) -> usize {
        packet_write_len(&self.key)
            + self
                .signatures
                .iter()
                .map(|sig| packet_write_len(sig))
                .sum::<usize>()
    }
}

/// A public key with everything that was attached to it in the packet
/// stream: revocation and direct signatures, user ids with their
/// certifications, and subkeys with their binding signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPublicKey {
    pub primary_key: PublicKey,
    pub revocation_signatures: Vec<Signature>,
    pub direct_signatures: Vec<Signature>,
    pub users: Vec<SignedUser>,
    pub public_subkeys: Vec<SignedPublicSubKey>,
}

impl SignedPublicKey {
    pub fn new(
        primary_key: PublicKey,
        revocation_signatures: Vec<Signature>,
        direct_signatures: Vec<Signature>,
        users: Vec<SignedUser>,
        mut public_subkeys: Vec<SignedPublicSubKey>,
    ) -> Self {
        public_subkeys.retain(|key| {
            if key.signatures.is_empty() {
                warn!("ignoring unsigned subkey {:?}", key.key_id());
                false
            } else {
                true
            }
        });

        SignedPublicKey {
            primary_key,
            revocation_signatures,
            direct_signatures,
            users,
            public_subkeys,
        }
    }

    pub fn version(&self) -> KeyVersion {
        self.primary_key.version()
    }

    pub fn algorithm(&self) -> PublicKeyAlgorithm {
        self.primary_key.algorithm()
    }

    pub fn created_at(&self) -> &DateTime<Utc> {
        self.primary_key.created_at()
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.primary_key.fingerprint()
    }

    pub fn key_id(&self) -> KeyId {
        self.primary_key.key_id()
    }

    pub fn to_armored_writer(
        &self,
        writer: &mut impl io::Write,
        headers: Option<&BTreeMap<String, String>>,
    ) -> Result<()> {
        armor::write(self, armor::BlockType::PublicKey, writer, headers)
    }

    pub fn to_armored_string(&self, headers: Option<&BTreeMap<String, String>>) -> Result<String> {
        let mut buf = Vec::new();
        self.to_armored_writer(&mut buf, headers)?;

        Ok(String::from_utf8(buf).expect("armor is ascii"))
    }
}

impl Serialize for SignedPublicKey {
    fn to_writer<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        write_packet(writer, Tag::PublicKey, &self.primary_key)?;
        for sig in &self.revocation_signatures {
            write_packet(writer, Tag::Signature, sig)?;
        }
        for sig in &self.direct_signatures {
            write_packet(writer, Tag::Signature, sig)?;
        }
        self.users.to_writer(writer)?;
        self.public_subkeys.to_writer(writer)?;

        Ok(())
    }

    fn write_len(&self) -> usize {
        packet_write_len(&self.primary_key)
            + self
                .revocation_signatures
                .iter()
                .map(|sig| packet_write_len(sig))
                .sum::<usize>()
            + self
                .direct_signatures
                .iter()
                .map(|sig| packet_write_len(sig))
                .sum::<usize>()
            + self.users.write_len()
            + self.public_subkeys.write_len()
    }
}
