//! Decoding of ASCII-armored OpenPGP public key rings.
//!
//! This crate takes an armored public key block (RFC 9580, previously
//! RFC 4880), strips the armor framing, and parses the binary payload into a
//! structured [`KeyRing`]: an ordered list of public keys, each carrying its
//! user IDs, signatures and subkeys as they appeared in the packet stream.
//!
//! Keys are decoded and structured, not cryptographically verified.
//!
//! ```no_run
//! use pgp_keyring::KeyRing;
//!
//! let armored = std::fs::read_to_string("key.asc")?;
//! let ring = KeyRing::from_armor_str(&armored)?;
//!
//! println!("Got {} keys", ring.len());
//! for key in ring.keys() {
//!     println!("{:?}", key.fingerprint());
//! }
//! # Ok::<(), pgp_keyring::errors::Error>(())
//! ```

#![warn(clippy::unwrap_used)]

pub mod armor;
pub mod composed;
pub mod crypto;
pub mod errors;
pub mod packet;
pub mod ser;
pub mod types;

mod parsing;

pub use crate::composed::{KeyRing, SignedPublicKey, SignedPublicSubKey, SignedUser, SkippedKey};
