mod keyring;
mod signed_key;

pub use self::keyring::{KeyRing, SkippedKey};
pub use self::signed_key::{SignedPublicKey, SignedPublicSubKey, SignedUser};
