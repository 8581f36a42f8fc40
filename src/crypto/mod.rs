pub mod ecc_curve;
pub mod hash;
pub mod public_key;
pub mod sym;

pub use self::ecc_curve::{ecc_curve_from_oid, EccCurve};
pub use self::hash::HashAlgorithm;
pub use self::public_key::PublicKeyAlgorithm;
pub use self::sym::SymmetricKeyAlgorithm;
