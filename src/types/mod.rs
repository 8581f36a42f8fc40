mod fingerprint;
mod key_id;
mod mpi;
mod packet;
mod params;

pub use self::fingerprint::Fingerprint;
pub use self::key_id::KeyId;
pub use self::mpi::Mpi;
pub use self::packet::{KeyVersion, PacketHeaderVersion, PacketLength, Tag};
pub use self::params::{
    DsaPublicParams, EcdhPublicParams, EcdsaPublicParams, Ed25519PublicParams,
    EddsaLegacyPublicParams, ElgamalPublicParams, PublicParams, RsaPublicParams,
    X25519PublicParams,
};
