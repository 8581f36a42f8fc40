use crate::errors::{bail, Result};
use crate::types::KeyVersion;

/// Represents a key fingerprint.
#[derive(Clone, Eq, PartialEq, derive_more::Debug)]
pub enum Fingerprint {
    #[debug("{}", hex::encode(_0))]
    V2([u8; 16]),
    #[debug("{}", hex::encode(_0))]
    V3([u8; 16]),
    #[debug("{}", hex::encode(_0))]
    V4([u8; 20]),
    #[debug("{}", hex::encode(_0))]
    V6([u8; 32]),
}

impl Fingerprint {
    pub fn new(version: KeyVersion, fp: &[u8]) -> Result<Self> {
        let fp = match version {
            KeyVersion::V2 => Fingerprint::V2(
                fp.try_into()
                    .map_err(|_| crate::format_err!("invalid v2 fingerprint length"))?,
            ),
            KeyVersion::V3 => Fingerprint::V3(
                fp.try_into()
                    .map_err(|_| crate::format_err!("invalid v3 fingerprint length"))?,
            ),
            KeyVersion::V4 => Fingerprint::V4(
                fp.try_into()
                    .map_err(|_| crate::format_err!("invalid v4 fingerprint length"))?,
            ),
            KeyVersion::V6 => Fingerprint::V6(
                fp.try_into()
                    .map_err(|_| crate::format_err!("invalid v6 fingerprint length"))?,
            ),
            KeyVersion::V5 | KeyVersion::Other(_) => bail!("unsupported key version {:?}", version),
        };

        Ok(fp)
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        match self {
            Self::V2(_) | Self::V3(_) => 16,
            Self::V4(_) => 20,
            Self::V6(_) => 32,
        }
    }

    pub fn version(&self) -> KeyVersion {
        match self {
            Self::V2(_) => KeyVersion::V2,
            Self::V3(_) => KeyVersion::V3,
            Self::V4(_) => KeyVersion::V4,
            Self::V6(_) => KeyVersion::V6,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::V2(fp) | Self::V3(fp) => &fp[..],
            Self::V4(fp) => &fp[..],
            Self::V6(fp) => &fp[..],
        }
    }
}
