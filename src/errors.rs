use snafu::Snafu;

use crate::armor::BlockType;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error types
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// Missing or garbled `-----BEGIN ...-----` / `-----END ...-----` lines.
    #[snafu(display("invalid armor wrappers"))]
    InvalidArmorWrappers,
    #[snafu(display("armor footer does not match header: {header} != {footer}"))]
    ArmorTypeMismatch {
        header: BlockType,
        footer: BlockType,
    },
    #[snafu(transparent)]
    Base64Decode { source: base64::DecodeError },
    #[snafu(display("invalid crc24 checksum: expected {expected:06x}, calculated {actual:06x}"))]
    InvalidChecksum { expected: u32, actual: u32 },
    /// A declared length points past the end of the input.
    #[snafu(display("packet is incomplete: needed {needed} bytes, {remaining} remaining"))]
    PacketIncomplete { needed: usize, remaining: usize },
    #[snafu(display("mpi too large: {bits} bits"))]
    MpiTooLong { bits: u16 },
    /// Signals packet versions and parameters we don't support, but can safely ignore.
    #[snafu(display("Unsupported: {message}"))]
    Unsupported { message: String },
    #[snafu(display("Not yet implemented: {message}"))]
    Unimplemented { message: String },
    #[snafu(display("{message}"))]
    Message { message: String },
    #[snafu(transparent)]
    Utf8Error { source: std::str::Utf8Error },
    #[snafu(transparent)]
    IO { source: std::io::Error },
}

#[macro_export]
macro_rules! unimplemented_err {
    ($e:expr) => {
        return Err($crate::errors::Error::Unimplemented { message: $e.to_string() })
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::errors::Error::Unimplemented { message: format!($fmt, $($arg)+) })
    };
}

#[macro_export]
macro_rules! unsupported_err {
    ($e:expr) => {
        return Err($crate::errors::Error::Unsupported { message: $e.to_string() })
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::errors::Error::Unsupported { message: format!($fmt, $($arg)+) })
    };
}

#[macro_export]
macro_rules! bail {
    ($e:expr) => {
        return Err($crate::errors::Error::Message { message: $e.to_string() })
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::errors::Error::Message { message: format!($fmt, $($arg)+) })
    };
}

#[macro_export]
macro_rules! format_err {
    ($e:expr) => {
        $crate::errors::Error::Message { message: $e.to_string() }
    };
    ($fmt:expr, $($arg:tt)+) => {
        $crate::errors::Error::Message { message: format!($fmt, $($arg)+) }
    };
}

#[macro_export]
macro_rules! ensure {
    ($cond:expr, $e:expr) => {
        if !($cond) {
            $crate::bail!($e);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)+) => {
        if !($cond) {
            $crate::bail!($fmt, $($arg)+);
        }
    };
}

#[macro_export]
macro_rules! ensure_eq {
    ($left:expr, $right:expr) => ({
        match (&$left, &$right) {
            (left_val, right_val) => {
                if !(*left_val == *right_val) {
                    $crate::bail!(r#"assertion failed: `(left == right)`
  left: `{:?}`,
 right: `{:?}`"#, left_val, right_val)
                }
            }
        }
    });
    ($left:expr, $right:expr,) => ({
        $crate::ensure_eq!($left, $right)
    });
    ($left:expr, $right:expr, $($arg:tt)+) => ({
        match (&($left), &($right)) {
            (left_val, right_val) => {
                if !(*left_val == *right_val) {
                    $crate::bail!(r#"assertion failed: `(left == right)`
  left: `{:?}`,
 right: `{:?}`: {}"#, left_val, right_val, format_args!($($arg)+))
                }
            }
        }
    });
}

pub use crate::{bail, ensure, ensure_eq, format_err, unimplemented_err, unsupported_err};
