mod reader;
mod writer;

pub use self::reader::{decode, decode_str, ArmoredBlock, BlockType, Headers};
pub use self::writer::write;
