//! BMP decoder and encoder (internal).
//!
//! Use top-level [`crate::decode_bmp`], [`crate::encode_bmp`], or
//! [`crate::BmpCodec`].

mod decode;
mod encode;
mod header;
mod rle;
mod utils;

pub(crate) use decode::decode;
pub(crate) use encode::encode_bmp as encode;
