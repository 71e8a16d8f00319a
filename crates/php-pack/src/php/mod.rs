//! PHP `serialize()` format decoding.

pub mod constants;
pub mod convert;
pub mod decoder;
pub mod error;

pub use convert::{decode_json_from_php_bytes, php_to_json, php_to_json_owned};
pub use decoder::{decode_php_value, PhpDecoder};
pub use error::PhpDecodeError;
