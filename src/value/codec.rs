//! Typed value codec
//!
//! Orchestrates, never interprets: bytes come from the value's own layout,
//! and decoding always starts from a default-constructed instance of the
//! resolved type.

use super::{ResolvedType, Value};
use crate::error::CodecError;

/// Encode a value with its own binary layout.
pub fn encode(value: &dyn Value) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    value.write_bytes(&mut out)?;
    Ok(out)
}

/// Decode `bytes` as an instance of `ty`.
///
/// The null sentinel always decodes to `None` without reading the bytes.
pub fn decode(bytes: &[u8], ty: &ResolvedType) -> Result<Option<Box<dyn Value>>, CodecError> {
    let Some(mut value) = ty.new_instance()? else {
        return Ok(None);
    };
    value.read_bytes(bytes)?;
    Ok(Some(value))
}
