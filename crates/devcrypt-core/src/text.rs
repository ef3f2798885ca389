//! Helpers for the single-line text formats (`devcrypt-key`, `devcrypt-keybox`).

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::error::{CoreError, Result};
use crate::keys::KEY_SIZE;

/// Split a single line into `count` space-separated fields.
///
/// The first field must equal `tag`. The last field takes the rest of the line
/// and may itself contain spaces. Trailing line terminators (blank lines at
/// the end of a key file) are ignored; any other newline is an error. Returns
/// the fields after the tag.
pub fn split_fields<'a>(line: &'a str, tag: &str, count: usize) -> Result<Vec<&'a str>> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.contains('\n') {
        return Err(CoreError::decode(tag, "unexpected newline"));
    }

    let fields: Vec<&str> = line.splitn(count, ' ').collect();
    if fields.len() != count {
        return Err(CoreError::decode(
            tag,
            format!("expected {} fields, got {}", count, fields.len()),
        ));
    }
    if fields[0] != tag {
        return Err(CoreError::decode(
            tag,
            format!("expected {:?}, got {:?}", tag, fields[0]),
        ));
    }
    Ok(fields[1..].to_vec())
}

/// Decode a base64 field that must hold exactly one 32-byte key.
pub fn decode_key_base64(field: &str, context: &str) -> Result<[u8; KEY_SIZE]> {
    let bytes = BASE64
        .decode(field)
        .map_err(|e| CoreError::decode(context, e))?;
    bytes.as_slice().try_into().map_err(|_| {
        CoreError::decode(
            context,
            format!("expected {} key bytes, got {}", KEY_SIZE, bytes.len()),
        )
    })
}

/// Reject values that would break a one-line encoding.
pub fn ensure_single_line(value: &str, what: &'static str) -> Result<()> {
    if value.contains('\n') || value.contains('\r') {
        return Err(CoreError::EmbeddedNewline(what));
    }
    Ok(())
}
