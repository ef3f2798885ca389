//! PEM-style armor shared by the private key and container formats.
//!
//! Format:
//! ```text
//! -----BEGIN DEVCRYPT ENCRYPTED FILE-----
//! Filename: secrets.env
//! MAC: 5c0d...
//!
//! 8bX2fQ... (base64, 64 columns)
//! -----END DEVCRYPT ENCRYPTED FILE-----
//! ```
//!
//! Headers are written sorted by name, followed by a blank line only when at
//! least one header is present. Empty bodies produce no body lines.

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::error::{CoreError, Result};

const BEGIN_PREFIX: &str = "-----BEGIN ";
const END_PREFIX: &str = "-----END ";
const DASHES: &str = "-----";
const LINE_WIDTH: usize = 64;

/// A decoded PEM block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Block type, e.g. `DEVCRYPT PRIVATE KEY`.
    pub block_type: String,
    /// Header fields, kept sorted by name.
    pub headers: BTreeMap<String, String>,
    /// Raw body bytes.
    pub bytes: Vec<u8>,
}

impl Block {
    /// Create a block with no headers.
    pub fn new(block_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            block_type: block_type.into(),
            headers: BTreeMap::new(),
            bytes,
        }
    }

    /// Add a header, even when the value is empty.
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_string(), value.into());
        self
    }

    /// Add a header unless the value is empty.
    pub fn optional_header(self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            return self;
        }
        self.header(name, value)
    }

    /// Get a header value.
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Encode this block as text.
    pub fn encode(&self) -> String {
        let body = BASE64.encode(&self.bytes);
        let mut out = String::with_capacity(body.len() + body.len() / LINE_WIDTH + 128);

        out.push_str(&format!("{BEGIN_PREFIX}{}{DASHES}\n", self.block_type));
        for (name, value) in &self.headers {
            out.push_str(&format!("{name}: {value}\n"));
        }
        if !self.headers.is_empty() {
            out.push('\n');
        }

        // base64 output is ASCII, so byte offsets are char boundaries
        let mut remaining = body.as_str();
        while !remaining.is_empty() {
            let (line, rest) = remaining.split_at(remaining.len().min(LINE_WIDTH));
            out.push_str(line);
            out.push('\n');
            remaining = rest;
        }

        out.push_str(&format!("{END_PREFIX}{}{DASHES}\n", self.block_type));
        out
    }
}

/// Decode the first PEM block in `data`.
///
/// Only whitespace may precede the `BEGIN` line. Returns the block and the
/// text following its `END` line.
pub fn decode(data: &str) -> Result<(Block, &str)> {
    let data = data.trim_start();
    let (begin, mut rest) = next_line(data);

    let block_type = begin
        .strip_prefix(BEGIN_PREFIX)
        .and_then(|s| s.strip_suffix(DASHES))
        .ok_or_else(|| CoreError::decode("PEM block", "missing BEGIN line"))?
        .to_string();

    // Headers run until the first line without a colon.
    let mut headers = BTreeMap::new();
    loop {
        if rest.is_empty() {
            return Err(CoreError::decode("PEM block", "missing END line"));
        }
        let (line, next) = next_line(rest);
        match line.split_once(':') {
            Some((name, value)) if !line.starts_with(END_PREFIX) => {
                headers.insert(name.trim().to_string(), value.trim().to_string());
                rest = next;
            }
            _ => break,
        }
    }

    let mut body = String::new();
    loop {
        if rest.is_empty() {
            return Err(CoreError::decode("PEM block", "missing END line"));
        }
        let (line, next) = next_line(rest);
        rest = next;
        if let Some(end) = line.strip_prefix(END_PREFIX) {
            let end_type = end
                .strip_suffix(DASHES)
                .ok_or_else(|| CoreError::decode("PEM block", "malformed END line"))?;
            if end_type != block_type {
                return Err(CoreError::decode(
                    "PEM block",
                    format!("END type {end_type:?} does not match BEGIN type {block_type:?}"),
                ));
            }
            break;
        }
        body.extend(line.chars().filter(|c| !c.is_whitespace()));
    }

    let bytes = BASE64
        .decode(body.as_bytes())
        .map_err(|e| CoreError::decode("PEM body", e))?;

    Ok((
        Block {
            block_type,
            headers,
            bytes,
        },
        rest,
    ))
}

/// Decode exactly one block of `block_type`, with nothing but whitespace after it.
pub fn decode_single(data: &str, block_type: &str) -> Result<Block> {
    let (block, rest) = decode(data)?;
    if block.block_type != block_type {
        return Err(CoreError::decode(
            "PEM block",
            format!("unknown block type {:?}", block.block_type),
        ));
    }
    if !rest.trim().is_empty() {
        return Err(CoreError::decode("PEM block", "trailing data after END line"));
    }
    Ok(block)
}

/// Split off one line, without its terminator.
fn next_line(data: &str) -> (&str, &str) {
    let (line, rest) = match data.find('\n') {
        Some(i) => (&data[..i], &data[i + 1..]),
        None => (data, ""),
    };
    (line.strip_suffix('\r').unwrap_or(line).trim_end(), rest)
}
