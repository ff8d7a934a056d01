//! JSON loading and saving in the profile tree's house style
//!
//! Profile and manifest files are pretty-printed with four-space indentation
//! and end with a newline. Key order is preserved (`serde_json` is built with
//! `preserve_order`), so rewriting a manifest only touches what changed.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::{Error, NormalizedPath, Result, io};

const INDENT: &[u8] = b"    ";

/// Parse a file into a JSON value.
pub fn load_value(path: &NormalizedPath) -> Result<Value> {
    let content = io::read_text(path)?;
    parse_value(path, &content)
}

/// Parse already-read text as JSON, attributing errors to `path`.
pub fn parse_value(path: &NormalizedPath, content: &str) -> Result<Value> {
    serde_json::from_str(content).map_err(|e| Error::json_parse(path.to_native(), &e))
}

/// Deserialize a file into `T`.
pub fn load<T: DeserializeOwned>(path: &NormalizedPath) -> Result<T> {
    let content = io::read_text(path)?;
    serde_json::from_str(&content).map_err(|e| Error::json_parse(path.to_native(), &e))
}

/// Render a value with four-space indentation and a trailing newline.
pub fn to_pretty_string<T: Serialize>(value: &T) -> std::result::Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    buf.push(b'\n');
    // serde_json only ever emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Serialize `value` and write it atomically to `path`.
pub fn save<T: Serialize>(path: &NormalizedPath, value: &T) -> Result<()> {
    let content = to_pretty_string(value).map_err(|e| Error::JsonSerialize {
        path: path.to_native(),
        message: e.to_string(),
    })?;
    io::write_atomic(path, content.as_bytes())
}
