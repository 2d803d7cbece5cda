//! JSON document parsing and formatting
//!
//! Output is pretty-printed with sorted keys and `": "` separators, the format
//! the firmware configuration files are kept in.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};

use crate::error::JsonError;

/// Parse `content` as JSON; `name` identifies the document in errors
pub fn parse(name: &str, content: &str) -> Result<Value, JsonError> {
    serde_json::from_str(content).map_err(|e| JsonError::Parse {
        name: name.to_string(),
        error: e.to_string(),
    })
}

/// Pretty-print `value` with `indent` spaces per level
///
/// Object keys come out sorted. No trailing newline is added.
pub fn to_pretty_string(value: &Value, indent: usize) -> Result<String, JsonError> {
    let indent = vec![b' '; indent];
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&indent));
    value.serialize(&mut ser).map_err(|e| JsonError::Serialize {
        error: e.to_string(),
    })?;
    String::from_utf8(buf).map_err(|e| JsonError::Serialize {
        error: e.to_string(),
    })
}
