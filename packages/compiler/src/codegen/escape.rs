//! Escaping for Generated Source
//!
//! Every literal spliced into generated code goes through this module: string
//! literals are JSON encoded, and U+2028 / U+2029 (legal in JSON, line terminators in
//! older script engines) are escaped on top.

/// Quote `value` as a JSON string literal
pub fn json_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("{:?}", value))
}

/// Escape the line and paragraph separators that may appear raw in a JSON literal
pub fn transform_special_newlines(text: &str) -> String {
    text.replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

/// JSON string literal that is also safe to embed in generated source
pub fn source_string(value: &str) -> String {
    transform_special_newlines(&json_string(value))
}
