//! HTML Entities
//!
//! Attribute values are decoded against a small fixed table. Text content is decoded
//! against the full HTML5 named reference set, legacy forms without a semicolon included.

use once_cell::sync::Lazy;
use regex::Regex;

static ENCODED_ATTR: Lazy<Regex> = Lazy::new(|| Regex::new(r"&(?:lt|gt|quot|amp|#39);").unwrap());
static ENCODED_ATTR_WITH_NEWLINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(?:lt|gt|quot|amp|#39|#10|#9);").unwrap());

fn attr_decoding(entity: &str) -> Option<&'static str> {
    match entity {
        "&lt;" => Some("<"),
        "&gt;" => Some(">"),
        "&quot;" => Some("\""),
        "&amp;" => Some("&"),
        "&#10;" => Some("\n"),
        "&#9;" => Some("\t"),
        "&#39;" => Some("'"),
        _ => None,
    }
}

/// Decode the entities an attribute value may carry.
/// `&#10;` and `&#9;` are only decoded when `decode_newlines` is set.
pub fn decode_attr(value: &str, decode_newlines: bool) -> String {
    let re: &Regex = if decode_newlines {
        &*ENCODED_ATTR_WITH_NEWLINES
    } else {
        &*ENCODED_ATTR
    };
    re.replace_all(value, |caps: &regex::Captures| {
        attr_decoding(&caps[0]).unwrap_or_default().to_string()
    })
    .into_owned()
}

/// Decode named and numeric character references in text content.
/// Unknown references are left untouched.
pub fn decode_html(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    htmlize::unescape(text).into_owned()
}
