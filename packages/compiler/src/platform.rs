//! Platform Predicates
//!
//! The compiler core never hard-codes tag knowledge beyond its own pseudo-tags; which
//! tags are void, which may be left open, which are reserved by the platform and which
//! attributes must be bound as DOM properties are all asked of a `Platform`.

use crate::ml_parser::html_tags::{can_be_left_open_tag, is_html_tag, is_svg, is_void_tag};
use std::fmt::Debug;

pub trait Platform: Debug + Send + Sync {
    /// Tag never has content or an end tag
    fn is_unary_tag(&self, _tag: &str) -> bool {
        false
    }

    /// Tag closes itself when a sibling of the same name opens
    fn can_be_left_open_tag(&self, _tag: &str) -> bool {
        false
    }

    /// Tag belongs to the platform (anything else is a component)
    fn is_reserved_tag(&self, _tag: &str) -> bool {
        false
    }

    /// Attribute must be bound as a DOM property rather than an attribute
    fn must_use_prop(&self, _tag: &str, _attr_type: Option<&str>, _attr: &str) -> bool {
        false
    }

    fn get_tag_namespace(&self, _tag: &str) -> Option<&'static str> {
        None
    }

    /// Whitespace inside this tag is kept verbatim
    fn is_pre_tag(&self, _tag: &str) -> bool {
        false
    }
}

/// Platform without any tag knowledge
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPlatform;

impl Platform for NullPlatform {}

/// Browser DOM platform
#[derive(Debug, Clone, Copy, Default)]
pub struct WebPlatform;

impl Platform for WebPlatform {
    fn is_unary_tag(&self, tag: &str) -> bool {
        is_void_tag(tag)
    }

    fn can_be_left_open_tag(&self, tag: &str) -> bool {
        can_be_left_open_tag(tag)
    }

    fn is_reserved_tag(&self, tag: &str) -> bool {
        is_html_tag(tag) || is_svg(tag)
    }

    fn must_use_prop(&self, tag: &str, attr_type: Option<&str>, attr: &str) -> bool {
        match attr {
            "value" => {
                matches!(tag, "input" | "textarea" | "option" | "select" | "progress")
                    && attr_type != Some("button")
            }
            "selected" => tag == "option",
            "checked" => tag == "input",
            "muted" => tag == "video",
            _ => false,
        }
    }

    fn get_tag_namespace(&self, tag: &str) -> Option<&'static str> {
        if is_svg(tag) {
            Some("svg")
        } else if tag == "math" {
            // basic support for MathML, only the root element
            Some("math")
        } else {
            None
        }
    }

    fn is_pre_tag(&self, tag: &str) -> bool {
        tag == "pre"
    }
}
