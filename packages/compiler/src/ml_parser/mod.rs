//! Markup Parser
//!
//! A streaming HTML scanner that reports start tags, end tags, text and comments to a
//! handler, plus the tag tables and entity decoding it relies on.

pub mod entities;
pub mod html_parser;
pub mod html_tags;

pub use html_parser::{parse_html, Attr, HtmlHandler, HtmlParserOptions};
