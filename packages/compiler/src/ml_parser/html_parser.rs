//! HTML Scanner
//!
//! Turns template text into a stream of structural events (start tag, end tag, text,
//! comment). The scanner keeps its own stack of open tags so that the event stream is
//! always balanced, even for truncated or malformed markup: stray `<` characters become
//! text, unmatched end tags unwind the stack, and whatever is still open at the end of
//! the input is force-closed.

use super::entities::decode_attr;
use super::html_tags::{
    is_non_phrasing_tag, is_plain_text_element, is_verbatim_text_element, should_ignore_first_lf,
};
use crate::parse_util::SourceRange;
use crate::platform::Platform;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use smallvec::SmallVec;

// Regular Expressions for parsing tags and attributes
static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*([^\s"'<>/=]+)(?:\s*(=)\s*(?:"([^"]*)"+|'([^']*)'+|([^\s"'=<>`]+)))?"#)
        .unwrap()
});
static DYNAMIC_ARG_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^\s*((?:v-[\w-]+:|[@:#])\[[^=]+?\][^\s"'<>/=]*)(?:\s*(=)\s*(?:"([^"]*)"+|'([^']*)'+|([^\s"'=<>`]+)))?"#,
    )
    .unwrap()
});

/// Letters allowed in tag names, per the potential custom element name production
const UNICODE_LETTERS: &str = r"a-zA-Z\x{00B7}\x{00C0}-\x{00D6}\x{00D8}-\x{00F6}\x{00F8}-\x{037D}\x{037F}-\x{1FFF}\x{200C}-\x{200D}\x{203F}-\x{2040}\x{2070}-\x{218F}\x{2C00}-\x{2FEF}\x{3001}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFFD}";

static QNAME_CAPTURE: Lazy<String> = Lazy::new(|| {
    let ncname = format!(r"[a-zA-Z_][\-\.0-9_{}]*", UNICODE_LETTERS);
    format!(r"((?:{ncname}:)?{ncname})", ncname = ncname)
});
static START_TAG_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^<{}", QNAME_CAPTURE.as_str())).unwrap());
static START_TAG_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(/?)>").unwrap());
static END_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^</{}[^>]*>", QNAME_CAPTURE.as_str())).unwrap());
static DOCTYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^<!DOCTYPE [^>]+>").unwrap());
const COMMENT_OPEN: &str = "<!--";
const CONDITIONAL_COMMENT_OPEN: &str = "<![";

static WRAPPED_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--(.*?)-->").unwrap());
static WRAPPED_CDATA: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").unwrap());

/// Attribute as written in the start tag (value already entity-decoded)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attr {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dynamic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<SourceRange>,
}

impl Attr {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attr {
            name: name.into(),
            value: value.into(),
            dynamic: false,
            range: None,
        }
    }

    pub fn with_range(mut self, range: Option<SourceRange>) -> Self {
        self.range = range;
        self
    }

    pub fn with_dynamic(mut self, dynamic: bool) -> Self {
        self.dynamic = dynamic;
        self
    }
}

/// Receiver of scanner events
pub trait HtmlHandler {
    fn start(&mut self, tag: &str, attrs: Vec<Attr>, unary: bool, start: usize, end: usize);
    fn end(&mut self, tag: &str, start: usize, end: usize);
    fn chars(&mut self, text: &str, start: usize, end: usize);
    fn comment(&mut self, text: &str, start: usize, end: usize);
}

/// Scanner options
pub struct HtmlParserOptions<'a> {
    pub platform: &'a dyn Platform,
    pub expect_html: bool,
    pub should_decode_newlines: bool,
    pub should_decode_newlines_for_href: bool,
    pub should_keep_comment: bool,
}

/// Scan `html`, firing `handler` callbacks in document order
pub fn parse_html<H: HtmlHandler>(html: &str, options: &HtmlParserOptions<'_>, handler: &mut H) {
    let mut scanner = HtmlScanner {
        source: html,
        index: 0,
        stack: SmallVec::new(),
        last_tag: None,
        options,
        handler,
    };
    scanner.scan();
}

#[derive(Debug, Clone)]
struct OpenTag {
    tag: String,
    lower_cased_tag: String,
}

/// Start tag matched but not yet reported
struct StartTagMatch {
    tag_name: String,
    attrs: Vec<AttrMatch>,
    unary_slash: bool,
    start: usize,
    end: usize,
}

/// Raw attribute text, positions exclude leading whitespace
struct AttrMatch {
    name: String,
    value: String,
    start: usize,
    end: usize,
}

struct HtmlScanner<'s, 'o, H: HtmlHandler> {
    source: &'s str,
    index: usize,
    stack: SmallVec<[OpenTag; 16]>,
    last_tag: Option<String>,
    options: &'o HtmlParserOptions<'o>,
    handler: &'o mut H,
}

impl<'s, 'o, H: HtmlHandler> HtmlScanner<'s, 'o, H> {
    fn rest(&self) -> &'s str {
        &self.source[self.index..]
    }

    fn advance(&mut self, n: usize) {
        self.index += n;
    }

    fn scan(&mut self) {
        while self.index < self.source.len() {
            let last_index = self.index;

            let in_raw_text = self
                .last_tag
                .as_deref()
                .map_or(false, is_plain_text_element);

            if in_raw_text {
                self.scan_raw_text();
            } else if self.scan_markup() {
                continue;
            } else {
                self.scan_text();
            }

            if self.index == last_index {
                let rest = self.rest();
                self.handler.chars(rest, self.index, self.source.len());
                self.index = self.source.len();
                break;
            }
        }

        // Clean up any remaining tags
        self.parse_end_tag(None, self.index, self.index);
    }

    /// Try the constructs that may start at a `<`. Returns true when one was consumed.
    fn scan_markup(&mut self) -> bool {
        let rest = self.rest();
        if !rest.starts_with('<') {
            return false;
        }

        // Comment
        if rest.starts_with(COMMENT_OPEN) {
            if let Some(comment_end) = rest.find("-->") {
                if self.options.should_keep_comment && comment_end >= COMMENT_OPEN.len() {
                    let start = self.index;
                    self.handler
                        .comment(&rest[COMMENT_OPEN.len()..comment_end], start, start + comment_end + 3);
                }
                self.advance(comment_end + 3);
                return true;
            }
        }

        // Conditional comment, e.g. <![if !IE]>
        if rest.starts_with(CONDITIONAL_COMMENT_OPEN) {
            if let Some(conditional_end) = rest.find("]>") {
                self.advance(conditional_end + 2);
                return true;
            }
        }

        // Doctype
        if let Some(m) = DOCTYPE.find(rest) {
            self.advance(m.end());
            return true;
        }

        // End tag
        if let Some(caps) = END_TAG.captures(rest) {
            let cur_index = self.index;
            let tag_name = caps[1].to_string();
            self.advance(caps[0].len());
            let end = self.index;
            self.parse_end_tag(Some(&tag_name), cur_index, end);
            return true;
        }

        // Start tag
        if let Some(start_tag) = self.parse_start_tag() {
            let tag_name = start_tag.tag_name.clone();
            self.handle_start_tag(start_tag);
            if should_ignore_first_lf(&tag_name) && self.rest().starts_with('\n') {
                self.advance(1);
            }
            return true;
        }

        false
    }

    /// Consume text up to the next `<` that opens a recognizable construct
    fn scan_text(&mut self) {
        let rest = self.rest();
        let text = match rest.find('<') {
            Some(mut text_end) => {
                loop {
                    let candidate = &rest[text_end..];
                    if starts_construct(candidate) {
                        break;
                    }
                    // < in plain text, be forgiving and treat it as text
                    match candidate[1..].find('<') {
                        Some(next) => text_end += next + 1,
                        None => break,
                    }
                }
                &rest[..text_end]
            }
            None => rest,
        };

        if !text.is_empty() {
            let start = self.index;
            self.advance(text.len());
            self.handler.chars(text, start, self.index);
        }
    }

    /// Content of script/style/textarea: everything up to the matching end tag
    fn scan_raw_text(&mut self) {
        let stacked_tag = self
            .last_tag
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();
        let rest = self.rest();

        match find_raw_text_end(rest, &stacked_tag) {
            Some((text_end, tag_end)) => {
                let mut text = rest[..text_end].to_string();
                if !is_verbatim_text_element(&stacked_tag) {
                    text = WRAPPED_COMMENT.replace_all(&text, "$1").into_owned();
                    text = WRAPPED_CDATA.replace_all(&text, "$1").into_owned();
                }
                if should_ignore_first_lf(&stacked_tag) && text.starts_with('\n') {
                    text.remove(0);
                }
                let start = self.index;
                self.handler.chars(&text, start, start + text_end);
                self.advance(tag_end);
                let end = self.index;
                self.parse_end_tag(Some(&stacked_tag), start + text_end, end);
            }
            None => {
                // No end tag at all: close the container, the rest is flushed as text
                let index = self.index;
                self.parse_end_tag(Some(&stacked_tag), index, index);
            }
        }
    }

    fn parse_start_tag(&mut self) -> Option<StartTagMatch> {
        let source: &'s str = self.source;
        let start = self.index;
        let caps = START_TAG_OPEN.captures(&source[start..])?;
        let tag_name = caps[1].to_string();
        let mut cursor = start + caps[0].len();
        let mut attrs = Vec::new();

        loop {
            let rest = &source[cursor..];
            if let Some(end) = START_TAG_CLOSE.captures(rest) {
                let unary_slash = !end[1].is_empty();
                cursor += end[0].len();
                self.index = cursor;
                return Some(StartTagMatch {
                    tag_name,
                    attrs,
                    unary_slash,
                    start,
                    end: cursor,
                });
            }
            let attr = DYNAMIC_ARG_ATTRIBUTE
                .captures(rest)
                .or_else(|| ATTRIBUTE.captures(rest))?;
            let whole = &attr[0];
            let leading_ws = whole.len() - whole.trim_start().len();
            let attr_start = cursor + leading_ws;
            cursor += whole.len();
            let value = attr
                .get(3)
                .or_else(|| attr.get(4))
                .or_else(|| attr.get(5))
                .map(|m| m.as_str())
                .unwrap_or_default();
            attrs.push(AttrMatch {
                name: attr[1].to_string(),
                value: value.to_string(),
                start: attr_start,
                end: cursor,
            });
        }
    }

    fn handle_start_tag(&mut self, start_tag: StartTagMatch) {
        let tag_name = start_tag.tag_name.as_str();

        if self.options.expect_html {
            if self.last_tag.as_deref() == Some("p") && is_non_phrasing_tag(tag_name) {
                let index = self.index;
                self.parse_end_tag(Some("p"), index, index);
            }
            if self.options.platform.can_be_left_open_tag(tag_name)
                && self.last_tag.as_deref() == Some(tag_name)
            {
                let index = self.index;
                self.parse_end_tag(Some(tag_name), index, index);
            }
        }

        let unary = self.options.platform.is_unary_tag(tag_name) || start_tag.unary_slash;

        let attrs: Vec<Attr> = start_tag
            .attrs
            .iter()
            .map(|raw| {
                let should_decode_newlines = if tag_name == "a" && raw.name == "href" {
                    self.options.should_decode_newlines_for_href
                } else {
                    self.options.should_decode_newlines
                };
                Attr::new(raw.name.clone(), decode_attr(&raw.value, should_decode_newlines))
                    .with_range(Some(SourceRange::new(raw.start, raw.end)))
            })
            .collect();

        if !unary {
            self.stack.push(OpenTag {
                tag: tag_name.to_string(),
                lower_cased_tag: tag_name.to_lowercase(),
            });
            self.last_tag = Some(tag_name.to_string());
        }

        self.handler
            .start(tag_name, attrs, unary, start_tag.start, start_tag.end);
    }

    fn parse_end_tag(&mut self, tag_name: Option<&str>, start: usize, end: usize) {
        let lower_cased_tag_name = tag_name.map(|name| name.to_lowercase());

        // Find the closest opened tag of the same type
        let pos = match &lower_cased_tag_name {
            Some(lower) => self
                .stack
                .iter()
                .rposition(|open| &open.lower_cased_tag == lower),
            // If no tag name is provided, clean shop
            None => Some(0),
        };

        match pos {
            Some(pos) => {
                // Close all the open elements, up the stack
                for i in (pos..self.stack.len()).rev() {
                    log::trace!("closing <{}> at {}", self.stack[i].tag, start);
                    let tag = self.stack[i].tag.clone();
                    self.handler.end(&tag, start, end);
                }
                self.stack.truncate(pos);
                self.last_tag = self.stack.last().map(|open| open.tag.clone());
            }
            None => {
                let (Some(name), Some(lower)) = (tag_name, lower_cased_tag_name.as_deref()) else {
                    return;
                };
                if lower == "br" {
                    self.handler.start(name, Vec::new(), true, start, end);
                } else if lower == "p" {
                    self.handler.start(name, Vec::new(), false, start, end);
                    self.handler.end(name, start, end);
                }
            }
        }
    }
}

fn starts_construct(text: &str) -> bool {
    END_TAG.is_match(text)
        || START_TAG_OPEN.is_match(text)
        || text.starts_with(COMMENT_OPEN)
        || text.starts_with(CONDITIONAL_COMMENT_OPEN)
}

/// Locate `</tag...>` case-insensitively. Returns (offset of `</`, offset past `>`).
fn find_raw_text_end(rest: &str, lower_tag: &str) -> Option<(usize, usize)> {
    let haystack = rest.to_ascii_lowercase();
    let needle = format!("</{}", lower_tag);
    let text_end = haystack.find(&needle)?;
    let close = haystack[text_end + needle.len()..].find('>')?;
    Some((text_end, text_end + needle.len() + close + 1))
}
