//! Text Interpolation
//!
//! Splits `literal {{ exp }} literal` text into tokens and builds the concatenation
//! expression used by the generator.

use super::ast::TextToken;
use super::filter_parser::parse_filters;
use crate::codegen::escape::json_string;
use once_cell::sync::Lazy;
use regex::Regex;

static DEFAULT_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{\{(.+?)\}\}").unwrap());

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedText {
    /// `"lit"+_s(exp)+...`
    pub expression: String,
    pub tokens: Vec<TextToken>,
}

/// Interpolation matcher for one set of delimiters
#[derive(Debug, Clone)]
pub struct TextParser {
    tag_re: Regex,
}

impl Default for TextParser {
    fn default() -> Self {
        TextParser {
            tag_re: DEFAULT_TAG_RE.clone(),
        }
    }
}

impl TextParser {
    pub fn new(delimiters: Option<&(String, String)>) -> Self {
        match delimiters {
            Some((open, close)) => {
                let pattern = format!(
                    "(?s){}(.+?){}",
                    regex::escape(open),
                    regex::escape(close)
                );
                match Regex::new(&pattern) {
                    Ok(tag_re) => TextParser { tag_re },
                    Err(err) => {
                        log::warn!("unusable delimiters {:?}: {}", delimiters, err);
                        TextParser::default()
                    }
                }
            }
            None => TextParser::default(),
        }
    }

    /// `None` when `text` carries no interpolation
    pub fn parse(&self, text: &str) -> Option<ParsedText> {
        if !self.tag_re.is_match(text) {
            return None;
        }
        let mut expression = Vec::new();
        let mut tokens = Vec::new();
        let mut last_index = 0;

        for caps in self.tag_re.captures_iter(text) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if whole.start() > last_index {
                let literal = &text[last_index..whole.start()];
                expression.push(json_string(literal));
                tokens.push(TextToken::Literal(literal.to_string()));
            }
            let exp = parse_filters(inner.as_str().trim());
            expression.push(format!("_s({})", exp));
            tokens.push(TextToken::Binding { binding: exp });
            last_index = whole.end();
        }

        if last_index < text.len() {
            let literal = &text[last_index..];
            expression.push(json_string(literal));
            tokens.push(TextToken::Literal(literal.to_string()));
        }

        Some(ParsedText {
            expression: expression.join("+"),
            tokens,
        })
    }
}

/// Parse with the given delimiters (default `{{ }}`)
pub fn parse_text(text: &str, delimiters: Option<&(String, String)>) -> Option<ParsedText> {
    TextParser::new(delimiters).parse(text)
}
