//! Parse Utilities
//!
//! Source ranges and the diagnostics collected while compiling a template.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Byte range into the template source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRange {
    pub start: usize,
    pub end: usize,
}

impl SourceRange {
    pub fn new(start: usize, end: usize) -> Self {
        SourceRange { start, end }
    }

    /// Return the source text covered by the range, if it lies inside `source`
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start..self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    /// Structural problem in the template
    Error,
    /// Style suggestion
    Tip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub msg: String,
    pub range: Option<SourceRange>,
    pub level: DiagnosticLevel,
}

impl Diagnostic {
    pub fn error(msg: impl Into<String>, range: Option<SourceRange>) -> Self {
        Diagnostic {
            msg: msg.into(),
            range,
            level: DiagnosticLevel::Error,
        }
    }

    pub fn tip(msg: impl Into<String>, range: Option<SourceRange>) -> Self {
        Diagnostic {
            msg: msg.into(),
            range,
            level: DiagnosticLevel::Tip,
        }
    }

    pub fn is_tip(&self) -> bool {
        self.level == DiagnosticLevel::Tip
    }

    /// Return the source around the diagnostic, up to `max_chars` on each side
    pub fn get_context(&self, source: &str, max_chars: usize) -> Option<(String, String)> {
        let range = self.range?;
        if range.start > source.len() || !source.is_char_boundary(range.start) {
            return None;
        }
        let before: String = {
            let head = &source[..range.start];
            let skip = head.chars().count().saturating_sub(max_chars);
            head.chars().skip(skip).collect()
        };
        let after: String = source[range.start..].chars().take(max_chars).collect();
        Some((before, after))
    }

    pub fn contextual_message(&self, source: &str) -> String {
        match self.get_context(source, 40) {
            Some((before, after)) => {
                let level_str = match self.level {
                    DiagnosticLevel::Tip => "TIP",
                    DiagnosticLevel::Error => "ERROR",
                };
                format!("{} (\"{}[{} ->]{}\")", self.msg, before, level_str, after)
            }
            None => self.msg.clone(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.range {
            Some(range) => write!(f, "{} @{}:{}", self.msg, range.start, range.end),
            None => write!(f, "{}", self.msg),
        }
    }
}

/// Sink the pipeline stages report into. Nothing in the pipeline aborts on a diagnostic.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn warn(&mut self, msg: impl Into<String>, range: Option<SourceRange>) {
        let diagnostic = Diagnostic::error(msg, range);
        log::debug!("template diagnostic: {}", diagnostic);
        self.entries.push(diagnostic);
    }

    pub fn tip(&mut self, msg: impl Into<String>, range: Option<SourceRange>) {
        let diagnostic = Diagnostic::tip(msg, range);
        log::debug!("template tip: {}", diagnostic);
        self.entries.push(diagnostic);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Split into (errors, tips), keeping report order within each list
    pub fn into_split(self) -> (Vec<Diagnostic>, Vec<Diagnostic>) {
        self.entries.into_iter().partition(|d| !d.is_tip())
    }
}
