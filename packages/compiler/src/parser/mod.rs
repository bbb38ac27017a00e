//! Template Parser
//!
//! Builds the template AST from the scanner's events.
//!
//! The builder keeps a stack of open elements. Structural directives (`v-for`, `v-if`,
//! `v-once`) are pulled out when a start tag arrives; the rest of the element is
//! processed when it closes, at which point it is attached to its parent, routed into
//! a condition chain, or moved into the parent's scoped slot map.

pub mod ast;
pub mod filter_parser;
pub mod helpers;
mod process;
pub mod text_parser;

pub use process::{parse_for, EMPTY_SLOT_SCOPE_TOKEN};
pub(crate) use process::{split_modifiers, BIND_RE, DIR_RE, ON_RE};

use crate::config::{CompilerOptions, WhitespaceMode};
use crate::ml_parser::entities::decode_html;
use crate::ml_parser::html_parser::{parse_html, HtmlHandler, HtmlParserOptions};
use crate::modules::TransformContext;
use crate::parse_util::{Diagnostics, SourceRange};
use crate::platform::Platform;
use ast::{Ast, AstNode, Attr, Element, ExpressionNode, IfCondition, NodeId, TextNode};
use once_cell::sync::Lazy;
use regex::Regex;
use text_parser::TextParser;

static LINE_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n]").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \f\t\r\n]+").unwrap());
static INVALID_ATTRIBUTE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[\s"'<>/=]"#).unwrap());

/// Parse `template` into an AST. Problems are reported to `diagnostics`; parsing
/// itself never fails.
pub fn parse(template: &str, options: &CompilerOptions, diagnostics: &mut Diagnostics) -> Ast {
    let html_options = HtmlParserOptions {
        platform: options.platform.as_ref(),
        expect_html: options.expect_html,
        should_decode_newlines: options.should_decode_newlines,
        should_decode_newlines_for_href: options.should_decode_newlines_for_href,
        should_keep_comment: options.comments,
    };
    let mut builder = TreeBuilder::new(template, options, diagnostics);
    parse_html(template, &html_options, &mut builder);
    builder.ast
}

/// Whether `el` may render as a component rather than a platform tag
pub fn maybe_component(el: &Element, platform: &dyn Platform) -> bool {
    el.component.is_some()
        || el.has_attr(":is")
        || el.has_attr("v-bind:is")
        || !match el.attr("is") {
            Some(is) => platform.is_reserved_tag(is),
            None => platform.is_reserved_tag(&el.tag),
        }
}

fn is_forbidden_tag(el: &Element) -> bool {
    el.tag == "style"
        || (el.tag == "script"
            && el
                .attr("type")
                .map_or(true, |ty| ty.is_empty() || ty == "text/javascript"))
}

/// Text of script and style is never entity-decoded
fn is_text_tag(el: &Element) -> bool {
    el.tag == "script" || el.tag == "style"
}

/// Literal text of text and expression nodes
fn node_text(node: &AstNode) -> Option<&str> {
    match node {
        AstNode::Text(text) => Some(&text.text),
        AstNode::Expression(exp) => Some(&exp.text),
        AstNode::Element(_) => None,
    }
}

struct TreeBuilder<'a> {
    template: &'a str,
    options: &'a CompilerOptions,
    diagnostics: &'a mut Diagnostics,
    text_parser: TextParser,
    ast: Ast,
    stack: Vec<NodeId>,
    current_parent: Option<NodeId>,
    in_v_pre: bool,
    in_pre: bool,
    warned: bool,
}

impl<'a> TreeBuilder<'a> {
    fn new(template: &'a str, options: &'a CompilerOptions, diagnostics: &'a mut Diagnostics) -> Self {
        TreeBuilder {
            template,
            options,
            diagnostics,
            text_parser: TextParser::new(options.delimiters.as_ref()),
            ast: Ast::new(),
            stack: Vec::new(),
            current_parent: None,
            in_v_pre: false,
            in_pre: false,
            warned: false,
        }
    }

    fn warn_once(&mut self, msg: impl Into<String>, range: Option<SourceRange>) {
        if !self.warned {
            self.warned = true;
            self.diagnostics.warn(msg, range);
        }
    }

    fn check_root_constraints(&mut self, id: NodeId) {
        if !self.warned {
            self.warned = process::check_root_constraints(self.ast.el(id), self.diagnostics);
        }
    }

    fn trim_ending_whitespace(&mut self, id: NodeId) {
        if self.in_pre {
            return;
        }
        loop {
            let el = self.ast.el(id);
            let trailing_space = el.children.last().map_or(false, |&last| {
                matches!(self.ast.node(last), AstNode::Text(text) if text.text == " ")
            });
            if !trailing_space {
                break;
            }
            self.ast.el_mut(id).children.pop();
        }
    }

    fn close_element(&mut self, id: NodeId) {
        self.trim_ending_whitespace(id);
        if !self.in_v_pre && !self.ast.el(id).processed {
            let mut ctx = TransformContext::new(self.options, &mut *self.diagnostics);
            process::process_element(&mut self.ast, id, &mut ctx);
        }

        // a second top-level element is only allowed as a branch of the root's v-if
        if self.stack.is_empty() && self.ast.root != Some(id) {
            let root_has_if = self
                .ast
                .root_element()
                .map_or(false, |root| root.if_exp.is_some());
            let el = self.ast.el(id);
            let is_branch = el.else_if.is_some() || el.is_else;
            if root_has_if && is_branch {
                let exp = el.else_if.clone();
                self.check_root_constraints(id);
                if let Some(root) = self.ast.root {
                    self.ast
                        .el_mut(root)
                        .if_conditions
                        .push(IfCondition { exp, block: id });
                }
            } else {
                let range = el.range.map(|r| SourceRange::new(r.start, r.start));
                self.warn_once(
                    "Component template should contain exactly one root element. \
                     If you are using v-if on multiple elements, use v-else-if to chain them instead.",
                    range,
                );
            }
        }

        if let Some(parent) = self.current_parent {
            let el = self.ast.el(id);
            if !el.forbidden {
                if el.else_if.is_some() || el.is_else {
                    self.process_if_conditions(id, parent);
                } else {
                    if el.slot_scope.is_some() {
                        let name = el
                            .slot_target
                            .clone()
                            .unwrap_or_else(|| "\"default\"".to_string());
                        self.ast.el_mut(parent).scoped_slots.insert(name, id);
                    }
                    self.ast.el_mut(parent).children.push(id);
                    self.ast.el_mut(id).parent = Some(parent);
                }
            }
        }

        // slot content lives in the scoped slot map only
        let children = std::mem::take(&mut self.ast.el_mut(id).children);
        let children = children
            .into_iter()
            .filter(|&child| {
                self.ast
                    .element(child)
                    .map_or(true, |child| child.slot_scope.is_none())
            })
            .collect();
        self.ast.el_mut(id).children = children;
        self.trim_ending_whitespace(id);

        let el = self.ast.el(id);
        if el.pre {
            self.in_v_pre = false;
        }
        if self.options.platform.is_pre_tag(&el.tag) {
            self.in_pre = false;
        }

        let options = self.options;
        let mut ctx = TransformContext::new(options, &mut *self.diagnostics);
        let el = self.ast.el_mut(id);
        for module in &options.modules {
            module.post_transform_node(el, &mut ctx);
        }
    }

    /// Attach a `v-else(-if)` element to the chain of the closest preceding `v-if`
    fn process_if_conditions(&mut self, id: NodeId, parent: NodeId) {
        let prev = self.find_prev_element(parent);
        let el = self.ast.el(id);
        let exp = el.else_if.clone();
        match prev {
            Some(prev) if self.ast.el(prev).if_exp.is_some() => {
                self.ast
                    .el_mut(prev)
                    .if_conditions
                    .push(IfCondition { exp, block: id });
            }
            _ => {
                let directive = match &el.else_if {
                    Some(else_if) => format!("else-if=\"{}\"", else_if),
                    None => "else".to_string(),
                };
                let range = el
                    .raw_attrs_map
                    .get(if el.else_if.is_some() { "v-else-if" } else { "v-else" })
                    .and_then(|attr| attr.range);
                let msg = format!(
                    "v-{} used on element <{}> without corresponding v-if.",
                    directive, el.tag
                );
                self.diagnostics.warn(msg, range);
            }
        }
    }

    /// Last element child of `parent`, dropping any text that follows it
    fn find_prev_element(&mut self, parent: NodeId) -> Option<NodeId> {
        while let Some(&last) = self.ast.el(parent).children.last() {
            let node = self.ast.node(last);
            if matches!(node, AstNode::Element(_)) {
                return Some(last);
            }
            if let Some(text) = node_text(node) {
                if text != " " {
                    let range = match node {
                        AstNode::Text(text) => text.range,
                        AstNode::Expression(exp) => exp.range,
                        AstNode::Element(_) => None,
                    };
                    let msg = format!(
                        "text \"{}\" between v-if and v-else(-if) will be ignored.",
                        text.trim()
                    );
                    self.diagnostics.warn(msg, range);
                }
            }
            self.ast.el_mut(parent).children.pop();
        }
        None
    }

    fn text_for(&self, parent: &Element, text: &str) -> String {
        if self.in_pre || !text.trim().is_empty() {
            return if is_text_tag(parent) {
                text.to_string()
            } else {
                decode_html(text)
            };
        }
        if parent.children.is_empty() {
            return String::new();
        }
        match self.options.whitespace {
            Some(WhitespaceMode::Condense) => {
                if LINE_BREAK_RE.is_match(text) {
                    String::new()
                } else {
                    " ".to_string()
                }
            }
            Some(WhitespaceMode::Preserve) => " ".to_string(),
            None if self.options.preserve_whitespace => " ".to_string(),
            None => String::new(),
        }
    }
}

impl<'a> HtmlHandler for TreeBuilder<'a> {
    fn start(&mut self, tag: &str, attrs: Vec<Attr>, unary: bool, start: usize, end: usize) {
        log::trace!("tree builder: <{}> unary={}", tag, unary);
        let options = self.options;
        let platform = options.platform.as_ref();
        let ns = self
            .current_parent
            .and_then(|parent| self.ast.el(parent).ns)
            .or_else(|| platform.get_tag_namespace(tag));

        let mut element = Element::new(tag, attrs, self.current_parent);
        element.ns = ns;
        element.range = Some(SourceRange::new(start, end));

        for attr in &element.attrs_list {
            if INVALID_ATTRIBUTE_RE.is_match(&attr.name) {
                self.diagnostics.warn(
                    "Invalid dynamic argument expression: attribute names cannot contain \
                     spaces, quotes, <, >, / or =.",
                    attr.range,
                );
            }
        }

        if is_forbidden_tag(&element) {
            element.forbidden = true;
            self.diagnostics.warn(
                format!(
                    "Templates should only be responsible for mapping the state to the UI. \
                     Avoid placing tags with side-effects in your templates, such as <{}>, \
                     as they will not be parsed.",
                    tag
                ),
                Some(SourceRange::new(start, start)),
            );
        }

        {
            let mut ctx = TransformContext::new(options, &mut *self.diagnostics);
            for module in &options.modules {
                module.pre_transform_node(&mut element, &mut ctx);
            }
        }

        let id = self.ast.push(AstNode::Element(element));
        let el = self.ast.el_mut(id);

        if !self.in_v_pre {
            process::process_pre(el);
            if el.pre {
                self.in_v_pre = true;
            }
        }
        if platform.is_pre_tag(&el.tag) {
            self.in_pre = true;
        }
        if self.in_v_pre {
            process::process_raw_attrs(el);
        } else if !el.processed {
            process::process_for(el, self.diagnostics);
            process::process_if(el, id);
            process::process_once(el);
        }

        if self.ast.root.is_none() {
            self.ast.root = Some(id);
            self.check_root_constraints(id);
        }

        if unary {
            self.close_element(id);
        } else {
            self.current_parent = Some(id);
            self.stack.push(id);
        }
    }

    fn end(&mut self, tag: &str, _start: usize, end: usize) {
        log::trace!("tree builder: </{}>", tag);
        let Some(id) = self.stack.pop() else {
            return;
        };
        self.current_parent = self.stack.last().copied();
        if let Some(range) = self.ast.el_mut(id).range.as_mut() {
            range.end = end;
        }
        self.close_element(id);
    }

    fn chars(&mut self, text: &str, start: usize, end: usize) {
        let Some(parent) = self.current_parent else {
            if text == self.template {
                self.warn_once(
                    "Component template requires a root element, rather than just text.",
                    Some(SourceRange::new(start, start)),
                );
            } else if !text.trim().is_empty() {
                let msg = format!("text \"{}\" outside root element will be ignored.", text.trim());
                self.warn_once(msg, Some(SourceRange::new(start, start)));
            }
            return;
        };

        let parent_el = self.ast.el(parent);
        let mut text = self.text_for(parent_el, text);
        if text.is_empty() {
            return;
        }
        if !self.in_pre && self.options.whitespace == Some(WhitespaceMode::Condense) {
            text = WHITESPACE_RE.replace_all(&text, " ").into_owned();
        }

        let range = Some(SourceRange::new(start, end));
        let parsed = if !self.in_v_pre && text != " " {
            self.text_parser.parse(&text)
        } else {
            None
        };

        let child = match parsed {
            Some(parsed) => Some(AstNode::Expression(ExpressionNode {
                expression: parsed.expression,
                tokens: parsed.tokens,
                text,
                is_static: false,
                range,
            })),
            None => {
                let last_is_space = parent_el
                    .children
                    .last()
                    .and_then(|&last| node_text(self.ast.node(last)))
                    == Some(" ");
                if text != " " || !last_is_space {
                    Some(AstNode::Text(TextNode {
                        range,
                        ..TextNode::new(text)
                    }))
                } else {
                    None
                }
            }
        };

        if let Some(child) = child {
            let id = self.ast.push(child);
            self.ast.el_mut(parent).children.push(id);
        }
    }

    fn comment(&mut self, text: &str, start: usize, end: usize) {
        // comments never become siblings of the root
        if let Some(parent) = self.current_parent {
            let id = self.ast.push(AstNode::Text(TextNode {
                range: Some(SourceRange::new(start, end)),
                ..TextNode::comment(text)
            }));
            self.ast.el_mut(parent).children.push(id);
        }
    }
}
