//! Template AST
//!
//! The tree is stored in an arena (`Ast::nodes`) and nodes refer to each other by
//! `NodeId`. Parent links are plain indices, so routing a node into a slot map or a
//! condition chain only rewrites indices and never moves the node itself.

use crate::parse_util::SourceRange;
use indexmap::IndexMap;
use serde::Serialize;

pub use crate::ml_parser::html_parser::Attr;

/// Index of a node inside `Ast::nodes`
pub type NodeId = usize;

/// Modifier set parsed from `.a.b` suffixes
pub type Modifiers = IndexMap<String, bool>;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Ast {
    pub nodes: Vec<AstNode>,
    pub root: Option<NodeId>,
}

impl Ast {
    pub fn new() -> Self {
        Ast::default()
    }

    pub fn push(&mut self, node: AstNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn node(&self, id: NodeId) -> &AstNode {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut AstNode {
        &mut self.nodes[id]
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.nodes.get(id) {
            Some(AstNode::Element(el)) => Some(el),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match self.nodes.get_mut(id) {
            Some(AstNode::Element(el)) => Some(el),
            _ => None,
        }
    }

    /// Element at `id`.
    ///
    /// Panics if `id` addresses a text or expression node; callers only use it on ids
    /// taken from element-only positions (roots, condition blocks, slot maps, parents).
    pub fn el(&self, id: NodeId) -> &Element {
        self.element(id)
            .unwrap_or_else(|| panic!("AST node {} is not an element", id))
    }

    /// Mutable variant of [`Ast::el`]
    pub fn el_mut(&mut self, id: NodeId) -> &mut Element {
        self.element_mut(id)
            .unwrap_or_else(|| panic!("AST node {} is not an element", id))
    }

    pub fn root_element(&self) -> Option<&Element> {
        self.root.and_then(|id| self.element(id))
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.nodes.get(id), Some(AstNode::Element(_)))
    }

    /// Walk up the parent chain starting at `id` (inclusive)
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            ast: self,
            next: Some(id),
        }
    }
}

pub struct Ancestors<'a> {
    ast: &'a Ast,
    next: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = (NodeId, &'a Element);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let el = self.ast.element(id)?;
        self.next = el.parent;
        Some((id, el))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum AstNode {
    Element(Element),
    Expression(ExpressionNode),
    Text(TextNode),
}

impl AstNode {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            AstNode::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn is_static(&self) -> bool {
        match self {
            AstNode::Element(el) => el.is_static,
            AstNode::Expression(exp) => exp.is_static,
            AstNode::Text(text) => text.is_static,
        }
    }

    pub fn set_static(&mut self, value: bool) {
        match self {
            AstNode::Element(el) => el.is_static = value,
            AstNode::Expression(exp) => exp.is_static = value,
            AstNode::Text(text) => text.is_static = value,
        }
    }

    /// Literal text of a text node, `None` for other kinds
    pub fn text(&self) -> Option<&str> {
        match self {
            AstNode::Text(text) => Some(&text.text),
            _ => None,
        }
    }
}

/// Interpolated text, e.g. `hello {{ name }}`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionNode {
    pub expression: String,
    pub tokens: Vec<TextToken>,
    pub text: String,
    #[serde(rename = "static")]
    pub is_static: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<SourceRange>,
}

/// Plain text or a retained comment
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextNode {
    pub text: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_comment: bool,
    #[serde(rename = "static")]
    pub is_static: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<SourceRange>,
}

impl TextNode {
    pub fn new(text: impl Into<String>) -> Self {
        TextNode {
            text: text.into(),
            is_comment: false,
            is_static: false,
            range: None,
        }
    }

    pub fn comment(text: impl Into<String>) -> Self {
        TextNode {
            is_comment: true,
            ..TextNode::new(text)
        }
    }
}

/// Fragment of interpolated text
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TextToken {
    Literal(String),
    Binding {
        #[serde(rename = "@binding")]
        binding: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForClause {
    #[serde(rename = "for")]
    pub for_exp: String,
    pub alias: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterator1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterator2: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfCondition {
    pub exp: Option<String>,
    pub block: NodeId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Handler {
    pub value: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dynamic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<Modifiers>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<SourceRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Directive {
    pub name: String,
    pub raw_name: String,
    pub value: String,
    pub arg: Option<String>,
    pub is_dynamic_arg: bool,
    pub modifiers: Option<Modifiers>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<SourceRange>,
}

impl Directive {
    pub fn has_modifier(&self, name: &str) -> bool {
        self.modifiers
            .as_ref()
            .map_or(false, |m| m.get(name).copied().unwrap_or(false))
    }
}

/// Two-way binding on a component (`v-model`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelBinding {
    pub value: String,
    pub expression: String,
    pub callback: String,
}

/// Object-form `v-bind="obj"`, merged into the data object at runtime
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BindWrapper {
    pub value: String,
    pub prop: bool,
    pub sync: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub tag: String,
    pub attrs_list: Vec<Attr>,
    pub attrs_map: IndexMap<String, String>,
    pub raw_attrs_map: IndexMap<String, Attr>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<SourceRange>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ns: Option<&'static str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub forbidden: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub pre: bool,
    pub plain: bool,
    /// Set by a pre-transform that already handled the element
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub processed: bool,

    // structural directives
    #[serde(flatten)]
    pub for_clause: Option<ForClause>,
    #[serde(rename = "if", skip_serializing_if = "Option::is_none")]
    pub if_exp: Option<String>,
    #[serde(rename = "elseif", skip_serializing_if = "Option::is_none")]
    pub else_if: Option<String>,
    #[serde(rename = "else", skip_serializing_if = "std::ops::Not::not")]
    pub is_else: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub if_conditions: Vec<IfCondition>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub once: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub ref_name: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub ref_in_for: bool,

    // slots
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_target: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub slot_target_dynamic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_scope: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub scoped_slots: IndexMap<String, NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub inline_template: bool,

    // attribute classification
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub has_bindings: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attrs: Vec<Attr>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dynamic_attrs: Vec<Attr>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub props: Vec<Attr>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub events: IndexMap<String, Vec<Handler>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub native_events: IndexMap<String, Vec<Handler>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,

    // class / style modules
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_binding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_binding: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelBinding>,
    #[serde(skip)]
    pub wrap_data: Option<BindWrapper>,
    #[serde(skip)]
    pub wrap_listeners: Option<String>,

    /// Free-form data owned by custom modules
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub module_data: IndexMap<String, String>,

    // set by the optimizer
    #[serde(rename = "static")]
    pub is_static: bool,
    pub static_root: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub static_in_for: bool,
}

impl Element {
    pub fn new(tag: impl Into<String>, attrs: Vec<Attr>, parent: Option<NodeId>) -> Self {
        let attrs_map = attrs
            .iter()
            .map(|attr| (attr.name.clone(), attr.value.clone()))
            .collect();
        let raw_attrs_map = attrs
            .iter()
            .map(|attr| (attr.name.clone(), attr.clone()))
            .collect();
        Element {
            tag: tag.into(),
            attrs_list: attrs,
            attrs_map,
            raw_attrs_map,
            parent,
            ..Element::default()
        }
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs_map.contains_key(name)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs_map.get(name).map(String::as_str)
    }

    /// Names of the populated fields, in the vocabulary of the static-key whitelist.
    ///
    /// Optimizer flags are not reported so that re-running the analysis sees the same
    /// key set.
    pub fn defined_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = vec![
            "type",
            "tag",
            "attrsList",
            "attrsMap",
            "rawAttrsMap",
            "children",
        ];
        let mut flag = |present: bool, key: &'static str| {
            if present {
                keys.push(key);
            }
        };
        flag(self.parent.is_some(), "parent");
        flag(self.range.is_some(), "start");
        flag(self.range.is_some(), "end");
        flag(self.ns.is_some(), "ns");
        flag(self.forbidden, "forbidden");
        flag(self.pre, "pre");
        flag(self.plain, "plain");
        flag(self.processed, "processed");
        flag(self.for_clause.is_some(), "for");
        flag(self.for_clause.is_some(), "alias");
        flag(
            self.for_clause
                .as_ref()
                .map_or(false, |f| f.iterator1.is_some()),
            "iterator1",
        );
        flag(
            self.for_clause
                .as_ref()
                .map_or(false, |f| f.iterator2.is_some()),
            "iterator2",
        );
        flag(self.if_exp.is_some(), "if");
        flag(self.else_if.is_some(), "elseif");
        flag(self.is_else, "else");
        flag(!self.if_conditions.is_empty(), "ifConditions");
        flag(self.once, "once");
        flag(self.key.is_some(), "key");
        flag(self.ref_name.is_some(), "ref");
        flag(self.ref_name.is_some(), "refInFor");
        flag(self.slot_target.is_some(), "slotTarget");
        flag(self.slot_target.is_some(), "slotTargetDynamic");
        flag(
            self.slot_scope.is_some() || self.tag == "template",
            "slotScope",
        );
        flag(!self.scoped_slots.is_empty(), "scopedSlots");
        flag(self.tag == "slot", "slotName");
        flag(self.component.is_some(), "component");
        flag(self.inline_template, "inlineTemplate");
        flag(self.has_bindings, "hasBindings");
        flag(!self.attrs.is_empty(), "attrs");
        flag(!self.dynamic_attrs.is_empty(), "dynamicAttrs");
        flag(!self.props.is_empty(), "props");
        flag(!self.events.is_empty(), "events");
        flag(!self.native_events.is_empty(), "nativeEvents");
        flag(!self.directives.is_empty(), "directives");
        flag(self.static_class.is_some(), "staticClass");
        flag(self.class_binding.is_some(), "classBinding");
        flag(self.static_style.is_some(), "staticStyle");
        flag(self.style_binding.is_some(), "styleBinding");
        flag(self.model.is_some(), "model");
        keys.extend(self.module_data.keys().map(String::as_str));
        keys
    }
}
