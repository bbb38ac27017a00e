//! Static Tree Optimizer
//!
//! Marks the sub-trees that can never change between renders so the generator can
//! hoist them into static render functions and the runtime can skip them when
//! patching.
//!
//! 1. `mark_static` flags every node that is static, bottom up.
//! 2. `mark_static_roots` picks the static elements worth hoisting.

use crate::config::CompilerOptions;
use crate::ml_parser::html_tags::is_built_in_tag;
use crate::parser::ast::{Ast, AstNode, Element, NodeId};
use crate::platform::Platform;
use std::collections::HashSet;

const BASE_STATIC_KEYS: &str =
    "type,tag,attrsList,attrsMap,plain,parent,children,attrs,start,end,rawAttrsMap";

/// Mark static nodes and static roots of `ast` in place
pub fn optimize(ast: &mut Ast, options: &CompilerOptions) {
    let Some(root) = ast.root else {
        return;
    };
    let optimizer = Optimizer::new(options);
    optimizer.mark_static(ast, root);
    optimizer.mark_static_roots(ast, root, false);
}

struct Optimizer<'a> {
    static_keys: HashSet<&'a str>,
    platform: &'a dyn Platform,
}

impl<'a> Optimizer<'a> {
    fn new(options: &'a CompilerOptions) -> Self {
        let static_keys = BASE_STATIC_KEYS
            .split(',')
            .chain(options.static_keys.split(','))
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .collect();
        Optimizer {
            static_keys,
            platform: options.platform.as_ref(),
        }
    }

    fn is_static(&self, ast: &Ast, node: &AstNode) -> bool {
        match node {
            AstNode::Expression(_) => false,
            AstNode::Text(_) => true,
            AstNode::Element(el) => {
                el.pre
                    || (!el.has_bindings
                        && el.if_exp.is_none()
                        && el.for_clause.is_none()
                        && !is_built_in_tag(&el.tag)
                        && self.platform.is_reserved_tag(&el.tag)
                        && !is_direct_child_of_template_for(ast, el)
                        && el
                            .defined_keys()
                            .iter()
                            .all(|key| self.static_keys.contains(key)))
            }
        }
    }

    fn mark_static(&self, ast: &mut Ast, id: NodeId) {
        let is_static = self.is_static(ast, ast.node(id));
        ast.node_mut(id).set_static(is_static);

        let Some(el) = ast.element(id) else {
            return;
        };
        // component and slot content stays dynamic so the owner can replace it
        if (!self.platform.is_reserved_tag(&el.tag) && !el.has_attr("inline-template"))
            || el.tag == "slot"
        {
            return;
        }

        let children = el.children.clone();
        let branches: Vec<NodeId> = el.if_conditions.iter().skip(1).map(|c| c.block).collect();
        for child in children.into_iter().chain(branches) {
            self.mark_static(ast, child);
            if !ast.node(child).is_static() {
                ast.node_mut(id).set_static(false);
            }
        }
    }

    fn mark_static_roots(&self, ast: &mut Ast, id: NodeId, in_for: bool) {
        let Some(el) = ast.element(id) else {
            return;
        };
        let single_text_child = el.children.len() == 1
            && matches!(ast.node(el.children[0]), AstNode::Text(_));

        let el = ast.el_mut(id);
        if el.is_static || el.once {
            el.static_in_for = in_for;
        }
        if el.is_static && !el.children.is_empty() && !single_text_child {
            el.static_root = true;
            return;
        }
        el.static_root = false;

        let in_for = in_for || el.for_clause.is_some();
        let children = el.children.clone();
        let branches: Vec<NodeId> = el.if_conditions.iter().skip(1).map(|c| c.block).collect();
        for child in children.into_iter().chain(branches) {
            self.mark_static_roots(ast, child, in_for);
        }
    }
}

fn is_direct_child_of_template_for(ast: &Ast, el: &Element) -> bool {
    let mut parent = el.parent;
    while let Some(id) = parent {
        let Some(node) = ast.element(id) else {
            return false;
        };
        if node.tag != "template" {
            return false;
        }
        if node.for_clause.is_some() {
            return true;
        }
        parent = node.parent;
    }
    false
}
