//! Render Code Generation
//!
//! Turns an optimized AST into the source of a render function plus the bodies of
//! the hoisted static render functions. The generated code calls the runtime render
//! helpers (`_c`, `_v`, `_s`, `_l`, `_t`, `_m`, `_o`, `_u`, `_b`, `_g`, `_d`, `_e`)
//! and is evaluated inside `with(this){...}`.
//!
//! The AST is never modified here. Which structural directive an element still has
//! to be wrapped in is tracked in a side table of [`Processed`] flags, so the same
//! element can be re-entered after its `v-for`, `v-if` or `v-once` wrapper has been
//! emitted.

pub mod escape;
pub mod events;

use crate::config::{BindingMetadata, BindingType, CompilerOptions};
use crate::directives::{base_directives, DirectiveRegistry};
use crate::modules::TransformContext;
use crate::parse_util::Diagnostics;
use crate::parser::ast::{Ast, AstNode, Attr, Element, IfCondition, NodeId};
use crate::parser::helpers::attr_range;
use crate::parser::EMPTY_SLOT_SCOPE_TOKEN;
use crate::util::{camelize, capitalize};
use bitflags::bitflags;
use escape::{json_string, source_string, transform_special_newlines};
use serde::Serialize;

bitflags! {
    /// Structural wrappers already emitted for an element
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Processed: u8 {
        const STATIC = 1;
        const ONCE = 1 << 1;
        const FOR = 1 << 2;
        const IF = 1 << 3;
    }
}

/// Which generator an element is routed to next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Static,
    Once,
    For,
    If,
    TemplateChildren,
    Slot,
    Component,
    Element,
}

/// Route an element given the wrappers already emitted for it.
///
/// `in_static_pre` is set while generating a hoisted tree that lives under `v-pre`,
/// where a `<template>` is rendered as a real element.
pub fn dispatch(el: &Element, processed: Processed, in_static_pre: bool) -> Dispatch {
    if el.static_root && !processed.contains(Processed::STATIC) {
        Dispatch::Static
    } else if el.once && !processed.contains(Processed::ONCE) {
        Dispatch::Once
    } else if el.for_clause.is_some() && !processed.contains(Processed::FOR) {
        Dispatch::For
    } else if el.if_exp.is_some() && !processed.contains(Processed::IF) {
        Dispatch::If
    } else if el.tag == "template" && el.slot_target.is_none() && !in_static_pre {
        Dispatch::TemplateChildren
    } else if el.tag == "slot" {
        Dispatch::Slot
    } else if el.component.is_some() {
        Dispatch::Component
    } else {
        Dispatch::Element
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodegenResult {
    pub render: String,
    pub static_render_fns: Vec<String>,
}

/// Generate the render code for `ast`
pub fn generate(ast: &Ast, options: &CompilerOptions, diagnostics: &mut Diagnostics) -> CodegenResult {
    CodegenState::new(ast, options, diagnostics).generate_root(ast.root)
}

/// Generator used for a node reached from an `if` or `for` wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GenMode {
    Element,
    ScopedSlot,
}

struct CodegenState<'a> {
    ast: &'a Ast,
    options: &'a CompilerOptions,
    diagnostics: &'a mut Diagnostics,
    directives: DirectiveRegistry,
    processed: Vec<Processed>,
    once_id: usize,
    static_render_fns: Vec<String>,
    pre: bool,
}

impl<'a> CodegenState<'a> {
    fn new(ast: &'a Ast, options: &'a CompilerOptions, diagnostics: &'a mut Diagnostics) -> Self {
        CodegenState {
            ast,
            options,
            diagnostics,
            directives: base_directives().layered(&options.directives),
            processed: vec![Processed::empty(); ast.nodes.len()],
            once_id: 0,
            static_render_fns: Vec::new(),
            pre: false,
        }
    }

    fn generate_root(mut self, root: Option<NodeId>) -> CodegenResult {
        let ast = self.ast;
        let code = match root.and_then(|id| ast.element(id).map(|el| (id, el))) {
            Some((_, el)) if el.tag == "script" => "null".to_string(),
            Some((id, _)) => self.gen_element(id),
            None => "_c(\"div\")".to_string(),
        };
        CodegenResult {
            render: format!("with(this){{return {}}}", code),
            static_render_fns: self.static_render_fns,
        }
    }

    fn is_processed(&self, id: NodeId, flag: Processed) -> bool {
        self.processed[id].contains(flag)
    }

    fn mark(&mut self, id: NodeId, flag: Processed) {
        self.processed[id].insert(flag);
    }

    fn maybe_component(&self, el: &Element) -> bool {
        el.component.is_some() || !self.options.platform.is_reserved_tag(&el.tag)
    }

    /// `v-pre` applies to the whole subtree below the marked element
    fn in_pre(&self, id: NodeId) -> bool {
        self.ast.ancestors(id).any(|(_, el)| el.pre)
    }

    fn gen_element(&mut self, id: NodeId) -> String {
        let ast = self.ast;
        let el = ast.el(id);
        let branch = dispatch(el, self.processed[id], self.pre);
        log::trace!("codegen <{}> as {:?}", el.tag, branch);
        match branch {
            Dispatch::Static => self.gen_static(id),
            Dispatch::Once => self.gen_once(id),
            Dispatch::For => self.gen_for(id, GenMode::Element),
            Dispatch::If => self.gen_if(id, GenMode::Element, None),
            Dispatch::TemplateChildren => self
                .gen_children(id, false)
                .unwrap_or_else(|| "void 0".to_string()),
            Dispatch::Slot => self.gen_slot(id),
            Dispatch::Component | Dispatch::Element => {
                let code = if branch == Dispatch::Component {
                    self.gen_component(id)
                } else {
                    self.gen_plain_element(id)
                };
                self.options
                    .modules
                    .iter()
                    .fold(code, |code, module| module.transform_code(el, code))
            }
        }
    }

    fn gen_plain_element(&mut self, id: NodeId) -> String {
        let ast = self.ast;
        let el = ast.el(id);
        let data = if !el.plain || (self.in_pre(id) && self.maybe_component(el)) {
            Some(self.gen_data(id))
        } else {
            None
        };
        let tag = self
            .options
            .bindings
            .as_ref()
            .filter(|_| self.maybe_component(el))
            .and_then(|bindings| check_binding_type(bindings, &el.tag))
            .unwrap_or_else(|| format!("'{}'", el.tag));
        let children = if el.inline_template {
            None
        } else {
            self.gen_children(id, true)
        };

        let mut code = format!("_c({}", tag);
        if let Some(data) = data {
            code.push(',');
            code.push_str(&data);
        }
        if let Some(children) = children {
            code.push(',');
            code.push_str(&children);
        }
        code.push(')');
        code
    }

    /// Hoist the subtree into its own render function
    fn gen_static(&mut self, id: NodeId) -> String {
        self.mark(id, Processed::STATIC);
        let original_pre = self.pre;
        if self.in_pre(id) {
            self.pre = true;
        }
        let code = self.gen_element(id);
        self.static_render_fns
            .push(format!("with(this){{return {}}}", code));
        self.pre = original_pre;
        let index = self.static_render_fns.len() - 1;
        if self.ast.el(id).static_in_for {
            format!("_m({},true)", index)
        } else {
            format!("_m({})", index)
        }
    }

    fn gen_once(&mut self, id: NodeId) -> String {
        self.mark(id, Processed::ONCE);
        let ast = self.ast;
        let el = ast.el(id);
        if el.if_exp.is_some() && !self.is_processed(id, Processed::IF) {
            return self.gen_if(id, GenMode::Element, None);
        }
        if !el.static_in_for {
            return self.gen_static(id);
        }

        let key = ast
            .ancestors(id)
            .skip(1)
            .find(|(_, parent)| parent.for_clause.is_some())
            .and_then(|(_, parent)| parent.key.clone())
            .filter(|key| !key.is_empty());
        match key {
            Some(key) => {
                let code = self.gen_element(id);
                let once_id = self.once_id;
                self.once_id += 1;
                format!("_o({},{},{})", code, once_id, key)
            }
            None => {
                let range = attr_range(el, "v-once");
                self.diagnostics.warn(
                    "v-once can only be used inside v-for that is keyed. ",
                    range,
                );
                self.gen_element(id)
            }
        }
    }

    fn gen_if(&mut self, id: NodeId, mode: GenMode, alt_empty: Option<&str>) -> String {
        self.mark(id, Processed::IF);
        let conditions = self.ast.el(id).if_conditions.clone();
        self.gen_if_conditions(&conditions, mode, alt_empty)
    }

    fn gen_if_conditions(
        &mut self,
        conditions: &[IfCondition],
        mode: GenMode,
        alt_empty: Option<&str>,
    ) -> String {
        let Some((first, rest)) = conditions.split_first() else {
            return alt_empty.unwrap_or("_e()").to_string();
        };
        match &first.exp {
            Some(exp) => {
                let consequent = self.gen_ternary_branch(first.block, mode);
                let alternate = self.gen_if_conditions(rest, mode, alt_empty);
                format!("({})?{}:{}", exp, consequent, alternate)
            }
            None => self.gen_ternary_branch(first.block, mode),
        }
    }

    fn gen_ternary_branch(&mut self, id: NodeId, mode: GenMode) -> String {
        match mode {
            GenMode::ScopedSlot => self.gen_scoped_slot(id),
            GenMode::Element if self.ast.el(id).once => self.gen_once(id),
            GenMode::Element => self.gen_element(id),
        }
    }

    fn gen_for(&mut self, id: NodeId, mode: GenMode) -> String {
        let ast = self.ast;
        let el = ast.el(id);
        let Some(clause) = el.for_clause.clone() else {
            return self.gen_with_mode(id, mode);
        };

        if self.maybe_component(el) && el.tag != "slot" && el.tag != "template" && el.key.is_none()
        {
            self.diagnostics.tip(
                format!(
                    "<{} v-for=\"{} in {}\">: component lists rendered with v-for should have \
                     explicit keys. See https://v2.vuejs.org/v2/guide/list.html#key for more info.",
                    el.tag, clause.alias, clause.for_exp
                ),
                attr_range(el, "v-for"),
            );
        }

        self.mark(id, Processed::FOR);
        let mut params = clause.alias.clone();
        for iterator in [&clause.iterator1, &clause.iterator2].into_iter().flatten() {
            params.push(',');
            params.push_str(iterator);
        }
        let body = self.gen_with_mode(id, mode);
        format!(
            "_l(({}),function({}){{return {}}})",
            clause.for_exp, params, body
        )
    }

    fn gen_with_mode(&mut self, id: NodeId, mode: GenMode) -> String {
        match mode {
            GenMode::Element => self.gen_element(id),
            GenMode::ScopedSlot => self.gen_scoped_slot(id),
        }
    }

    fn gen_data(&mut self, id: NodeId) -> String {
        let ast = self.ast;
        // directive handlers may rewrite the element, so they work on a copy
        let mut el = ast.el(id).clone();
        let mut data = String::from("{");

        if let Some(directives) = self.gen_directives(&mut el) {
            data.push_str(&directives);
            data.push(',');
        }
        if let Some(key) = &el.key {
            data.push_str(&format!("key:{},", key));
        }
        if let Some(ref_name) = &el.ref_name {
            data.push_str(&format!("ref:{},", ref_name));
        }
        if el.ref_in_for {
            data.push_str("refInFor:true,");
        }
        if self.in_pre(id) {
            data.push_str("pre:true,");
        }
        if el.component.is_some() {
            data.push_str(&format!("tag:\"{}\",", el.tag));
        }
        for module in &self.options.modules {
            data.push_str(&module.gen_data(&el));
        }
        if !el.attrs.is_empty() {
            data.push_str(&format!("attrs:{},", gen_props(&el.attrs)));
        }
        if !el.props.is_empty() {
            data.push_str(&format!("domProps:{},", gen_props(&el.props)));
        }
        if !el.events.is_empty() {
            data.push_str(&events::gen_handlers(&el.events, false));
            data.push(',');
        }
        if !el.native_events.is_empty() {
            data.push_str(&events::gen_handlers(&el.native_events, true));
            data.push(',');
        }
        // a slot target without scope is a plain named slot
        if let (Some(slot_target), None) = (&el.slot_target, &el.slot_scope) {
            data.push_str(&format!("slot:{},", slot_target));
        }
        if !el.scoped_slots.is_empty() {
            data.push_str(&self.gen_scoped_slots(&el));
            data.push(',');
        }
        if let Some(model) = &el.model {
            data.push_str(&format!(
                "model:{{value:{},callback:{},expression:{}}},",
                model.value, model.callback, model.expression
            ));
        }
        if el.inline_template {
            if let Some(inline_template) = self.gen_inline_template(&el) {
                data.push_str(&inline_template);
                data.push(',');
            }
        }

        if data.ends_with(',') {
            data.pop();
        }
        data.push('}');

        if !el.dynamic_attrs.is_empty() {
            data = format!(
                "_b({},\"{}\",{})",
                data,
                el.tag,
                gen_props(&el.dynamic_attrs)
            );
        }
        if let Some(wrap) = &el.wrap_data {
            data = format!(
                "_b({},'{}',{},{}{})",
                data,
                el.tag,
                wrap.value,
                wrap.prop,
                if wrap.sync { ",true" } else { "" }
            );
        }
        if let Some(listeners) = &el.wrap_listeners {
            data = format!("_g({},{})", data, listeners);
        }
        data
    }

    fn gen_directives(&mut self, el: &mut Element) -> Option<String> {
        if el.directives.is_empty() {
            return None;
        }
        let directives = el.directives.clone();
        let mut generated = Vec::new();
        for dir in &directives {
            let needs_runtime = match self.directives.get(&dir.name).cloned() {
                Some(handler) => {
                    let mut ctx = TransformContext::new(self.options, &mut *self.diagnostics);
                    handler.transform(el, dir, &mut ctx)
                }
                None => true,
            };
            if !needs_runtime {
                continue;
            }
            let mut code = format!("{{name:\"{}\",rawName:\"{}\"", dir.name, dir.raw_name);
            if !dir.value.is_empty() {
                code.push_str(&format!(
                    ",value:({}),expression:{}",
                    dir.value,
                    json_string(&dir.value)
                ));
            }
            if let Some(arg) = &dir.arg {
                if dir.is_dynamic_arg {
                    code.push_str(&format!(",arg:{}", arg));
                } else {
                    code.push_str(&format!(",arg:\"{}\"", arg));
                }
            }
            if let Some(modifiers) = &dir.modifiers {
                let modifiers = serde_json::to_string(modifiers).unwrap_or_else(|_| "{}".to_string());
                code.push_str(&format!(",modifiers:{}", modifiers));
            }
            code.push('}');
            generated.push(code);
        }
        if generated.is_empty() {
            None
        } else {
            Some(format!("directives:[{}]", generated.join(",")))
        }
    }

    fn gen_inline_template(&mut self, el: &Element) -> Option<String> {
        let ast = self.ast;
        let first = el.children.first().copied();
        let single_element = el.children.len() == 1 && first.is_some_and(|c| ast.is_element(c));
        if !single_element {
            self.diagnostics.warn(
                "Inline-template components must have exactly one child element.",
                el.range,
            );
        }
        let child = first.filter(|&c| ast.is_element(c))?;
        let inline = CodegenState::new(ast, self.options, &mut *self.diagnostics)
            .generate_root(Some(child));
        let static_fns: Vec<String> = inline
            .static_render_fns
            .iter()
            .map(|code| format!("function(){{{}}}", code))
            .collect();
        Some(format!(
            "inlineTemplate:{{render:function(){{{}}},staticRenderFns:[{}]}}",
            inline.render,
            static_fns.join(",")
        ))
    }

    fn gen_scoped_slots(&mut self, el: &Element) -> String {
        let ast = self.ast;
        let slots: Vec<NodeId> = el.scoped_slots.values().copied().collect();

        // slots whose content may change without the owner re-rendering
        let mut needs_force_update = el.for_clause.is_some()
            || slots.iter().any(|&id| {
                let slot = ast.el(id);
                slot.slot_target_dynamic
                    || slot.if_exp.is_some()
                    || slot.for_clause.is_some()
                    || contains_slot_child(ast, id)
            });
        let mut needs_key = el.if_exp.is_some();

        if !needs_force_update {
            let mut parent = el.parent;
            while let Some(id) = parent {
                let Some(ancestor) = ast.element(id) else {
                    break;
                };
                let scoped = ancestor
                    .slot_scope
                    .as_deref()
                    .is_some_and(|scope| scope != EMPTY_SLOT_SCOPE_TOKEN);
                if scoped || ancestor.for_clause.is_some() {
                    needs_force_update = true;
                    break;
                }
                if ancestor.if_exp.is_some() {
                    needs_key = true;
                }
                parent = ancestor.parent;
            }
        }

        let generated: Vec<String> = slots.iter().map(|&id| self.gen_scoped_slot(id)).collect();
        let generated = generated.join(",");
        if needs_force_update {
            format!("scopedSlots:_u([{}],null,true)", generated)
        } else if needs_key {
            format!(
                "scopedSlots:_u([{}],null,false,{})",
                generated,
                hash(&generated)
            )
        } else {
            format!("scopedSlots:_u([{}])", generated)
        }
    }

    fn gen_scoped_slot(&mut self, id: NodeId) -> String {
        let ast = self.ast;
        let el = ast.el(id);
        let is_legacy_syntax = el.attr("slot-scope").is_some_and(|scope| !scope.is_empty());
        if el.if_exp.is_some() && !self.is_processed(id, Processed::IF) && !is_legacy_syntax {
            return self.gen_if(id, GenMode::ScopedSlot, Some("null"));
        }
        if el.for_clause.is_some() && !self.is_processed(id, Processed::FOR) {
            return self.gen_for(id, GenMode::ScopedSlot);
        }

        let slot_scope = match el.slot_scope.as_deref() {
            Some(EMPTY_SLOT_SCOPE_TOKEN) => "",
            Some(scope) => scope,
            None => "undefined",
        };
        let body = if el.tag == "template" {
            let children = self
                .gen_children(id, false)
                .unwrap_or_else(|| "undefined".to_string());
            match &el.if_exp {
                Some(exp) if is_legacy_syntax => format!("({})?{}:undefined", exp, children),
                _ => children,
            }
        } else {
            self.gen_element(id)
        };
        let reverse_proxy = if slot_scope.is_empty() { ",proxy:true" } else { "" };
        format!(
            "{{key:{},fn:function({}){{return {}}}{}}}",
            el.slot_target.as_deref().unwrap_or("\"default\""),
            slot_scope,
            body,
            reverse_proxy
        )
    }

    fn gen_children(&mut self, id: NodeId, check_skip: bool) -> Option<String> {
        let ast = self.ast;
        let children = &ast.el(id).children;
        let &first = children.first()?;

        if children.len() == 1 {
            if let Some(child) = ast.element(first) {
                if child.for_clause.is_some() && child.tag != "template" && child.tag != "slot" {
                    let normalization = match (check_skip, self.maybe_component(child)) {
                        (false, _) => "",
                        (true, true) => ",1",
                        (true, false) => ",0",
                    };
                    return Some(format!("{}{}", self.gen_element(first), normalization));
                }
            }
        }

        let normalization = if check_skip {
            self.normalization_type(children)
        } else {
            0
        };
        let code: Vec<String> = children.iter().map(|&child| self.gen_node(child)).collect();
        let mut out = format!("[{}]", code.join(","));
        if normalization != 0 {
            out.push_str(&format!(",{}", normalization));
        }
        Some(out)
    }

    /// 0: no normalization, 1: simple (components may return arrays), 2: full
    fn normalization_type(&self, children: &[NodeId]) -> u8 {
        let ast = self.ast;
        let mut result = 0;
        for &id in children {
            let Some(el) = ast.element(id) else {
                continue;
            };
            let branches = || el.if_conditions.iter().filter_map(|c| ast.element(c.block));
            if needs_normalization(el) || branches().any(needs_normalization) {
                return 2;
            }
            if self.maybe_component(el) || branches().any(|b| self.maybe_component(b)) {
                result = 1;
            }
        }
        result
    }

    fn gen_node(&mut self, id: NodeId) -> String {
        let ast = self.ast;
        match ast.node(id) {
            AstNode::Element(_) => self.gen_element(id),
            AstNode::Text(text) if text.is_comment => format!("_e({})", source_string(&text.text)),
            AstNode::Text(text) => format!("_v({})", source_string(&text.text)),
            AstNode::Expression(exp) => format!("_v({})", exp.expression),
        }
    }

    fn gen_slot(&mut self, id: NodeId) -> String {
        let ast = self.ast;
        let el = ast.el(id);
        let slot_name = el.slot_name.as_deref().unwrap_or("\"default\"");
        let children = self.gen_children(id, false);
        let mut code = format!("_t({}", slot_name);
        if let Some(children) = &children {
            code.push_str(&format!(",function(){{return {}}}", children));
        }

        let attrs = if el.attrs.is_empty() && el.dynamic_attrs.is_empty() {
            None
        } else {
            let camelized: Vec<Attr> = el
                .attrs
                .iter()
                .chain(&el.dynamic_attrs)
                .map(|attr| Attr {
                    name: camelize(&attr.name),
                    ..attr.clone()
                })
                .collect();
            Some(gen_props(&camelized))
        };
        let bind = el.attr("v-bind");

        if (attrs.is_some() || bind.is_some()) && children.is_none() {
            code.push_str(",null");
        }
        if let Some(attrs) = &attrs {
            code.push_str(&format!(",{}", attrs));
        }
        if let Some(bind) = bind {
            if attrs.is_none() {
                code.push_str(",null");
            }
            code.push_str(&format!(",{}", bind));
        }
        code.push(')');
        code
    }

    fn gen_component(&mut self, id: NodeId) -> String {
        let ast = self.ast;
        let el = ast.el(id);
        let component = el.component.as_deref().unwrap_or_default();
        let children = if el.inline_template {
            None
        } else {
            self.gen_children(id, true)
        };
        let data = self.gen_data(id);
        match children {
            Some(children) => format!("_c({},{},{})", component, data, children),
            None => format!("_c({},{})", component, data),
        }
    }
}

fn needs_normalization(el: &Element) -> bool {
    el.for_clause.is_some() || el.tag == "template" || el.tag == "slot"
}

fn contains_slot_child(ast: &Ast, id: NodeId) -> bool {
    match ast.element(id) {
        Some(el) => el.tag == "slot" || el.children.iter().any(|&c| contains_slot_child(ast, c)),
        None => false,
    }
}

/// Name a setup binding is exposed as, checked in the order the runtime resolves it
fn check_binding_type(bindings: &BindingMetadata, tag: &str) -> Option<String> {
    if bindings.is_script_setup == Some(false) {
        return None;
    }
    let camel = camelize(tag);
    let pascal = capitalize(&camel);
    let candidates = [tag, camel.as_str(), pascal.as_str()];
    [
        BindingType::SetupConst,
        BindingType::SetupReactiveConst,
        BindingType::SetupLet,
        BindingType::SetupRef,
        BindingType::SetupMaybeRef,
    ]
    .into_iter()
    .find_map(|ty| {
        candidates
            .iter()
            .find(|name| bindings.get(name) == Some(ty))
            .map(|name| name.to_string())
    })
}

/// `{"name":value,...}`, or `_d({...},[name,value,...])` when some names are dynamic
pub fn gen_props(props: &[Attr]) -> String {
    let mut static_props = Vec::new();
    let mut dynamic_props = Vec::new();
    for prop in props {
        let value = transform_special_newlines(&prop.value);
        if prop.dynamic {
            dynamic_props.push(format!("{},{}", prop.name, value));
        } else {
            static_props.push(format!("\"{}\":{}", prop.name, value));
        }
    }
    let static_props = format!("{{{}}}", static_props.join(","));
    if dynamic_props.is_empty() {
        static_props
    } else {
        format!("_d({},[{}])", static_props, dynamic_props.join(","))
    }
}

/// djb2 over UTF-16 code units, read back to front
pub fn hash(text: &str) -> u32 {
    let units: Vec<u16> = text.encode_utf16().collect();
    units
        .iter()
        .rev()
        .fold(5381u32, |h, &unit| h.wrapping_mul(33) ^ u32::from(unit))
}
