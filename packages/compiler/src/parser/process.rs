//! Element Processing
//!
//! Structural directives are extracted when the start tag is seen; everything else
//! (key, ref, slots, component, modules, generic attributes) when the element closes.

use super::ast::{Ast, Attr, Element, ForClause, IfCondition, Modifiers, NodeId};
use super::helpers::{
    add_attr, add_directive, add_handler, add_prop, attr_range, get_and_remove_attr,
    get_and_remove_attr_by_regex, get_binding_attr, get_raw_binding_attr,
};
use super::filter_parser::parse_filters;
use super::maybe_component;
use super::text_parser::parse_text;
use crate::codegen::escape::json_string;
use crate::directives::model::gen_assignment_code;
use crate::modules::TransformContext;
use crate::parse_util::{Diagnostics, SourceRange};
use crate::util::{camelize, hyphenate};
use once_cell::sync::Lazy;
use regex::Regex;

static FOR_ALIAS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^(.*?)\s+(?:in|of)\s+(.*)$").unwrap());
static FOR_ITERATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",([^,\}\]]*)(?:,([^,\}\]]*))?$").unwrap());
static STRIP_PARENS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\(|\)$").unwrap());
static DYNAMIC_ARG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)^\[.*\]$").unwrap());
static ARG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s):(.*)$").unwrap());
static MODIFIER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.[^.\]]+").unwrap());
static SLOT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^v-slot(:|$)|^#").unwrap());

pub(crate) static DIR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^v-|^@|^:|^#").unwrap());
pub(crate) static BIND_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^:|^v-bind:").unwrap());
pub(crate) static ON_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@|^v-on:").unwrap());

/// Scope given to `v-slot` without a value so the slot still compiles as scoped
pub const EMPTY_SLOT_SCOPE_TOKEN: &str = "_empty_";

pub(super) fn process_pre(el: &mut Element) {
    if get_and_remove_attr(el, "v-pre", false).is_some() {
        el.pre = true;
    }
}

/// Inside `v-pre` every attribute is kept as a literal string
pub(super) fn process_raw_attrs(el: &mut Element) {
    if !el.attrs_list.is_empty() {
        el.attrs = el
            .attrs_list
            .iter()
            .map(|attr| Attr::new(attr.name.clone(), json_string(&attr.value)).with_range(attr.range))
            .collect();
    } else if !el.pre {
        el.plain = true;
    }
}

pub(super) fn process_for(el: &mut Element, diagnostics: &mut Diagnostics) {
    let Some(exp) = get_and_remove_attr(el, "v-for", false) else {
        return;
    };
    if exp.is_empty() {
        return;
    }
    match parse_for(&exp) {
        Some(clause) => el.for_clause = Some(clause),
        None => diagnostics.warn(
            format!("Invalid v-for expression: {}", exp),
            attr_range(el, "v-for"),
        ),
    }
}

/// Split `(item, key, index) in list` into its parts
pub fn parse_for(exp: &str) -> Option<ForClause> {
    let caps = FOR_ALIAS_RE.captures(exp)?;
    let for_exp = caps.get(2)?.as_str().trim().to_string();
    let alias = caps.get(1)?.as_str().trim();
    let alias = STRIP_PARENS_RE.replace_all(alias, "").into_owned();

    match FOR_ITERATOR_RE.captures(&alias) {
        Some(iterators) => Some(ForClause {
            for_exp,
            alias: FOR_ITERATOR_RE.replace(&alias, "").trim().to_string(),
            iterator1: iterators.get(1).map(|m| m.as_str().trim().to_string()),
            iterator2: iterators
                .get(2)
                .map(|m| m.as_str().trim().to_string())
                .filter(|it| !it.is_empty()),
        }),
        None => Some(ForClause {
            for_exp,
            alias,
            iterator1: None,
            iterator2: None,
        }),
    }
}

pub(super) fn process_if(el: &mut Element, id: NodeId) {
    match get_and_remove_attr(el, "v-if", false).filter(|exp| !exp.is_empty()) {
        Some(exp) => {
            el.if_exp = Some(exp.clone());
            el.if_conditions.push(IfCondition {
                exp: Some(exp),
                block: id,
            });
        }
        None => {
            if get_and_remove_attr(el, "v-else", false).is_some() {
                el.is_else = true;
            }
            if let Some(else_if) = get_and_remove_attr(el, "v-else-if", false) {
                if !else_if.is_empty() {
                    el.else_if = Some(else_if);
                }
            }
        }
    }
}

pub(super) fn process_once(el: &mut Element) {
    if get_and_remove_attr(el, "v-once", false).is_some() {
        el.once = true;
    }
}

/// Slot content declared with `v-slot` on the component itself
struct ComponentSlot {
    name: String,
    dynamic: bool,
    scope: String,
}

/// Everything that happens to an element when its end tag is seen
pub(super) fn process_element(ast: &mut Ast, id: NodeId, ctx: &mut TransformContext<'_>) {
    let options = ctx.options;
    let platform = options.platform.as_ref();
    let in_for = ast.ancestors(id).any(|(_, el)| el.for_clause.is_some());
    let for_aliases: Vec<String> = ast
        .ancestors(id)
        .filter_map(|(_, el)| el.for_clause.as_ref().map(|f| f.alias.clone()))
        .collect();
    let (parent_tag, parent_is_component) = match ast.el(id).parent {
        Some(parent) => {
            let parent = ast.el(parent);
            (Some(parent.tag.clone()), Some(maybe_component(parent, platform)))
        }
        None => (None, None),
    };

    let component_slot = {
        let el = ast.el_mut(id);
        process_key(el, parent_tag.as_deref(), ctx.diagnostics);
        el.plain = el.key.is_none() && el.scoped_slots.is_empty() && el.attrs_list.is_empty();
        process_ref(el, in_for);
        process_slot_content(el, parent_is_component, ctx)
    };

    if let Some(slot) = component_slot {
        wrap_default_slot(ast, id, slot);
    }

    let el = ast.el_mut(id);
    process_slot_outlet(el, ctx.diagnostics);
    process_component(el);
    for module in &options.modules {
        module.transform_node(el, ctx);
    }
    process_attrs(el, &for_aliases, ctx);
}

fn process_key(el: &mut Element, parent_tag: Option<&str>, diagnostics: &mut Diagnostics) {
    let Some(exp) = get_binding_attr(el, "key", true).filter(|exp| !exp.is_empty()) else {
        return;
    };
    let range = get_raw_binding_attr(el, "key").and_then(|attr| attr.range);
    if el.tag == "template" {
        diagnostics.warn(
            "<template> cannot be keyed. Place the key on real elements instead.",
            range,
        );
    }
    if let Some(clause) = &el.for_clause {
        let iterator = clause.iterator2.as_ref().or(clause.iterator1.as_ref());
        if iterator == Some(&exp) && parent_tag == Some("transition-group") {
            diagnostics.warn(
                "Do not use v-for index as key on <transition-group> children, \
                 this is the same as not using keys.",
                range,
            );
        }
    }
    el.key = Some(exp);
}

fn process_ref(el: &mut Element, in_for: bool) {
    if let Some(ref_name) = get_binding_attr(el, "ref", true).filter(|r| !r.is_empty()) {
        el.ref_name = Some(ref_name);
        el.ref_in_for = in_for;
    }
}

/// Legacy `slot` / `slot-scope` attributes and `v-slot`.
///
/// Returns the slot to create when `v-slot` sits on the component itself; the
/// caller owns the arena and builds the wrapping `<template>`.
fn process_slot_content(
    el: &mut Element,
    parent_is_component: Option<bool>,
    ctx: &mut TransformContext<'_>,
) -> Option<ComponentSlot> {
    if el.tag == "template" {
        let scope = get_and_remove_attr(el, "scope", false).filter(|s| !s.is_empty());
        if scope.is_some() {
            ctx.diagnostics.tip(
                "the \"scope\" attribute for scoped slots have been deprecated and replaced \
                 by \"slot-scope\" since 2.5. The new \"slot-scope\" attribute can also be used \
                 on plain elements in addition to <template> to denote scoped slots.",
                attr_range(el, "scope"),
            );
        }
        el.slot_scope = scope.or_else(|| get_and_remove_attr(el, "slot-scope", false));
    } else if let Some(scope) = get_and_remove_attr(el, "slot-scope", false) {
        if el.has_attr("v-for") {
            ctx.diagnostics.tip(
                format!(
                    "Ambiguous combined usage of slot-scope and v-for on <{}> \
                     (v-for takes higher priority). Use a wrapper <template> for the \
                     scoped slot to make it clearer.",
                    el.tag
                ),
                attr_range(el, "slot-scope"),
            );
        }
        el.slot_scope = Some(scope);
    }
    if el.slot_scope.as_deref() == Some("") {
        el.slot_scope = None;
    }

    // slot="xxx"
    if let Some(slot_target) = get_binding_attr(el, "slot", true).filter(|s| !s.is_empty()) {
        el.slot_target = Some(if slot_target == "\"\"" {
            "\"default\"".to_string()
        } else {
            slot_target.clone()
        });
        el.slot_target_dynamic = el.has_attr(":slot") || el.has_attr("v-bind:slot");
        // kept as an attribute for native shadow DOM
        if el.tag != "template" && el.slot_scope.is_none() {
            let range = get_raw_binding_attr(el, "slot").and_then(|attr| attr.range);
            add_attr(el, "slot", &slot_target, range, false);
        }
    }

    let binding = get_and_remove_attr_by_regex(el, &SLOT_RE)?;
    if el.tag == "template" {
        if el.slot_target.is_some() || el.slot_scope.is_some() {
            ctx.diagnostics
                .warn("Unexpected mixed usage of different slot syntaxes.", el.range);
        }
        if parent_is_component == Some(false) {
            ctx.diagnostics.warn(
                "<template v-slot> can only appear at the root level inside the receiving component",
                el.range,
            );
        }
        let (name, dynamic) = get_slot_name(&binding, ctx.diagnostics);
        el.slot_target = Some(name);
        el.slot_target_dynamic = dynamic;
        el.slot_scope = Some(slot_scope_of(&binding));
        None
    } else {
        if !maybe_component(el, ctx.options.platform.as_ref()) {
            ctx.diagnostics.warn(
                "v-slot can only be used on components or <template>.",
                binding.range,
            );
        }
        if el.slot_scope.is_some() || el.slot_target.is_some() {
            ctx.diagnostics
                .warn("Unexpected mixed usage of different slot syntaxes.", el.range);
        }
        if !el.scoped_slots.is_empty() {
            ctx.diagnostics.warn(
                "To avoid scope ambiguity, the default slot should also use <template> \
                 syntax when there are other named slots.",
                binding.range,
            );
        }
        let (name, dynamic) = get_slot_name(&binding, ctx.diagnostics);
        Some(ComponentSlot {
            name,
            dynamic,
            scope: slot_scope_of(&binding),
        })
    }
}

fn slot_scope_of(binding: &Attr) -> String {
    if binding.value.is_empty() {
        EMPTY_SLOT_SCOPE_TOKEN.to_string()
    } else {
        binding.value.clone()
    }
}

/// Slot name expression for a `v-slot` attribute and whether it is dynamic
fn get_slot_name(binding: &Attr, diagnostics: &mut Diagnostics) -> (String, bool) {
    let mut name = SLOT_RE.replace(&binding.name, "").into_owned();
    if name.is_empty() {
        if binding.name.starts_with('#') {
            diagnostics.warn("v-slot shorthand syntax requires a slot name.", binding.range);
        } else {
            name = "default".to_string();
        }
    }
    if DYNAMIC_ARG_RE.is_match(&name) {
        (name[1..name.len() - 1].to_string(), true)
    } else {
        (format!("\"{}\"", name), false)
    }
}

/// Move the component's plain children into a synthetic `<template>` slot
fn wrap_default_slot(ast: &mut Ast, id: NodeId, slot: ComponentSlot) {
    let mut container = Element::new("template", Vec::new(), Some(id));
    container.slot_target = Some(slot.name.clone());
    container.slot_target_dynamic = slot.dynamic;
    container.slot_scope = Some(slot.scope);
    let container_id = ast.push(super::ast::AstNode::Element(container));

    // scoped children stay owned by the slot map only
    let children = std::mem::take(&mut ast.el_mut(id).children);
    let plain: Vec<NodeId> = children
        .into_iter()
        .filter(|&child| {
            ast.element(child)
                .map_or(true, |child| child.slot_scope.is_none())
        })
        .collect();
    for &child in &plain {
        if let Some(child) = ast.element_mut(child) {
            child.parent = Some(container_id);
        }
    }
    ast.el_mut(container_id).children = plain;

    let el = ast.el_mut(id);
    el.scoped_slots.insert(slot.name, container_id);
    el.plain = false;
}

fn process_slot_outlet(el: &mut Element, diagnostics: &mut Diagnostics) {
    if el.tag == "slot" {
        el.slot_name = get_binding_attr(el, "name", true);
        if el.key.is_some() {
            diagnostics.warn(
                "`key` does not work on <slot> because slots are abstract outlets and can \
                 possibly expand into multiple elements. Use the key on a wrapping element instead.",
                get_raw_binding_attr(el, "key").and_then(|attr| attr.range),
            );
        }
    }
}

fn process_component(el: &mut Element) {
    if let Some(binding) = get_binding_attr(el, "is", true).filter(|b| !b.is_empty()) {
        el.component = Some(binding);
    }
    if get_and_remove_attr(el, "inline-template", false).is_some() {
        el.inline_template = true;
    }
}

/// Split `name.a.b` into the name and its modifier set.
///
/// Dots inside a dynamic `[...]` argument are part of the name.
pub(crate) fn split_modifiers(name: &str) -> (String, Option<Modifiers>) {
    let tail_start = name.rfind(']').map_or(0, |i| i + 1);
    let tail = &name[tail_start..];
    let modifiers: Modifiers = MODIFIER_RE
        .find_iter(tail)
        .map(|m| (m.as_str()[1..].to_string(), true))
        .collect();
    if modifiers.is_empty() {
        return (name.to_string(), None);
    }
    let stripped = MODIFIER_RE.replace_all(tail, "");
    (format!("{}{}", &name[..tail_start], stripped), Some(modifiers))
}

fn has_modifier(modifiers: &Option<Modifiers>, name: &str) -> bool {
    modifiers
        .as_ref()
        .map_or(false, |m| m.get(name).copied().unwrap_or(false))
}

/// Strip the brackets of a dynamic argument
fn dynamic_arg(name: &str) -> (String, bool) {
    if DYNAMIC_ARG_RE.is_match(name) {
        (name[1..name.len() - 1].to_string(), true)
    } else {
        (name.to_string(), false)
    }
}

fn process_attrs(el: &mut Element, for_aliases: &[String], ctx: &mut TransformContext<'_>) {
    let options = ctx.options;
    let platform = options.platform.as_ref();
    let list = el.attrs_list.clone();

    for attr in &list {
        let raw_name = attr.name.as_str();
        let value = attr.value.as_str();
        let range = attr.range;

        if !DIR_RE.is_match(raw_name) {
            // literal attribute
            if parse_text(value, options.delimiters.as_ref()).is_some() {
                ctx.diagnostics.warn(
                    format!(
                        "{}=\"{}\": Interpolation inside attributes has been removed. \
                         Use v-bind or the colon shorthand instead. For example, instead of \
                         <div id=\"{{{{ val }}}}\">, use <div :id=\"val\">.",
                        raw_name, value
                    ),
                    range,
                );
            }
            add_attr(el, raw_name, &json_string(value), range, false);
            // muted is only reliable as a property
            if el.component.is_none()
                && raw_name == "muted"
                && platform.must_use_prop(&el.tag, el.attr("type"), raw_name)
            {
                add_prop(el, raw_name, "true", range, false);
            }
            continue;
        }

        el.has_bindings = true;
        let (name, modifiers) = split_modifiers(raw_name);

        if BIND_RE.is_match(&name) {
            let (name, is_dynamic) = dynamic_arg(&BIND_RE.replace(&name, ""));
            let value = parse_filters(value);
            if value.trim().is_empty() {
                ctx.diagnostics.warn(
                    format!(
                        "The value for a v-bind expression cannot be empty. Found in \"v-bind:{}\"",
                        name
                    ),
                    range,
                );
            }
            let mut name = name;
            if !is_dynamic && has_modifier(&modifiers, "prop") {
                name = camelize(&name);
                if name == "innerHtml" {
                    name = "innerHTML".to_string();
                }
            }
            if !is_dynamic && has_modifier(&modifiers, "camel") {
                name = camelize(&name);
            }
            if has_modifier(&modifiers, "sync") {
                let sync_gen = gen_assignment_code(&value, "$event");
                if !is_dynamic {
                    let camel = camelize(&name);
                    let hyphen = hyphenate(&name);
                    add_handler(
                        el,
                        &format!("update:{}", camel),
                        &sync_gen,
                        None,
                        false,
                        Some(&mut *ctx.diagnostics),
                        range,
                        false,
                    );
                    if hyphen != camel {
                        add_handler(
                            el,
                            &format!("update:{}", hyphen),
                            &sync_gen,
                            None,
                            false,
                            Some(&mut *ctx.diagnostics),
                            range,
                            false,
                        );
                    }
                } else {
                    add_handler(
                        el,
                        &format!("\"update:\"+({})", name),
                        &sync_gen,
                        None,
                        false,
                        Some(&mut *ctx.diagnostics),
                        range,
                        true,
                    );
                }
            }
            if has_modifier(&modifiers, "prop")
                || (el.component.is_none() && platform.must_use_prop(&el.tag, el.attr("type"), &name))
            {
                add_prop(el, &name, &value, range, is_dynamic);
            } else {
                add_attr(el, &name, &value, range, is_dynamic);
            }
        } else if ON_RE.is_match(&name) {
            let (name, is_dynamic) = dynamic_arg(&ON_RE.replace(&name, ""));
            add_handler(
                el,
                &name,
                value,
                modifiers,
                false,
                Some(&mut *ctx.diagnostics),
                range,
                is_dynamic,
            );
        } else {
            // normal directives
            let name = DIR_RE.replace(&name, "").into_owned();
            let (name, arg, is_dynamic) = match ARG_RE.captures(&name).and_then(|c| c.get(1)) {
                Some(arg) if !arg.as_str().is_empty() => {
                    let dir_name = name[..arg.start() - 1].to_string();
                    let (arg, dynamic) = dynamic_arg(arg.as_str());
                    (dir_name, Some(arg), dynamic)
                }
                _ => (name.clone(), None, false),
            };
            add_directive(el, &name, raw_name, value, arg, is_dynamic, modifiers, range);
            if name == "model" {
                check_for_alias_model(el, value, for_aliases, ctx.diagnostics);
            }
        }
    }
}

fn check_for_alias_model(el: &Element, value: &str, for_aliases: &[String], diagnostics: &mut Diagnostics) {
    if for_aliases.iter().any(|alias| alias == value) {
        diagnostics.warn(
            format!(
                "<{} v-model=\"{}\">: You are binding v-model directly to a v-for iteration \
                 alias. This will not be able to modify the v-for source array because writing \
                 to the alias is like modifying a function local variable. Consider using an \
                 array of objects and use v-model on an object property instead.",
                el.tag, value
            ),
            attr_range(el, "v-model"),
        );
    }
}

/// Root must render exactly one element
pub(super) fn check_root_constraints(el: &Element, diagnostics: &mut Diagnostics) -> bool {
    let mut warned = false;
    if el.tag == "slot" || el.tag == "template" {
        diagnostics.warn(
            format!(
                "Cannot use <{}> as component root element because it may contain multiple nodes.",
                el.tag
            ),
            el.range.map(|r| SourceRange::new(r.start, r.start)),
        );
        warned = true;
    }
    if el.has_attr("v-for") {
        diagnostics.warn(
            "Cannot use v-for on stateful component root element because it renders multiple elements.",
            attr_range(el, "v-for"),
        );
        warned = true;
    }
    warned
}
