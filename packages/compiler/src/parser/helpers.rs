//! Attribute Helpers
//!
//! Small mutations shared by the tree builder, the modules and the directive handlers.
//! Removing an attribute only drops it from `attrs_list` (so it is not classified again);
//! `attrs_map` keeps it unless asked otherwise because later stages still read it.

use super::ast::{Attr, Directive, Element, Handler, Modifiers};
use super::filter_parser::parse_filters;
use crate::codegen::escape::json_string;
use crate::parse_util::{Diagnostics, SourceRange};
use regex::Regex;

pub fn get_and_remove_attr(el: &mut Element, name: &str, remove_from_map: bool) -> Option<String> {
    let value = el.attrs_map.get(name).cloned();
    if value.is_some() {
        if let Some(pos) = el.attrs_list.iter().position(|attr| attr.name == name) {
            el.attrs_list.remove(pos);
        }
    }
    if remove_from_map {
        el.attrs_map.shift_remove(name);
    }
    value
}

pub fn get_and_remove_attr_by_regex(el: &mut Element, name: &Regex) -> Option<Attr> {
    let pos = el.attrs_list.iter().position(|attr| name.is_match(&attr.name))?;
    Some(el.attrs_list.remove(pos))
}

/// Value of `:name` / `v-bind:name` (filters applied), or the JSON-quoted static `name`
pub fn get_binding_attr(el: &mut Element, name: &str, get_static: bool) -> Option<String> {
    let dynamic_value = get_and_remove_attr(el, &format!(":{}", name), false)
        .filter(|value| !value.is_empty())
        .or_else(|| get_and_remove_attr(el, &format!("v-bind:{}", name), false));
    if let Some(value) = dynamic_value {
        return Some(parse_filters(&value));
    }
    if get_static {
        if let Some(value) = get_and_remove_attr(el, name, false) {
            return Some(json_string(&value));
        }
    }
    None
}

pub fn get_raw_binding_attr<'a>(el: &'a Element, name: &str) -> Option<&'a Attr> {
    el.raw_attrs_map
        .get(&format!(":{}", name))
        .or_else(|| el.raw_attrs_map.get(&format!("v-bind:{}", name)))
        .or_else(|| el.raw_attrs_map.get(name))
}

fn range_of(attr: Option<&Attr>) -> Option<SourceRange> {
    attr.and_then(|attr| attr.range)
}

pub fn add_prop(el: &mut Element, name: &str, value: &str, range: Option<SourceRange>, dynamic: bool) {
    el.props.push(
        Attr::new(name, value)
            .with_dynamic(dynamic)
            .with_range(range),
    );
    el.plain = false;
}

pub fn add_attr(el: &mut Element, name: &str, value: &str, range: Option<SourceRange>, dynamic: bool) {
    let attr = Attr::new(name, value)
        .with_dynamic(dynamic)
        .with_range(range);
    if dynamic {
        el.dynamic_attrs.push(attr);
    } else {
        el.attrs.push(attr);
    }
    el.plain = false;
}

/// Add an attribute as if it had been written in the template (for pre-transforms)
pub fn add_raw_attr(el: &mut Element, name: &str, value: &str, range: Option<SourceRange>) {
    el.attrs_map.insert(name.to_string(), value.to_string());
    el.attrs_list.push(Attr::new(name, value).with_range(range));
}

#[allow(clippy::too_many_arguments)]
pub fn add_directive(
    el: &mut Element,
    name: &str,
    raw_name: &str,
    value: &str,
    arg: Option<String>,
    is_dynamic_arg: bool,
    modifiers: Option<Modifiers>,
    range: Option<SourceRange>,
) {
    el.directives.push(Directive {
        name: name.to_string(),
        raw_name: raw_name.to_string(),
        value: value.to_string(),
        arg,
        is_dynamic_arg,
        modifiers,
        range,
    });
    el.plain = false;
}

/// Mark a capture/once/passive event name
fn prepend_modifier_marker(symbol: char, name: &str, dynamic: bool) -> String {
    if dynamic {
        format!("_p({},\"{}\")", name, symbol)
    } else {
        format!("{}{}", symbol, name)
    }
}

fn take_modifier(modifiers: &mut Modifiers, name: &str) -> bool {
    modifiers.shift_remove(name).unwrap_or(false)
}

/// Register an event handler on `el`.
///
/// `important` handlers run before the ones already registered for the same event.
#[allow(clippy::too_many_arguments)]
pub fn add_handler(
    el: &mut Element,
    name: &str,
    value: &str,
    modifiers: Option<Modifiers>,
    important: bool,
    diagnostics: Option<&mut Diagnostics>,
    range: Option<SourceRange>,
    dynamic: bool,
) {
    let has_modifiers = modifiers.is_some();
    let mut modifiers = modifiers.unwrap_or_default();
    let mut name = name.to_string();

    let flag = |modifiers: &Modifiers, key: &str| modifiers.get(key).copied().unwrap_or(false);

    if flag(&modifiers, "prevent") && flag(&modifiers, "passive") {
        if let Some(diagnostics) = diagnostics {
            diagnostics.warn(
                "passive and prevent can't be used together. \
                 Passive handler can't prevent default event.",
                range,
            );
        }
    }

    // right and middle clicks never fire `click`
    if flag(&modifiers, "right") {
        if dynamic {
            name = format!("({})==='click'?'contextmenu':({})", name, name);
        } else if name == "click" {
            name = "contextmenu".to_string();
            modifiers.shift_remove("right");
        }
    } else if flag(&modifiers, "middle") {
        if dynamic {
            name = format!("({})==='click'?'mouseup':({})", name, name);
        } else if name == "click" {
            name = "mouseup".to_string();
        }
    }

    if take_modifier(&mut modifiers, "capture") {
        name = prepend_modifier_marker('!', &name, dynamic);
    }
    if take_modifier(&mut modifiers, "once") {
        name = prepend_modifier_marker('~', &name, dynamic);
    }
    if take_modifier(&mut modifiers, "passive") {
        name = prepend_modifier_marker('&', &name, dynamic);
    }

    let native = take_modifier(&mut modifiers, "native");
    let handler = Handler {
        value: value.trim().to_string(),
        dynamic,
        modifiers: if has_modifiers { Some(modifiers) } else { None },
        range,
    };

    let events = if native {
        &mut el.native_events
    } else {
        &mut el.events
    };
    let handlers = events.entry(name).or_default();
    if important {
        handlers.insert(0, handler);
    } else {
        handlers.push(handler);
    }
    el.plain = false;
}

/// Source range of the raw attribute `name`, if it was written in the template
pub fn attr_range(el: &Element, name: &str) -> Option<SourceRange> {
    range_of(el.raw_attrs_map.get(name))
}
