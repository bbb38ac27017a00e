//! `v-model`
//!
//! On form elements the binding expands into a value prop plus a listener; on
//! components it becomes the `model:{value,callback,expression}` data entry.

use super::DirectiveHandler;
use crate::codegen::escape::json_string;
use crate::modules::TransformContext;
use crate::parser::ast::{Directive, Element, ModelBinding};
use crate::parser::helpers::{add_handler, add_prop, attr_range, get_binding_attr};

/// Event name the runtime maps to `change` or `input` for range inputs
pub const RANGE_TOKEN: &str = "__r";

#[derive(Debug, Clone, Copy, Default)]
pub struct ModelDirective;

impl DirectiveHandler for ModelDirective {
    fn transform(&self, el: &mut Element, dir: &Directive, ctx: &mut TransformContext<'_>) -> bool {
        let value = dir.value.as_str();
        let tag = el.tag.clone();
        let input_type = el.attr("type").map(str::to_string);
        let range = attr_range(el, "v-model");

        if tag == "input" && input_type.as_deref() == Some("file") {
            ctx.diagnostics.warn(
                format!(
                    "<{} v-model=\"{}\" type=\"file\">:\nFile inputs are read only. \
                     Use a v-on:change listener instead.",
                    tag, value
                ),
                range,
            );
        }

        if el.component.is_some() {
            gen_component_model(el, dir);
            return false;
        }
        match (tag.as_str(), input_type.as_deref()) {
            ("select", _) => gen_select(el, dir),
            ("input", Some("checkbox")) => gen_checkbox_model(el, dir),
            ("input", Some("radio")) => gen_radio_model(el, dir),
            ("input", _) | ("textarea", _) => gen_default_model(el, dir, ctx),
            _ if !ctx.options.platform.is_reserved_tag(&tag) => {
                gen_component_model(el, dir);
                return false;
            }
            _ => ctx.diagnostics.warn(
                format!(
                    "<{} v-model=\"{}\">: v-model is not supported on this element type. \
                     If you are working with contenteditable, it's recommended to wrap a \
                     library dedicated for that purpose inside a custom component.",
                    tag, value
                ),
                range,
            ),
        }
        true
    }
}

/// Fill `el.model` for a component
pub fn gen_component_model(el: &mut Element, dir: &Directive) {
    let base_value = "$$v";
    let mut value_expression = base_value.to_string();
    if dir.has_modifier("trim") {
        value_expression = format!(
            "(typeof {b} === 'string'? {b}.trim(): {b})",
            b = base_value
        );
    }
    if dir.has_modifier("number") {
        value_expression = format!("_n({})", value_expression);
    }
    let assignment = gen_assignment_code(&dir.value, &value_expression);
    el.model = Some(ModelBinding {
        value: format!("({})", dir.value),
        expression: json_string(&dir.value),
        callback: format!("function ({}) {{{}}}", base_value, assignment),
    });
}

fn gen_checkbox_model(el: &mut Element, dir: &Directive) {
    let value = dir.value.as_str();
    let number = dir.has_modifier("number");
    let value_binding = get_binding_attr(el, "value", true).unwrap_or_else(|| "null".to_string());
    let true_value =
        get_binding_attr(el, "true-value", true).unwrap_or_else(|| "true".to_string());
    let false_value =
        get_binding_attr(el, "false-value", true).unwrap_or_else(|| "false".to_string());

    let checked_tail = if true_value == "true" {
        format!(":({})", value)
    } else {
        format!(":_q({},{})", value, true_value)
    };
    add_prop(
        el,
        "checked",
        &format!(
            "Array.isArray({v})?_i({v},{vb})>-1{tail}",
            v = value,
            vb = value_binding,
            tail = checked_tail
        ),
        None,
        false,
    );

    let item = if number {
        format!("_n({})", value_binding)
    } else {
        value_binding.clone()
    };
    let handler = format!(
        "var $$a={v},$$el=$event.target,$$c=$$el.checked?({t}):({f});\
         if(Array.isArray($$a)){{var $$v={item},$$i=_i($$a,$$v);\
         if($$el.checked){{$$i<0&&({add})}}\
         else{{$$i>-1&&({remove})}}}}else{{{assign}}}",
        v = value,
        t = true_value,
        f = false_value,
        item = item,
        add = gen_assignment_code(value, "$$a.concat([$$v])"),
        remove = gen_assignment_code(value, "$$a.slice(0,$$i).concat($$a.slice($$i+1))"),
        assign = gen_assignment_code(value, "$$c"),
    );
    add_handler(el, "change", &handler, None, true, None, None, false);
}

fn gen_radio_model(el: &mut Element, dir: &Directive) {
    let value = dir.value.as_str();
    let mut value_binding =
        get_binding_attr(el, "value", true).unwrap_or_else(|| "null".to_string());
    if dir.has_modifier("number") {
        value_binding = format!("_n({})", value_binding);
    }
    add_prop(
        el,
        "checked",
        &format!("_q({},{})", value, value_binding),
        None,
        false,
    );
    let handler = gen_assignment_code(value, &value_binding);
    add_handler(el, "change", &handler, None, true, None, None, false);
}

fn gen_select(el: &mut Element, dir: &Directive) {
    let selected_val = format!(
        "Array.prototype.filter.call($event.target.options,function(o){{return o.selected}})\
         .map(function(o){{var val = \"_value\" in o ? o._value : o.value;return {}}})",
        if dir.has_modifier("number") { "_n(val)" } else { "val" }
    );
    let assignment = "$event.target.multiple ? $$selectedVal : $$selectedVal[0]";
    let code = format!(
        "var $$selectedVal = {}; {}",
        selected_val,
        gen_assignment_code(&dir.value, assignment)
    );
    add_handler(el, "change", &code, None, true, None, None, false);
}

fn gen_default_model(el: &mut Element, dir: &Directive, ctx: &mut TransformContext<'_>) {
    let value = dir.value.as_str();
    let input_type = el.attr("type").map(str::to_string);

    let value_binding = ["v-bind:value", ":value"]
        .into_iter()
        .find(|name| el.has_attr(name));
    let has_type_binding = el.has_attr("v-bind:type") || el.has_attr(":type");
    if let (Some(binding), false) = (value_binding, has_type_binding) {
        ctx.diagnostics.warn(
            format!(
                "{}=\"{}\" conflicts with v-model on the same element because the latter \
                 already expands to a value binding internally",
                binding,
                el.attr(binding).unwrap_or_default()
            ),
            attr_range(el, binding),
        );
    }

    let lazy = dir.has_modifier("lazy");
    let number = dir.has_modifier("number");
    let trim = dir.has_modifier("trim");
    let is_range = input_type.as_deref() == Some("range");
    let need_composition_guard = !lazy && !is_range;
    let event = if lazy {
        "change"
    } else if is_range {
        RANGE_TOKEN
    } else {
        "input"
    };

    let mut value_expression = "$event.target.value".to_string();
    if trim {
        value_expression = "$event.target.value.trim()".to_string();
    }
    if number {
        value_expression = format!("_n({})", value_expression);
    }

    let mut code = gen_assignment_code(value, &value_expression);
    if need_composition_guard {
        code = format!("if($event.target.composing)return;{}", code);
    }

    add_prop(el, "value", &format!("({})", value), None, false);
    add_handler(el, event, &code, None, true, None, None, false);
    if trim || number {
        add_handler(el, "blur", "$forceUpdate()", None, false, None, None, false);
    }
}

/// Assignment of `assignment` to the model path `value`, going through `$set` for
/// member paths so new keys stay reactive
pub fn gen_assignment_code(value: &str, assignment: &str) -> String {
    match parse_model(value) {
        (exp, Some(key)) => format!("$set({}, {}, {})", exp, key, assignment),
        (_, None) => format!("{}={}", value, assignment),
    }
}

/// Split a model path into its base expression and last key.
///
/// `a.b` gives `("a", "\"b\"")`, `a[b][c]` gives `("a[b]", "c")`, `a` has no key.
pub fn parse_model(val: &str) -> (String, Option<String>) {
    let val = val.trim();
    let has_trailing_bracket = val.find('[').is_some()
        && val.rfind(']').map_or(false, |i| i + 1 >= val.len());
    if !has_trailing_bracket {
        return match val.rfind('.') {
            Some(index) => (
                val[..index].to_string(),
                Some(format!("\"{}\"", &val[index + 1..])),
            ),
            None => (val.to_string(), None),
        };
    }

    let mut scanner = ModelScanner {
        chars: val.char_indices().collect(),
        index: 0,
        expression_pos: 0,
        expression_end_pos: 0,
    };
    scanner.scan();
    let byte_at = |i: usize| scanner.chars.get(i).map_or(val.len(), |&(b, _)| b);
    let exp_start = byte_at(scanner.expression_pos);
    let key_start = byte_at(scanner.expression_pos + 1);
    let key_end = byte_at(scanner.expression_end_pos);
    (
        val[..exp_start].to_string(),
        Some(val[key_start..key_end.max(key_start)].to_string()),
    )
}

/// Finds the last top-level `[...]` segment of a model path
struct ModelScanner {
    chars: Vec<(usize, char)>,
    index: usize,
    expression_pos: usize,
    expression_end_pos: usize,
}

impl ModelScanner {
    fn eof(&self) -> bool {
        self.index >= self.chars.len()
    }

    /// Advance, then read. The first character is never read on its own.
    fn next(&mut self) -> Option<char> {
        self.index += 1;
        self.chars.get(self.index).map(|&(_, c)| c)
    }

    fn scan(&mut self) {
        while !self.eof() {
            match self.next() {
                Some(quote @ ('"' | '\'')) => self.skip_string(quote),
                Some('[') => self.scan_bracket(),
                _ => {}
            }
        }
    }

    fn scan_bracket(&mut self) {
        let mut depth = 1;
        self.expression_pos = self.index;
        while !self.eof() {
            let c = self.next();
            match c {
                Some(quote @ ('"' | '\'')) => {
                    self.skip_string(quote);
                    continue;
                }
                Some('[') => depth += 1,
                Some(']') => depth -= 1,
                _ => {}
            }
            if depth == 0 {
                self.expression_end_pos = self.index;
                break;
            }
        }
    }

    fn skip_string(&mut self, quote: char) {
        while !self.eof() {
            if self.next() == Some(quote) {
                break;
            }
        }
    }
}
