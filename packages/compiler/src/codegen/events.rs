//! Event Handler Generation
//!
//! Produces the `on:{...}` / `nativeOn:{...}` entries of a data object. Method paths
//! and function expressions are passed through, inline statements are wrapped in a
//! `function($event){...}`, and modifiers turn into guards at the top of the wrapper.

use crate::codegen::escape::json_string;
use crate::parser::ast::Handler;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

static FN_EXP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9_$]+|\([^)]*?\))\s*=>|^function(?:\s+[A-Za-z0-9_$]+)?\s*\(").unwrap()
});
static FN_INVOKE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^)]*?\);*$").unwrap());
static SIMPLE_PATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^[A-Za-z_$][A-Za-z0-9_$]*(?:\.[A-Za-z_$][A-Za-z0-9_$]*|\['[^']*?'\]|\["[^"]*?"\]|\[\d+\]|\[[A-Za-z_$][A-Za-z0-9_$]*\])*$"#,
    )
    .unwrap()
});

/// Key codes of the built-in key aliases
fn key_code(key: &str) -> Option<&'static str> {
    Some(match key {
        "esc" => "27",
        "tab" => "9",
        "enter" => "13",
        "space" => "32",
        "up" => "38",
        "left" => "37",
        "right" => "39",
        "down" => "40",
        "delete" => "[8,46]",
        _ => return None,
    })
}

/// `KeyboardEvent.key` values of the built-in key aliases
fn key_name(key: &str) -> Option<&'static str> {
    Some(match key {
        "esc" => r#"["Esc","Escape"]"#,
        "tab" => r#""Tab""#,
        "enter" => r#""Enter""#,
        "space" => r#"[" ","Spacebar"]"#,
        "up" => r#"["Up","ArrowUp"]"#,
        "left" => r#"["Left","ArrowLeft"]"#,
        "right" => r#"["Right","ArrowRight"]"#,
        "down" => r#"["Down","ArrowDown"]"#,
        "delete" => r#"["Backspace","Delete","Del"]"#,
        _ => return None,
    })
}

fn gen_guard(condition: &str) -> String {
    format!("if({})return null;", condition)
}

fn modifier_code(modifier: &str) -> Option<String> {
    Some(match modifier {
        "stop" => "$event.stopPropagation();".to_string(),
        "prevent" => "$event.preventDefault();".to_string(),
        "self" => gen_guard("$event.target !== $event.currentTarget"),
        "ctrl" => gen_guard("!$event.ctrlKey"),
        "shift" => gen_guard("!$event.shiftKey"),
        "alt" => gen_guard("!$event.altKey"),
        "meta" => gen_guard("!$event.metaKey"),
        "left" => gen_guard("'button' in $event && $event.button !== 0"),
        "middle" => gen_guard("'button' in $event && $event.button !== 1"),
        "right" => gen_guard("'button' in $event && $event.button !== 2"),
        _ => return None,
    })
}

/// `on:{...}` or `nativeOn:{...}` for the handler map
pub fn gen_handlers(events: &IndexMap<String, Vec<Handler>>, is_native: bool) -> String {
    let prefix = if is_native { "nativeOn:" } else { "on:" };
    let mut static_handlers = Vec::new();
    let mut dynamic_handlers = Vec::new();
    for (name, handlers) in events {
        let code = gen_handler_list(handlers);
        let dynamic = matches!(handlers.as_slice(), [handler] if handler.dynamic);
        if dynamic {
            dynamic_handlers.push(format!("{},{}", name, code));
        } else {
            static_handlers.push(format!("\"{}\":{}", name, code));
        }
    }
    let static_handlers = format!("{{{}}}", static_handlers.join(","));
    if dynamic_handlers.is_empty() {
        format!("{}{}", prefix, static_handlers)
    } else {
        format!(
            "{}_d({},[{}])",
            prefix,
            static_handlers,
            dynamic_handlers.join(",")
        )
    }
}

fn gen_handler_list(handlers: &[Handler]) -> String {
    match handlers {
        [] => "function(){}".to_string(),
        [handler] => gen_handler(handler),
        _ => format!(
            "[{}]",
            handlers
                .iter()
                .map(gen_handler)
                .collect::<Vec<_>>()
                .join(",")
        ),
    }
}

fn gen_handler(handler: &Handler) -> String {
    let value = handler.value.as_str();
    let is_method_path = SIMPLE_PATH_RE.is_match(value);
    let is_function_expression = FN_EXP_RE.is_match(value);
    let is_function_invocation = SIMPLE_PATH_RE.is_match(&FN_INVOKE_RE.replace(value, ""));

    let Some(modifiers) = &handler.modifiers else {
        if is_method_path || is_function_expression {
            return value.to_string();
        }
        return if is_function_invocation {
            format!("function($event){{return {}}}", value)
        } else {
            format!("function($event){{{}}}", value)
        };
    };

    let mut code = String::new();
    let mut gen_modifier_code = String::new();
    let mut keys: Vec<&str> = Vec::new();
    for key in modifiers.keys() {
        let key = key.as_str();
        if let Some(modifier) = modifier_code(key) {
            gen_modifier_code.push_str(&modifier);
            // left/right double as arrow keys
            if key_code(key).is_some() {
                keys.push(key);
            }
        } else if key == "exact" {
            let unlisted: Vec<String> = ["ctrl", "shift", "alt", "meta"]
                .iter()
                .filter(|m| !modifiers.get(**m).copied().unwrap_or(false))
                .map(|m| format!("$event.{}Key", m))
                .collect();
            gen_modifier_code.push_str(&gen_guard(&unlisted.join("||")));
        } else {
            keys.push(key);
        }
    }
    if !keys.is_empty() {
        code.push_str(&gen_key_filter(&keys));
    }
    code.push_str(&gen_modifier_code);

    let handler_code = if is_method_path {
        format!("return {}.apply(null, arguments)", value)
    } else if is_function_expression {
        format!("return ({}).apply(null, arguments)", value)
    } else if is_function_invocation {
        format!("return {}", value)
    } else {
        value.to_string()
    };
    format!("function($event){{{}{}}}", code, handler_code)
}

fn gen_key_filter(keys: &[&str]) -> String {
    let filters: Vec<String> = keys.iter().map(|key| gen_filter_code(key)).collect();
    format!(
        "if(!$event.type.indexOf('key')&&{})return null;",
        filters.join("&&")
    )
}

/// Leading decimal digits as a number, like a lenient integer parse
fn leading_int(key: &str) -> Option<u64> {
    let digits: String = key.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn gen_filter_code(key: &str) -> String {
    if let Some(code) = leading_int(key).filter(|&code| code != 0) {
        return format!("$event.keyCode!=={}", code);
    }
    format!(
        "_k($event.keyCode,{},{},$event.key,{})",
        json_string(key),
        key_code(key).unwrap_or("undefined"),
        key_name(key).unwrap_or("undefined")
    )
}
