use super::{CompilerModule, TransformContext};
use crate::parser::ast::Element;
use crate::parser::helpers::{get_and_remove_attr, get_binding_attr};
use crate::parser::text_parser::parse_text;
use indexmap::IndexMap;

/// `style` and `:style`
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleModule;

impl CompilerModule for StyleModule {
    fn name(&self) -> &str {
        "style"
    }

    fn static_keys(&self) -> Vec<String> {
        vec!["staticStyle".to_string()]
    }

    fn transform_node(&self, el: &mut Element, ctx: &mut TransformContext<'_>) {
        if let Some(static_style) = get_and_remove_attr(el, "style", false) {
            if !static_style.is_empty() {
                if parse_text(&static_style, ctx.options.delimiters.as_ref()).is_some() {
                    let range = el.raw_attrs_map.get("style").and_then(|a| a.range);
                    ctx.diagnostics.warn(
                        format!(
                            "style=\"{}\": Interpolation inside attributes has been removed. \
                             Use v-bind or the colon shorthand instead. For example, \
                             instead of <div style=\"{{{{ val }}}}\">, use <div :style=\"val\">.",
                            static_style
                        ),
                        range,
                    );
                }
                let parsed = parse_style_text(&static_style);
                el.static_style =
                    Some(serde_json::to_string(&parsed).unwrap_or_else(|_| "{}".to_string()));
            }
        }
        if let Some(binding) = get_binding_attr(el, "style", false) {
            el.style_binding = Some(binding);
        }
    }

    fn gen_data(&self, el: &Element) -> String {
        let mut data = String::new();
        if let Some(static_style) = &el.static_style {
            data.push_str(&format!("staticStyle:{},", static_style));
        }
        if let Some(binding) = &el.style_binding {
            data.push_str(&format!("style:({}),", binding));
        }
        data
    }
}

/// Parse inline css text into a property map.
///
/// Declarations are split on `;` outside parentheses (so `url(a;b)` survives) and each
/// declaration on its first `:`.
pub fn parse_style_text(css_text: &str) -> IndexMap<String, String> {
    let mut res = IndexMap::new();
    for item in split_declarations(css_text) {
        if item.is_empty() {
            continue;
        }
        if let Some((property, value)) = item.split_once(':') {
            if !value.is_empty() {
                res.insert(property.trim().to_string(), value.trim().to_string());
            }
        }
    }
    res
}

fn split_declarations(css_text: &str) -> Vec<&str> {
    let bytes = css_text.as_bytes();
    let mut items = Vec::new();
    let mut last = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if b != b';' {
            continue;
        }
        // a `;` followed by `)` before any `(` sits inside parentheses
        let inside_parens = bytes[i + 1..]
            .iter()
            .find(|&&c| c == b'(' || c == b')')
            .map_or(false, |&c| c == b')');
        if !inside_parens {
            items.push(&css_text[last..i]);
            last = i + 1;
        }
    }
    items.push(&css_text[last..]);
    items
}
