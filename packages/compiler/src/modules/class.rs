use super::{CompilerModule, TransformContext};
use crate::codegen::escape::json_string;
use crate::parser::ast::Element;
use crate::parser::helpers::{get_and_remove_attr, get_binding_attr};
use crate::parser::text_parser::parse_text;
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// `class` and `:class`
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassModule;

impl CompilerModule for ClassModule {
    fn name(&self) -> &str {
        "class"
    }

    fn static_keys(&self) -> Vec<String> {
        vec!["staticClass".to_string()]
    }

    fn transform_node(&self, el: &mut Element, ctx: &mut TransformContext<'_>) {
        if let Some(static_class) = get_and_remove_attr(el, "class", false) {
            if parse_text(&static_class, ctx.options.delimiters.as_ref()).is_some() {
                let range = el.raw_attrs_map.get("class").and_then(|a| a.range);
                ctx.diagnostics.warn(
                    format!(
                        "class=\"{}\": Interpolation inside attributes has been removed. \
                         Use v-bind or the colon shorthand instead. For example, \
                         instead of <div class=\"{{{{ val }}}}\">, use <div :class=\"val\">.",
                        static_class
                    ),
                    range,
                );
            }
            if !static_class.is_empty() {
                let condensed = WHITESPACE_RUN.replace_all(&static_class, " ");
                el.static_class = Some(json_string(condensed.trim()));
            }
        }
        if let Some(binding) = get_binding_attr(el, "class", false) {
            el.class_binding = Some(binding);
        }
    }

    fn gen_data(&self, el: &Element) -> String {
        let mut data = String::new();
        if let Some(static_class) = &el.static_class {
            data.push_str(&format!("staticClass:{},", static_class));
        }
        if let Some(binding) = &el.class_binding {
            data.push_str(&format!("class:{},", binding));
        }
        data
    }
}
