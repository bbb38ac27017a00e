use super::DirectiveHandler;
use crate::modules::TransformContext;
use crate::parser::ast::{Directive, Element};
use crate::parser::helpers::add_prop;

/// `v-text` sets `textContent`
#[derive(Debug, Clone, Copy, Default)]
pub struct TextDirective;

impl DirectiveHandler for TextDirective {
    fn transform(&self, el: &mut Element, dir: &Directive, _ctx: &mut TransformContext<'_>) -> bool {
        if !dir.value.is_empty() {
            add_prop(el, "textContent", &format!("_s({})", dir.value), dir.range, false);
        }
        false
    }
}

/// `v-html` sets `innerHTML`
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlDirective;

impl DirectiveHandler for HtmlDirective {
    fn transform(&self, el: &mut Element, dir: &Directive, _ctx: &mut TransformContext<'_>) -> bool {
        if !dir.value.is_empty() {
            add_prop(el, "innerHTML", &format!("_s({})", dir.value), dir.range, false);
        }
        false
    }
}
