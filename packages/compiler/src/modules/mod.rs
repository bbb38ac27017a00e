//! Compiler Modules
//!
//! A module hooks into element processing (pre/transform/post) and data-object
//! generation. Modules contribute static keys: element fields they populate that
//! still leave the element eligible for hoisting.

pub mod class;
pub mod style;

pub use class::ClassModule;
pub use style::{parse_style_text, StyleModule};

use crate::config::CompilerOptions;
use crate::parse_util::Diagnostics;
use crate::parser::ast::Element;

/// What a module or directive handler may see while transforming an element
pub struct TransformContext<'a> {
    pub options: &'a CompilerOptions,
    pub diagnostics: &'a mut Diagnostics,
}

impl<'a> TransformContext<'a> {
    pub fn new(options: &'a CompilerOptions, diagnostics: &'a mut Diagnostics) -> Self {
        TransformContext {
            options,
            diagnostics,
        }
    }
}

pub trait CompilerModule: Send + Sync {
    fn name(&self) -> &str;

    fn static_keys(&self) -> Vec<String> {
        Vec::new()
    }

    /// Runs as soon as the start tag is seen, before structural directives
    fn pre_transform_node(&self, _el: &mut Element, _ctx: &mut TransformContext<'_>) {}

    /// Runs when the element closes, before generic attribute classification
    fn transform_node(&self, _el: &mut Element, _ctx: &mut TransformContext<'_>) {}

    /// Runs after the element has been attached to its parent
    fn post_transform_node(&self, _el: &mut Element, _ctx: &mut TransformContext<'_>) {}

    /// Data object fragment, each entry terminated by `,`
    fn gen_data(&self, _el: &Element) -> String {
        String::new()
    }

    /// Rewrite the generated code of an element
    fn transform_code(&self, _el: &Element, code: String) -> String {
        code
    }
}
