//! Compile-time Directives
//!
//! A directive handler sees a directive occurrence while the element's data object is
//! generated. It may rewrite the element (add props, handlers, wrappers) and reports
//! whether the directive still needs its runtime counterpart.

pub mod dom;
pub mod model;

pub use dom::{HtmlDirective, TextDirective};
pub use model::{gen_assignment_code, parse_model, ModelDirective};

use crate::modules::TransformContext;
use crate::parser::ast::{BindWrapper, Directive, Element};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

pub trait DirectiveHandler: Send + Sync {
    /// Returns true when the directive must also be emitted for the runtime
    fn transform(&self, el: &mut Element, dir: &Directive, ctx: &mut TransformContext<'_>) -> bool;
}

impl<F> DirectiveHandler for F
where
    F: Fn(&mut Element, &Directive, &mut TransformContext<'_>) -> bool + Send + Sync,
{
    fn transform(&self, el: &mut Element, dir: &Directive, ctx: &mut TransformContext<'_>) -> bool {
        self(el, dir, ctx)
    }
}

/// Directive handlers by name
#[derive(Clone, Default)]
pub struct DirectiveRegistry {
    handlers: IndexMap<String, Arc<dyn DirectiveHandler>>,
}

impl DirectiveRegistry {
    pub fn new() -> Self {
        DirectiveRegistry::default()
    }

    pub fn register(&mut self, name: impl Into<String>, handler: Arc<dyn DirectiveHandler>) {
        self.handlers.insert(name.into(), handler);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn DirectiveHandler>> {
        self.handlers.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Copy of this registry with `other`'s handlers registered on top
    pub fn layered(&self, other: &DirectiveRegistry) -> DirectiveRegistry {
        let mut layered = self.clone();
        for (name, handler) in &other.handlers {
            layered.handlers.insert(name.clone(), handler.clone());
        }
        layered
    }
}

impl fmt::Debug for DirectiveRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}

/// `v-on="listeners"`
#[derive(Debug, Clone, Copy, Default)]
pub struct OnDirective;

impl DirectiveHandler for OnDirective {
    fn transform(&self, el: &mut Element, dir: &Directive, ctx: &mut TransformContext<'_>) -> bool {
        if dir.modifiers.is_some() {
            ctx.diagnostics
                .warn("v-on without argument does not support modifiers.", dir.range);
        }
        el.wrap_listeners = Some(dir.value.clone());
        false
    }
}

/// `v-bind="attrs"`
#[derive(Debug, Clone, Copy, Default)]
pub struct BindDirective;

impl DirectiveHandler for BindDirective {
    fn transform(&self, el: &mut Element, dir: &Directive, _ctx: &mut TransformContext<'_>) -> bool {
        el.wrap_data = Some(BindWrapper {
            value: dir.value.clone(),
            prop: dir.has_modifier("prop"),
            sync: dir.has_modifier("sync"),
        });
        false
    }
}

/// `v-cloak` only matters to stylesheets
#[derive(Debug, Clone, Copy, Default)]
pub struct CloakDirective;

impl DirectiveHandler for CloakDirective {
    fn transform(&self, _el: &mut Element, _dir: &Directive, _ctx: &mut TransformContext<'_>) -> bool {
        false
    }
}

/// Directives every platform understands
pub fn base_directives() -> DirectiveRegistry {
    let mut registry = DirectiveRegistry::new();
    registry.register("on", Arc::new(OnDirective));
    registry.register("bind", Arc::new(BindDirective));
    registry.register("cloak", Arc::new(CloakDirective));
    registry
}
