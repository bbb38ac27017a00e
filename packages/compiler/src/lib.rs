#![deny(clippy::all)]

/**
 * Template Compiler
 *
 * Compiles HTML-based view templates into render function source: a streaming
 * markup scanner feeds a tree builder, a static optimizer marks hoistable
 * subtrees, and the generator emits render code plus static render functions.
 */

pub mod chars;
pub mod compiler;
pub mod config;
pub mod error;
pub mod parse_util;
pub mod platform;
pub mod util;

// Pipeline stages
pub mod codegen;
pub mod ml_parser;
pub mod optimizer;
pub mod parser;

// Extension points
pub mod directives;
pub mod modules;

// Re-exports
pub use codegen::{generate, CodegenResult};
pub use compiler::{
    CompileToFunctions, CompiledFunctions, CompiledResult, Compiler, FunctionFactory,
    FunctionGenError, JsFunctionSource,
};
pub use config::{
    base_options, BindingMetadata, BindingType, CompileOptions, CompilerConfig, CompilerOptions,
    WarnHandler, WhitespaceMode,
};
pub use directives::{DirectiveHandler, DirectiveRegistry};
pub use error::{CompileError, Result};
pub use modules::{CompilerModule, TransformContext};
pub use optimizer::optimize;
pub use parse_util::{Diagnostic, DiagnosticLevel, Diagnostics, SourceRange};
pub use parser::ast::{Ast, AstNode, Element, NodeId};
pub use parser::parse;
pub use platform::{NullPlatform, Platform, WebPlatform};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compile `template` with the web platform options
pub fn compile(template: &str, options: Option<&CompileOptions>) -> CompiledResult {
    Compiler::default().compile(template, options)
}
