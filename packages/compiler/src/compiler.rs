//! Compiler Facade
//!
//! Runs the pipeline (parse, optimize, generate) for one template and exposes a
//! memoizing wrapper that turns the generated source into callable values through a
//! caller supplied [`FunctionFactory`].

use crate::codegen::generate;
use crate::config::{base_options, CompileOptions, CompilerOptions};
use crate::error::{CompileError, Result};
use crate::optimizer::optimize;
use crate::parse_util::{Diagnostic, Diagnostics, SourceRange};
use crate::parser::ast::Ast;
use crate::parser::parse;
use serde::Serialize;
use std::collections::HashMap;

/// Output of a single compile
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledResult {
    pub ast: Ast,
    pub render: String,
    pub static_render_fns: Vec<String>,
    pub errors: Vec<Diagnostic>,
    pub tips: Vec<Diagnostic>,
}

/// Template compiler bound to a set of base options
#[derive(Debug, Clone)]
pub struct Compiler {
    base: CompilerOptions,
}

impl Default for Compiler {
    fn default() -> Self {
        Compiler::new(base_options())
    }
}

impl Compiler {
    pub fn new(base: CompilerOptions) -> Self {
        Compiler { base }
    }

    pub fn base_options(&self) -> &CompilerOptions {
        &self.base
    }

    /// Compile `template`, layering `options` onto the base options.
    ///
    /// Never fails: problems in the template are returned as `errors` and `tips`
    /// and are also forwarded to the warn handler, if one is configured.
    pub fn compile(&self, template: &str, options: Option<&CompileOptions>) -> CompiledResult {
        let merged;
        let options = match options {
            Some(overrides) => {
                merged = self.base.merge(overrides);
                &merged
            }
            None => &self.base,
        };

        let trimmed = template.trim();
        let leading = template.len() - template.trim_start().len();
        log::debug!("compiling template ({} bytes)", trimmed.len());

        let mut diagnostics = Diagnostics::new();
        let mut ast = parse(trimmed, options, &mut diagnostics);
        if options.optimize {
            optimize(&mut ast, options);
        }
        let code = generate(&ast, options, &mut diagnostics);

        let (errors, tips) = diagnostics.into_split();
        let errors: Vec<Diagnostic> = errors.into_iter().map(|d| shift(d, leading)).collect();
        let tips: Vec<Diagnostic> = tips.into_iter().map(|d| shift(d, leading)).collect();
        if let Some(warn) = &options.warn {
            errors.iter().chain(&tips).for_each(|d| warn(d));
        }

        CompiledResult {
            ast,
            render: code.render,
            static_render_fns: code.static_render_fns,
            errors,
            tips,
        }
    }
}

/// Ranges are reported against the untrimmed template
fn shift(mut diagnostic: Diagnostic, offset: usize) -> Diagnostic {
    diagnostic.range = diagnostic
        .range
        .map(|r| SourceRange::new(r.start + offset, r.end + offset));
    diagnostic
}

/// Turns generated function bodies into something callable
pub trait FunctionFactory {
    type Output: Clone;

    fn create(&self, code: &str) -> Result<Self::Output>;

    /// Value used in place of a function that could not be created
    fn noop(&self) -> Self::Output;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionGenError {
    pub err: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledFunctions<T> {
    pub render: T,
    pub static_render_fns: Vec<T>,
    pub errors: Vec<Diagnostic>,
    pub tips: Vec<Diagnostic>,
    pub fn_gen_errors: Vec<FunctionGenError>,
}

/// Memoizing front end over [`Compiler`].
///
/// Results are cached per delimiters and template text for the lifetime of the value.
pub struct CompileToFunctions<F: FunctionFactory> {
    compiler: Compiler,
    factory: F,
    cache: HashMap<String, CompiledFunctions<F::Output>>,
}

impl<F: FunctionFactory> CompileToFunctions<F> {
    pub fn new(compiler: Compiler, factory: F) -> Self {
        CompileToFunctions {
            compiler,
            factory,
            cache: HashMap::new(),
        }
    }

    pub fn compile(
        &mut self,
        template: &str,
        options: Option<&CompileOptions>,
    ) -> CompiledFunctions<F::Output> {
        let key = cache_key(template, options);
        if let Some(cached) = self.cache.get(&key) {
            log::debug!("template cache hit");
            return cached.clone();
        }
        log::debug!("template cache miss");

        let compiled = self.compiler.compile(template, options);
        let mut fn_gen_errors = Vec::new();
        let render = self.make_function(&compiled.render, &mut fn_gen_errors);
        let static_render_fns = compiled
            .static_render_fns
            .iter()
            .map(|code| self.make_function(code, &mut fn_gen_errors))
            .collect();
        for error in &fn_gen_errors {
            log::warn!("failed to generate render function: {} in {}", error.err, error.code);
        }

        let functions = CompiledFunctions {
            render,
            static_render_fns,
            errors: compiled.errors,
            tips: compiled.tips,
            fn_gen_errors,
        };
        self.cache.insert(key, functions.clone());
        functions
    }

    fn make_function(&self, code: &str, errors: &mut Vec<FunctionGenError>) -> F::Output {
        match self.factory.create(code) {
            Ok(function) => function,
            Err(err) => {
                errors.push(FunctionGenError {
                    err: err.to_string(),
                    code: code.to_string(),
                });
                self.factory.noop()
            }
        }
    }
}

fn cache_key(template: &str, options: Option<&CompileOptions>) -> String {
    match options.and_then(|o| o.config.delimiters.as_ref()) {
        Some((open, close)) => format!("{},{}{}", open, close, template),
        None => template.to_string(),
    }
}

/// Factory producing `function(){...}` source text
#[derive(Debug, Clone, Copy, Default)]
pub struct JsFunctionSource;

impl FunctionFactory for JsFunctionSource {
    type Output = String;

    fn create(&self, code: &str) -> Result<String> {
        check_balanced(code).map_err(|message| CompileError::FunctionConstruction {
            message,
            code: code.to_string(),
        })?;
        Ok(format!("function(){{{}}}", code))
    }

    fn noop(&self) -> String {
        "function(){}".to_string()
    }
}

/// Brackets outside of string literals must pair up
fn check_balanced(code: &str) -> std::result::Result<(), String> {
    let mut stack = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in code.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '(' | '[' | '{' => stack.push(c),
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                if stack.pop() != Some(expected) {
                    return Err(format!("unexpected `{}` at {}", c, i));
                }
            }
            _ => {}
        }
    }
    if let Some(q) = quote {
        return Err(format!("unterminated string literal starting with {}", q));
    }
    match stack.pop() {
        Some(open) => Err(format!("unclosed `{}`", open)),
        None => Ok(()),
    }
}
