//! Perform Compile
//!
//! Reads a template and its configuration, runs the compiler and renders the result
//! in the requested output format.

use anyhow::{Context, Result};
use serde_json::json;
use std::fs;
use std::io::Read;
use std::path::Path;
use template_compiler::{
    CompileOptions, CompileToFunctions, CompiledResult, Compiler, CompilerConfig, Diagnostic,
    JsFunctionSource, WhitespaceMode,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `{render, staticRenderFns, errors, tips}`
    #[default]
    Json,
    /// The optimized AST
    Ast,
    /// `{render:function(){...},staticRenderFns:[...]}`
    Module,
}

/// Command line overrides applied on top of the configuration file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub no_optimize: bool,
    pub whitespace: Option<WhitespaceMode>,
    pub delimiters: Option<(String, String)>,
}

#[derive(Debug)]
pub struct CompilationOutput {
    pub text: String,
    pub errors: Vec<Diagnostic>,
    pub tips: Vec<Diagnostic>,
}

/// Load the JSON configuration at `path`, or the defaults when there is none
pub fn read_configuration(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<CompilerConfig> {
    let mut config = match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            CompilerConfig::from_json(&json)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => CompilerConfig::default(),
    };
    if overrides.no_optimize {
        config.optimize = Some(false);
    }
    if overrides.whitespace.is_some() {
        config.whitespace = overrides.whitespace;
    }
    if overrides.delimiters.is_some() {
        config.delimiters = overrides.delimiters.clone();
    }
    config.validate()?;
    Ok(config)
}

/// Read the template from `path`, or from stdin for `None` and `-`
pub fn read_template(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("failed to read template {}", path.display())),
        _ => {
            let mut template = String::new();
            std::io::stdin()
                .read_to_string(&mut template)
                .context("failed to read template from stdin")?;
            Ok(template)
        }
    }
}

pub fn parse_whitespace(value: &str) -> Result<WhitespaceMode> {
    match value {
        "preserve" => Ok(WhitespaceMode::Preserve),
        "condense" => Ok(WhitespaceMode::Condense),
        other => anyhow::bail!("unknown whitespace mode `{}`", other),
    }
}

pub fn perform_compilation(
    template: &str,
    config: CompilerConfig,
    format: OutputFormat,
) -> Result<CompilationOutput> {
    let options = CompileOptions::new(config);
    if format == OutputFormat::Module {
        let mut functions = CompileToFunctions::new(Compiler::default(), JsFunctionSource);
        let compiled = functions.compile(template, Some(&options));
        for error in &compiled.fn_gen_errors {
            log::error!("{}", error.err);
        }
        let text = format!(
            "{{render:{},staticRenderFns:[{}]}}",
            compiled.render,
            compiled.static_render_fns.join(",")
        );
        return Ok(CompilationOutput {
            text,
            errors: compiled.errors,
            tips: compiled.tips,
        });
    }

    let CompiledResult {
        ast,
        render,
        static_render_fns,
        errors,
        tips,
    } = Compiler::default().compile(template, Some(&options));
    let value = match format {
        OutputFormat::Ast => serde_json::to_value(&ast)?,
        _ => json!({
            "render": render,
            "staticRenderFns": static_render_fns,
            "errors": errors,
            "tips": tips,
        }),
    };
    Ok(CompilationOutput {
        text: serde_json::to_string_pretty(&value)?,
        errors,
        tips,
    })
}

/// One line per diagnostic, with the surrounding template text
pub fn format_diagnostics(template: &str, diagnostics: &[Diagnostic]) -> String {
    let mut output = String::new();
    for diagnostic in diagnostics {
        let category = if diagnostic.is_tip() { "tip" } else { "error" };
        output.push_str(&format!(
            "{}: {}\n",
            category,
            diagnostic.contextual_message(template)
        ));
    }
    output
}

pub fn exit_code_from_result(errors: &[Diagnostic]) -> i32 {
    if errors.is_empty() {
        0
    } else {
        1
    }
}
