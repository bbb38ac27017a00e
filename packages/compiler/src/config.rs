//! Compiler Configuration
//!
//! `CompilerOptions` is the immutable value every pipeline stage reads from. Callers
//! describe their overrides with `CompileOptions` (a serializable `CompilerConfig` plus
//! extra modules, directives and a warning handler) which is merged onto the base
//! options for each compile.

use crate::directives::{DirectiveRegistry, HtmlDirective, ModelDirective, TextDirective};
use crate::error::{CompileError, Result};
use crate::modules::{ClassModule, CompilerModule, StyleModule};
use crate::parse_util::Diagnostic;
use crate::platform::{NullPlatform, Platform, WebPlatform};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Receives every diagnostic as it is reported
pub type WarnHandler = Arc<dyn Fn(&Diagnostic) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhitespaceMode {
    /// Whitespace-only text between elements becomes a single space
    Preserve,
    /// Whitespace-only text containing a line break is removed, other runs collapse
    Condense,
}

/// How a name was bound by the script the template belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BindingType {
    Data,
    Props,
    PropsAliased,
    SetupLet,
    SetupConst,
    SetupReactiveConst,
    SetupMaybeRef,
    SetupRef,
    Options,
    LiteralConst,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BindingMetadata {
    #[serde(
        rename = "__isScriptSetup",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub is_script_setup: Option<bool>,
    #[serde(flatten)]
    pub bindings: IndexMap<String, BindingType>,
}

impl BindingMetadata {
    pub fn get(&self, name: &str) -> Option<BindingType> {
        self.bindings.get(name).copied()
    }

    pub fn insert(&mut self, name: impl Into<String>, binding: BindingType) {
        self.bindings.insert(name.into(), binding);
    }
}

#[derive(Clone)]
pub struct CompilerOptions {
    pub expect_html: bool,
    pub platform: Arc<dyn Platform>,
    pub modules: Vec<Arc<dyn CompilerModule>>,
    pub directives: DirectiveRegistry,
    /// Comma separated element keys that do not break static-ness
    pub static_keys: String,
    pub whitespace: Option<WhitespaceMode>,
    pub preserve_whitespace: bool,
    pub optimize: bool,
    pub delimiters: Option<(String, String)>,
    pub comments: bool,
    pub should_decode_newlines: bool,
    pub should_decode_newlines_for_href: bool,
    pub bindings: Option<BindingMetadata>,
    pub warn: Option<WarnHandler>,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        CompilerOptions {
            expect_html: false,
            platform: Arc::new(NullPlatform),
            modules: Vec::new(),
            directives: DirectiveRegistry::new(),
            static_keys: String::new(),
            whitespace: None,
            preserve_whitespace: true,
            optimize: true,
            delimiters: None,
            comments: false,
            should_decode_newlines: false,
            should_decode_newlines_for_href: false,
            bindings: None,
            warn: None,
        }
    }
}

impl fmt::Debug for CompilerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompilerOptions")
            .field("expect_html", &self.expect_html)
            .field("platform", &self.platform)
            .field(
                "modules",
                &self.modules.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .field("directives", &self.directives)
            .field("static_keys", &self.static_keys)
            .field("whitespace", &self.whitespace)
            .field("preserve_whitespace", &self.preserve_whitespace)
            .field("optimize", &self.optimize)
            .field("delimiters", &self.delimiters)
            .field("comments", &self.comments)
            .field("bindings", &self.bindings)
            .field("warn", &self.warn.is_some())
            .finish()
    }
}

/// Comma-join the static keys contributed by `modules`
pub fn gen_static_keys(modules: &[Arc<dyn CompilerModule>]) -> String {
    modules
        .iter()
        .flat_map(|m| m.static_keys())
        .collect::<Vec<_>>()
        .join(",")
}

/// Options for the browser DOM
pub fn base_options() -> CompilerOptions {
    let modules: Vec<Arc<dyn CompilerModule>> = vec![Arc::new(ClassModule), Arc::new(StyleModule)];
    let mut directives = DirectiveRegistry::new();
    directives.register("model", Arc::new(ModelDirective));
    directives.register("text", Arc::new(TextDirective));
    directives.register("html", Arc::new(HtmlDirective));

    CompilerOptions {
        expect_html: true,
        platform: Arc::new(WebPlatform),
        static_keys: gen_static_keys(&modules),
        modules,
        directives,
        ..CompilerOptions::default()
    }
}

/// Serializable part of the caller's options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompilerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whitespace: Option<WhitespaceMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preserve_whitespace: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimize: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiters: Option<(String, String)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_decode_newlines: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_decode_newlines_for_href: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bindings: Option<BindingMetadata>,
}

impl CompilerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: CompilerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some((open, close)) = &self.delimiters {
            if open.is_empty() || close.is_empty() {
                return Err(CompileError::InvalidOption {
                    option: "delimiters".to_string(),
                    reason: "both delimiters must be non-empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Per-call overrides layered onto the base options
#[derive(Clone, Default)]
pub struct CompileOptions {
    pub config: CompilerConfig,
    pub modules: Vec<Arc<dyn CompilerModule>>,
    pub directives: DirectiveRegistry,
    pub warn: Option<WarnHandler>,
}

impl CompileOptions {
    pub fn new(config: CompilerConfig) -> Self {
        CompileOptions {
            config,
            ..CompileOptions::default()
        }
    }

    pub fn with_module(mut self, module: Arc<dyn CompilerModule>) -> Self {
        self.modules.push(module);
        self
    }

    pub fn with_directive(
        mut self,
        name: impl Into<String>,
        handler: Arc<dyn crate::directives::DirectiveHandler>,
    ) -> Self {
        self.directives.register(name, handler);
        self
    }

    pub fn with_warn(mut self, warn: WarnHandler) -> Self {
        self.warn = Some(warn);
        self
    }
}

impl fmt::Debug for CompileOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompileOptions")
            .field("config", &self.config)
            .field(
                "modules",
                &self.modules.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .field("directives", &self.directives)
            .field("warn", &self.warn.is_some())
            .finish()
    }
}

impl CompilerOptions {
    /// Layer `overrides` onto these options.
    ///
    /// Modules are appended after the base ones, directives are layered with the
    /// caller's entries winning, and every field the caller set replaces the base value.
    pub fn merge(&self, overrides: &CompileOptions) -> CompilerOptions {
        let mut merged = self.clone();

        if !overrides.modules.is_empty() {
            merged.modules.extend(overrides.modules.iter().cloned());
            merged.static_keys = gen_static_keys(&merged.modules);
        }
        if !overrides.directives.is_empty() {
            merged.directives = self.directives.layered(&overrides.directives);
        }

        let config = &overrides.config;
        if config.whitespace.is_some() {
            merged.whitespace = config.whitespace;
        }
        if let Some(preserve) = config.preserve_whitespace {
            merged.preserve_whitespace = preserve;
        }
        if let Some(optimize) = config.optimize {
            merged.optimize = optimize;
        }
        if config.delimiters.is_some() {
            match config.validate() {
                Ok(()) => merged.delimiters = config.delimiters.clone(),
                Err(err) => log::warn!("keeping default delimiters: {}", err),
            }
        }
        if let Some(comments) = config.comments {
            merged.comments = comments;
        }
        if let Some(decode) = config.should_decode_newlines {
            merged.should_decode_newlines = decode;
        }
        if let Some(decode) = config.should_decode_newlines_for_href {
            merged.should_decode_newlines_for_href = decode;
        }
        if config.bindings.is_some() {
            merged.bindings = config.bindings.clone();
        }
        if overrides.warn.is_some() {
            merged.warn = overrides.warn.clone();
        }
        merged
    }
}
