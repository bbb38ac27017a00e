/**
 * Template Compiler CLI - tplc
 *
 * Compiles a template file (or stdin) and prints the render code
 */
use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use std::path::Path;
use std::process;
use template_compiler_cli::perform_compile::{
    exit_code_from_result, format_diagnostics, parse_whitespace, perform_compilation,
    read_configuration, read_template, ConfigOverrides, OutputFormat,
};

fn main() {
    env_logger::init();
    match run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            process::exit(2);
        }
    }
}

fn run() -> Result<i32> {
    let matches = Command::new("tplc")
        .version(template_compiler_cli::version())
        .about("Compile view templates into render functions")
        .arg(
            Arg::new("input")
                .value_name("FILE")
                .help("Template file, reads stdin when omitted or `-`"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("JSON compiler configuration"),
        )
        .arg(
            Arg::new("ast")
                .long("ast")
                .action(ArgAction::SetTrue)
                .conflicts_with("module")
                .help("Print the optimized AST instead of the render code"),
        )
        .arg(
            Arg::new("module")
                .long("module")
                .action(ArgAction::SetTrue)
                .help("Print `{render, staticRenderFns}` as function source"),
        )
        .arg(
            Arg::new("no-optimize")
                .long("no-optimize")
                .action(ArgAction::SetTrue)
                .help("Skip static tree optimization"),
        )
        .arg(
            Arg::new("whitespace")
                .long("whitespace")
                .value_name("MODE")
                .value_parser(["preserve", "condense"])
                .help("Whitespace handling"),
        )
        .arg(
            Arg::new("delimiters")
                .long("delimiters")
                .num_args(2)
                .value_names(["OPEN", "CLOSE"])
                .help("Interpolation delimiters"),
        )
        .get_matches();

    let whitespace = matches
        .get_one::<String>("whitespace")
        .map(|mode| parse_whitespace(mode))
        .transpose()?;
    let delimiters = matches
        .get_many::<String>("delimiters")
        .map(|values| values.cloned().collect::<Vec<_>>())
        .and_then(|values| match values.as_slice() {
            [open, close] => Some((open.clone(), close.clone())),
            _ => None,
        });
    let overrides = ConfigOverrides {
        no_optimize: matches.get_flag("no-optimize"),
        whitespace,
        delimiters,
    };
    let config = read_configuration(
        matches.get_one::<String>("config").map(Path::new),
        &overrides,
    )?;
    let template = read_template(matches.get_one::<String>("input").map(Path::new))?;

    let format = if matches.get_flag("ast") {
        OutputFormat::Ast
    } else if matches.get_flag("module") {
        OutputFormat::Module
    } else {
        OutputFormat::Json
    };

    let output = perform_compilation(&template, config, format)?;
    println!("{}", output.text);

    let diagnostics: Vec<_> = output.errors.iter().chain(&output.tips).cloned().collect();
    if !diagnostics.is_empty() {
        eprint!("{}", format_diagnostics(&template, &diagnostics));
    }
    Ok(exit_code_from_result(&output.errors))
}
