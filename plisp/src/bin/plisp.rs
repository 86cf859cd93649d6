// plisp command-line runner
// Reads one program, evaluates it once against a fresh runtime, and exits

use anyhow::Context;
use clap::Parser;
use plisp::config::{load_config, LoggingConfig, PlispConfig};
use plisp::input_handling::{
    detect_input_source, read_input_content, validate_input_args, InputConfig, InputSource,
};
use plisp::reader::parse_program;
use plisp::runtime::{Runtime, StdioHost};
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "plisp")]
#[command(about = "Evaluate a plisp program written as a JSON expression")]
#[command(version)]
struct Args {
    /// Input source type (defaults to file, string, or stdin depending on the other arguments)
    #[arg(short = 'i', long, value_enum)]
    input: Option<InputSource>,

    /// Input program file (when using --input file)
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    file: Option<PathBuf>,

    /// Input program string (when using --input string)
    #[arg(short = 's', long = "string")]
    string: Option<String>,

    /// Input program file (positional argument, alternative to --file)
    #[arg(value_name = "FILE", conflicts_with = "file")]
    input_file: Option<PathBuf>,

    /// Path to a TOML configuration file
    #[arg(long, env = "PLISP_CONFIG")]
    config: Option<PathBuf>,

    /// Maximum evaluation nesting depth (overrides the config file)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Verbose logging (plisp=debug)
    #[arg(short, long)]
    verbose: bool,

    /// Dump the parsed program to stderr before evaluating it
    #[arg(long)]
    dump_ast: bool,

    /// Print the program's final value unless it is nil
    #[arg(long)]
    print_result: bool,
}

impl Args {
    /// CLI arguments take precedence over config file values
    fn resolve_config(&self) -> anyhow::Result<PlispConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => PlispConfig::default(),
        };
        if self.max_depth.is_some() {
            config.evaluator.max_depth = self.max_depth;
        }
        if self.verbose {
            config.logging.filter = "plisp=debug".to_string();
        }
        Ok(config)
    }
}

/// Logs go to stderr so stdout carries only program output.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = args.resolve_config()?;
    init_logging(&config.logging);

    if let Some(path) = &args.config {
        info!("Using configuration: {}", path.display());
    }

    let file_path = args.file.clone().or_else(|| args.input_file.clone());
    let source = match args.input {
        Some(source) => source,
        None => detect_input_source(&file_path, &args.string)?,
    };
    validate_input_args(source, &file_path, &args.string)?;

    let input = read_input_content(&InputConfig::for_source(
        source,
        file_path,
        args.string.clone(),
    )?)?;
    debug!(source = %input.source_name, bytes = input.content.len(), "program loaded");

    let program = parse_program(&input.content)
        .with_context(|| format!("failed to read program from {}", input.source_name))?;
    if args.dump_ast {
        eprintln!("{program:#?}");
    }

    let runtime = Runtime::with_config(Rc::new(StdioHost), config.evaluator);
    let result = runtime
        .run(&program)
        .with_context(|| format!("evaluation of {} failed", input.source_name))?;

    if args.print_result && !result.is_nil() {
        println!("{result}");
    }
    Ok(())
}
