//! `customc`: compiles Custom source files to JavaScript.
//!
//! Usage:
//!   customc [OPTIONS] <FILE>
//!
//! Examples:
//!   customc hello.custom                     # Print the generated JavaScript
//!   customc --emit=ast hello.custom          # Dump the parsed tree
//!   customc --config=esperanto.json a.custom # Use configured keywords

use std::{fs, path::PathBuf, process, rc::Rc, time::Instant};

use clap::{Parser, ValueEnum};
use customc::{
    analyzer::analyzer::analyze_with_config,
    config::LanguageConfig,
    display_error,
    errors::errors::Error,
    generator::generator::generate,
    lexer::lexer::tokenize_with_config,
    parser::parser::parse,
};
use log::{debug, error, info};

#[derive(Parser, Debug)]
#[command(name = "customc")]
#[command(version)]
#[command(about = "Compiler for the Custom language", long_about = None)]
struct Cli {
    /// Source file to compile
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// What to emit
    #[arg(long, default_value = "js")]
    emit: EmitKind,

    /// Keyword configuration (JSON)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only report errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum EmitKind {
    /// Token stream
    Tokens,
    /// Parsed tree, before analysis
    Ast,
    /// Tree after analysis, with types and resolved entities
    Analyzed,
    /// Generated JavaScript
    Js,
}

fn fail(message: impl AsRef<str>) -> ! {
    error!("{}", message.as_ref());
    eprintln!("{}", message.as_ref());
    process::exit(1);
}

fn run(cli: &Cli, source: &str, file_name: &str, config: &LanguageConfig) -> Result<String, Error> {
    let start = Instant::now();
    let tokens = tokenize_with_config(source, Some(file_name.to_string()), config)?;
    debug!("tokenized in {:?}", start.elapsed());

    if cli.emit == EmitKind::Tokens {
        let lines: Vec<String> = tokens.iter().map(|token| token.to_string()).collect();
        return Ok(lines.join("\n") + "\n");
    }

    let parse_start = Instant::now();
    let program = parse(tokens, Rc::new(file_name.to_string()))?;
    debug!("parsed in {:?}", parse_start.elapsed());

    if cli.emit == EmitKind::Ast {
        return Ok(program.to_string());
    }

    let analyze_start = Instant::now();
    let program = analyze_with_config(program, config)?;
    debug!("analyzed in {:?}", analyze_start.elapsed());

    if cli.emit == EmitKind::Analyzed {
        return Ok(program.to_string());
    }

    let generate_start = Instant::now();
    let output = generate(&program);
    debug!("generated in {:?}", generate_start.elapsed());
    info!("compiled {} in {:?}", file_name, start.elapsed());

    Ok(output)
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        log::LevelFilter::Error
    } else {
        match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    let config = match &cli.config {
        Some(path) => LanguageConfig::load(path).unwrap_or_else(|err| fail(err.to_string())),
        None => LanguageConfig::default(),
    };

    let source = fs::read_to_string(&cli.input).unwrap_or_else(|err| {
        fail(format!("failed to read {}: {}", cli.input.display(), err))
    });
    let file_name = cli
        .input
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| cli.input.display().to_string());

    let output = match run(&cli, &source, &file_name, &config) {
        Ok(output) => output,
        Err(err) => {
            display_error(&err, &source);
            process::exit(1);
        }
    };

    match &cli.output {
        Some(path) => {
            if let Err(err) = fs::write(path, &output) {
                fail(format!("failed to write {}: {}", path.display(), err));
            }
            info!("wrote {}", path.display());
        }
        None => print!("{}", output),
    }
}
