mod decl_file;
mod report;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

use crate::decl_file::{LoadedDecl, load_decl};

#[derive(Parser)]
#[command(name = "argbind")]
#[command(version, about = "Try out argbind parser declarations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse arguments with a declared parser and print the resulting values
    Run(RunArgs),

    /// Print the usage text of a declared parser
    Usage(DeclArgs),

    /// Validate a declaration and list the arguments it registers
    Check(CheckArgs),
}

#[derive(Parser)]
struct DeclArgs {
    /// Path to the parser declaration (JSON)
    #[arg(short, long, value_name = "FILE", default_value = decl_file::DEFAULT_DECL_NAME)]
    decl: PathBuf,
}

#[derive(Parser)]
struct RunArgs {
    #[command(flatten)]
    decl: DeclArgs,

    /// Print values as a JSON object
    #[arg(long)]
    json: bool,

    /// Arguments handed to the declared parser
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    args: Vec<String>,
}

#[derive(Parser)]
struct CheckArgs {
    #[command(flatten)]
    decl: DeclArgs,

    /// Print the argument list as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Usage(args) => usage(args),
        Commands::Check(args) => check(args),
    }
}

fn build(loaded: &LoadedDecl) -> Result<argbind::Parser> {
    loaded
        .decl
        .build()
        .with_context(|| format!("invalid declaration: {}", loaded.path.display()))
}

fn run(args: RunArgs) -> Result<()> {
    tracing::debug!("executing run command");

    let loaded = load_decl(&args.decl.decl)?;
    let mut parser = build(&loaded)?;
    let program = loaded.program_name();

    let argv = std::iter::once(program.clone()).chain(args.args);
    if let Err(err) = parser.parse(argv) {
        eprintln!("{program}: {err}");
        std::process::exit(2);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report::values(&parser))?);
    } else {
        print!("{}", report::values_text(&parser));
    }
    Ok(())
}

fn usage(args: DeclArgs) -> Result<()> {
    tracing::debug!("executing usage command");

    let loaded = load_decl(&args.decl)?;
    let mut parser = build(&loaded)?;
    if parser.program_name().is_none() {
        parser.set_program_name(loaded.program_name());
    }
    print!("{}", parser.usage());
    Ok(())
}

fn check(args: CheckArgs) -> Result<()> {
    tracing::debug!("executing check command");

    let loaded = load_decl(&args.decl.decl)?;
    let parser = build(&loaded)?;
    let rows = report::spec_rows(&parser);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", report::spec_table(&rows));
        eprintln!("OK: {} argument(s) in {}", rows.len(), loaded.path.display());
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
