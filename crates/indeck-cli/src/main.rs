use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::{fs, io};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use indeck_parse::{Document, IncludeSource, ParseError};

#[derive(Parser)]
#[command(name = "indeck", about = "Input-deck utilities")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a deck and print a short summary
    Check(DeckArgs),
    /// Parse a deck and print its canonical form
    Fmt(DeckArgs),
    /// Parse a deck and print the tree as JSON
    Dump(DeckArgs),
}

#[derive(Args)]
struct DeckArgs {
    /// Path to the deck file
    file: PathBuf,
    /// Seed variable, like an @SET before line 1 (repeatable)
    #[arg(short = 'D', value_name = "NAME=VALUE")]
    define: Vec<String>,
}

/// Resolves `@INCLUDE` names relative to the main deck's directory.
struct DirSource(PathBuf);

impl IncludeSource for DirSource {
    fn load(&self, name: &str) -> io::Result<String> {
        fs::read_to_string(self.0.join(name))
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Check(args) => run(&args, |doc| {
            println!(
                "{}: {} section(s), {} top-level node(s)",
                args.file.display(),
                doc.section_count(),
                doc.nodes().len()
            );
            Ok(())
        }),
        Commands::Fmt(args) => run(&args, |doc| {
            print!("{}", doc.to_deck_string());
            Ok(())
        }),
        Commands::Dump(args) => run(&args, |doc| {
            println!("{}", serde_json::to_string_pretty(doc)?);
            Ok(())
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // parse errors already carry line context; print them bare
            match e.downcast_ref::<ParseError>() {
                Some(parse_error) => eprintln!("{parse_error}"),
                None => eprintln!("error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(
    args: &DeckArgs,
    emit: impl FnOnce(&Document) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;

    let base_dir = args
        .file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .to_path_buf();

    let mut parser = indeck_parse::Parser::new().with_include_source(DirSource(base_dir));
    for define in &args.define {
        let Some((name, value)) = define.split_once('=') else {
            bail!("-D takes NAME=VALUE, got '{define}'");
        };
        parser = parser.with_variable(name, value);
    }

    let doc = parser.parse(&text)?;
    emit(&doc)
}
