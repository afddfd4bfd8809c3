//! nb2md: CLI tool to convert Zeppelin and Jupyter notebooks to Jupyter or Markdown

mod config;
mod push;

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use config::{CONFIG_FILE_NAME, Config};
use nb2md_core::{AUTO, Format, load_path, read_source, save};
use push::Git;

#[derive(Parser, Debug)]
#[command(name = "nb2md")]
#[command(about = "Convert Zeppelin and Jupyter notebooks to Jupyter or Markdown")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
#[command(after_help = "Examples:
  nb2md --src note.json                       # Convert to <name>.nb.md
  nb2md --src note.json --to ipynb            # Convert to <name>.ipynb
  nb2md --src nb.ipynb --dst nb.md            # Convert to a specific file
  nb2md --src s3://bucket/notes/note.json     # Read from S3
  nb2md --src note.json --push -m 'Add note'  # Commit and push the result
  nb2md init                                  # Create _nb2md.toml")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    convert: ConvertArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a configuration file with default settings
    Init {
        /// Output path for the configuration file
        #[arg(short, long, default_value = CONFIG_FILE_NAME)]
        output: PathBuf,

        /// Print the JSON schema of the configuration file instead
        #[arg(long)]
        schema: bool,
    },
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Source notebook: local path, s3://bucket/key or http(s) URL
    #[arg(long)]
    src: Option<String>,

    /// Destination pathname, or "auto" to name it after the notebook [default: auto]
    #[arg(long)]
    dst: Option<String>,

    /// Target format when the destination is "auto" [default: md]
    #[arg(long, value_enum)]
    to: Option<TargetFormat>,

    /// Commit and push the converted file to the current repository
    #[arg(long)]
    push: bool,

    /// Commit message (prompted for when omitted)
    #[arg(short, long, requires = "push")]
    message: Option<String>,

    /// Configuration file (defaults to ./_nb2md.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only show errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TargetFormat {
    /// Jupyter notebook
    Ipynb,
    /// Flattened Markdown
    Md,
}

impl From<TargetFormat> for Format {
    fn from(target: TargetFormat) -> Self {
        match target {
            TargetFormat::Ipynb => Format::Jupyter,
            TargetFormat::Md => Format::Markdown,
        }
    }
}

fn main() -> Result<()> {
    if std::env::args_os().len() == 1 {
        Cli::command().print_help()?;
        println!();
        std::process::exit(1);
    }

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init { output, schema }) => init_config(&output, schema),
        None => {
            init_logging(cli.convert.verbose, cli.convert.quiet);
            convert(cli.convert)
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else if quiet {
        tracing::Level::ERROR
    } else {
        tracing::Level::INFO
    };
    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .init();
}

/// Load, convert and save one notebook, then optionally commit and push it
fn convert(args: ConvertArgs) -> Result<()> {
    let Some(src) = args.src.as_deref() else {
        // usage error, reported without a failing exit status
        println!("Required input pathname is required; exiting.");
        return Ok(());
    };

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_from_dir(Path::new("."))?.unwrap_or_default(),
    };

    let target = match args.to {
        Some(t) => Some(Format::from(t)),
        None => config.target_format()?,
    };
    let dst = args
        .dst
        .or_else(|| config.output.dst.clone())
        .unwrap_or_else(|| AUTO.to_string());

    let text = read_source(src, &config.fetch_options())
        .with_context(|| format!("Failed to read: {}", src))?;
    let notebook = load_path(&text, src).with_context(|| format!("Failed to load: {}", src))?;
    let path = save(&notebook, &dst, target).with_context(|| format!("Failed to save: {}", dst))?;

    if args.push {
        let message = match args.message {
            Some(m) => m,
            None => prompt("Commit message: ")?,
        };
        Git::new(".").commit_and_push(&path, &message, config.push.remote.as_deref())?;
    }

    if !args.quiet {
        println!("{}", path.display());
        println!("Operation completed.");
    }

    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read commit message")?;
    Ok(line.trim().to_string())
}

/// Write a sample configuration file, or print the JSON schema
fn init_config(output: &Path, schema: bool) -> Result<()> {
    if schema {
        println!("{}", Config::json_schema_string()?);
        return Ok(());
    }

    if output.exists() {
        anyhow::bail!("Configuration file already exists: {}", output.display());
    }

    let content = Config::sample().to_toml_with_schema()?;
    fs::write(output, content)
        .with_context(|| format!("Failed to write: {}", output.display()))?;

    println!("{}", output.display());
    Ok(())
}
