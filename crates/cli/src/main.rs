use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kbuild_lib::consts::APP_NAME;

mod cmd;
mod output;

use output::{OutputFormat, print_error};

/// kbuild - incremental builds for kore applications
#[derive(Parser)]
#[command(name = "kbuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build an application
  Build {
    /// Application directory (default: the current directory)
    app: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
  },

  /// Build an application, then run it
  Run {
    /// Application directory (default: the current directory)
    app: Option<PathBuf>,
  },

  /// Clean up the build files in the current directory
  Clean {
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
  },

  /// Create a new application skeleton
  Create {
    /// Directory to create; its name becomes the application name
    name: PathBuf,
  },
}

impl Commands {
  fn name(&self) -> &'static str {
    match self {
      Commands::Build { .. } => "build",
      Commands::Run { .. } => "run",
      Commands::Clean { .. } => "clean",
      Commands::Create { .. } => "create",
    }
  }
}

fn main() {
  // Logs go to stderr so JSON output on stdout stays parseable
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .with_target(false)
    .without_time()
    .init();

  let cli = Cli::parse();
  let command = cli.command.name();

  let result: Result<()> = match cli.command {
    Commands::Build { app, output } => cmd::cmd_build(app.as_deref(), output),
    Commands::Run { app } => cmd::cmd_run(app.as_deref()),
    Commands::Clean { output } => cmd::cmd_clean(output),
    Commands::Create { name } => cmd::cmd_create(&name),
  };

  if let Err(err) = result {
    print_error(&format!("{} {}: {:#}", APP_NAME, command, err));
    std::process::exit(1);
  }
}
