mod commands;
mod core;
mod logging;
mod platform;
mod project;
mod publish;
mod tools;
mod utils;

use clap::{Parser, Subcommand};
use core::config::PublishOverrides;
use core::error::{RailError, print_error};
use publish::Verbosity;
use std::path::PathBuf;

/// Build-time release helpers: publish packages, collect build metadata
#[derive(Parser)]
#[command(name = "feedrail")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Emit diagnostic tracing on stderr (RUST_LOG takes precedence)
  #[arg(long, global = true)]
  debug: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  // ============================================================================
  // Publishing
  // ============================================================================
  /// Push packages to a feed in parallel, retrying failed pushes
  #[command(visible_alias = "push")]
  Publish {
    /// Package files, or directories whose *.nupkg files should be pushed
    packages: Vec<PathBuf>,
    /// Feed URL or local directory (overrides [publish].feed)
    #[arg(short = 's', long, visible_alias = "source")]
    feed: Option<String>,
    /// API key for the feed (overrides [publish].api_key_env)
    #[arg(short = 'k', long)]
    api_key: Option<String>,
    /// Maximum concurrent pushes (default: twice the logical CPU count)
    #[arg(short = 'j', long)]
    parallelism: Option<usize>,
    /// Per-push timeout in seconds (0 disables it)
    #[arg(short = 't', long = "timeout")]
    timeout_secs: Option<u64>,
    /// Additional attempts after the first failed push
    #[arg(short = 'r', long)]
    retries: Option<u32>,
    /// How much push output to show
    #[arg(short = 'v', long, value_enum, default_value_t = Verbosity::Normal)]
    verbosity: Verbosity,
  },

  // ============================================================================
  // Build metadata
  // ============================================================================
  /// Report the active branch and commit from the .git directory
  GitInfo {
    /// Repository root (default: current directory)
    #[arg(long)]
    repo: Option<PathBuf>,
    /// Report unreadable git state as a warning instead of a message
    #[arg(long)]
    warn_on_error: bool,
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Collect target frameworks and layout metadata for project.json files
  ProjectMetadata {
    /// Paths to project.json descriptors
    #[arg(required = true)]
    projects: Vec<PathBuf>,
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Print the name of the platform the build is running on
  Platform {
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Find the newest installed version of a packaged tool
  ResolveTool {
    /// Package id, e.g. xunit.runner.console
    #[arg(long)]
    package_id: String,
    /// Package cache directory (overrides [tools].packages_dir)
    #[arg(long)]
    packages_dir: Option<PathBuf>,
    /// Path of the tool inside the package, e.g. tools/xunit.console.exe
    #[arg(long)]
    relative_path: PathBuf,
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Cyan))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Cyan))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();
  logging::init(cli.debug);

  let result = match cli.command {
    // Publishing
    Commands::Publish {
      packages,
      feed,
      api_key,
      parallelism,
      timeout_secs,
      retries,
      verbosity,
    } => commands::run_publish(
      packages,
      PublishOverrides {
        feed,
        api_key,
        parallelism,
        timeout_secs,
        retries,
      },
      verbosity,
    ),

    // Build metadata
    Commands::GitInfo {
      repo,
      warn_on_error,
      json,
    } => commands::run_git_info(repo, warn_on_error, json),
    Commands::ProjectMetadata { projects, json } => commands::run_project_metadata(projects, json),
    Commands::Platform { json } => commands::run_platform(json),
    Commands::ResolveTool {
      package_id,
      packages_dir,
      relative_path,
      json,
    } => commands::run_resolve_tool(package_id, packages_dir, relative_path, json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

/// Print the error and exit with its category's code
fn handle_error(err: RailError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
