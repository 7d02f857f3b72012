//! Command-line interface implementation for carve.
//! Provides argument parsing and help text formatting using clap.

use crate::config::Config;
use crate::processor::{Mode, RunConfig};
use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

/// Command-line arguments structure for carve.
#[derive(Parser, Debug)]
#[command(author, version, about = "carve: strip or apply template directives in a generated project", long_about = None)]
pub struct Args {
    /// Root directory of the generated project
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Execute the directives (remove) or only strip the directive comments (sanitize)
    #[arg(short, long, value_enum, default_value_t = Mode::Remove)]
    pub mode: Mode,

    /// Report what would change without touching any file
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Directive prefix, overrides the configuration file
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// File pattern, repeatable. A leading `!` excludes.
    /// Any pattern given here replaces the configured and default patterns.
    #[arg(long = "pattern", value_name = "GLOB")]
    pub patterns: Vec<String>,

    /// Apply the changes without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Builds the run configuration. Flags win over the configuration file,
    /// which wins over the built-in defaults. Pattern lists are never merged.
    pub fn run_config(&self, config: Config) -> RunConfig {
        let mut run_config = RunConfig::new(&self.root);
        run_config.mode = self.mode;
        run_config.dry_run = self.dry_run;

        if let Some(prefix) = self.prefix.clone().or(config.prefix) {
            run_config.prefix = prefix;
        }
        if !self.patterns.is_empty() {
            run_config.patterns = self.patterns.clone();
        } else if let Some(patterns) = config.patterns {
            run_config.patterns = patterns;
        }
        run_config
    }
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
