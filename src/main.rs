//! carve's main application entry point.
//! Previews a run, shows what would change, asks for confirmation and then
//! applies the same run for real.

use std::path::Path;

use carve::{
    cli::{get_args, Args},
    config::get_config,
    error::{default_error_handler, Result},
    processor::{self, Outcome, Report},
    prompt::{DialoguerPrompter, Prompter},
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose { log::LevelFilter::Trace } else { log::LevelFilter::Off })
        .init();

    match run(args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => default_error_handler(err),
    }
}

fn print_report(report: &Report, root: &Path, dry_run: bool) {
    for (path, file) in report.changed() {
        let relative = path.strip_prefix(root).unwrap_or(path);
        let kinds: Vec<&str> = file.kinds.iter().map(|k| k.suffix()).collect();
        let action = match (file.outcome, dry_run) {
            (Outcome::Deleted, true) => "Would delete",
            (Outcome::Deleted, false) => "Deleted",
            (_, true) => "Would modify",
            (_, false) => "Modified",
        };
        println!("{}: '{}' [{}]", action, relative.display(), kinds.join(", "));
    }
    for (path, err) in report.failures() {
        let relative = path.strip_prefix(root).unwrap_or(path);
        eprintln!("Failed: '{}': {}", relative.display(), err);
    }
}

/// Main application logic execution.
///
/// # Returns
/// * `Result<bool>` - `false` if any file failed
///
/// # Flow
/// 1. Loads the configuration file from the target root
/// 2. Runs the engine in dry-run mode and prints the summary
/// 3. Stops there for `--dry-run` or when nothing would change
/// 4. Asks for confirmation and applies the run
fn run(args: Args) -> Result<bool> {
    let prompt = DialoguerPrompter::new();
    let config = get_config(&args.root)?;
    let mut run_config = args.run_config(config);
    let root = run_config.root.canonicalize().unwrap_or_else(|_| run_config.root.clone());

    let dry_run_requested = run_config.dry_run;
    run_config.dry_run = true;
    let preview = processor::run(&run_config)?;
    let changed = preview.changed().count();

    if dry_run_requested || changed == 0 || preview.has_failures() {
        if args.json {
            println!("{:#}", preview.to_json());
        } else {
            print_report(&preview, &root, true);
            if changed == 0 {
                println!("No directives to apply in {}.", root.display());
            }
        }
        return Ok(!preview.has_failures());
    }

    if !args.json {
        print_report(&preview, &root, true);
    }
    let confirmed = prompt.confirm(
        args.yes,
        format!("Apply {} mode to {} file(s)?", run_config.mode, changed),
    )?;
    if !confirmed {
        println!("Aborted, no files were changed.");
        return Ok(true);
    }

    run_config.dry_run = false;
    let report = processor::run(&run_config)?;
    if args.json {
        println!("{:#}", report.to_json());
    } else {
        print_report(&report, &root, false);
        println!("Processed {} file(s) in {}.", report.len(), root.display());
    }
    Ok(!report.has_failures())
}
