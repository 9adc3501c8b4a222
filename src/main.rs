use anyhow::{Context, Result};
use clap::Parser;
use shellstrip::{Pipeline, Reporter, RunOptions, StripConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Remove Header/Footer imports and elements from page sources, backing up originals first",
    long_about = None
)]
struct Args {
    /// Directory to scan (defaults to "app")
    root: Option<PathBuf>,

    /// Directory receiving copies of files before they are rewritten
    #[arg(long, short, value_name = "DIR")]
    backup_dir: Option<PathBuf>,

    /// Path never to rewrite, matched against the end of each file path
    /// (can be specified multiple times)
    #[arg(long, short = 'x', value_name = "PATH")]
    exclude: Vec<PathBuf>,

    /// Component to strip; replaces the default Header and Footer
    /// (can be specified multiple times)
    #[arg(long = "component", short = 'c', value_name = "NAME")]
    components: Vec<String>,

    /// Extension of the source files to scan
    #[arg(long, value_name = "EXT")]
    extension: Option<String>,

    /// Directory name never to descend into, in addition to the defaults
    /// (can be specified multiple times)
    #[arg(long = "skip-dir", value_name = "NAME")]
    skip_dirs: Vec<String>,

    /// TOML file layered over the built-in defaults
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Show what would change without backing up or writing anything
    #[arg(long, short = 'n')]
    dry_run: bool,

    /// Show every file checked and why it was skipped
    #[arg(long, short)]
    verbose: bool,
}

/// Layer command-line flags over the defaults and the optional config file
fn build_config(args: &Args) -> Result<StripConfig> {
    let mut config = match &args.config {
        Some(path) => StripConfig::load(path)?,
        None => StripConfig::defaults()?,
    };

    if let Some(root) = &args.root {
        config.root = root.clone();
    }
    if let Some(backup_dir) = &args.backup_dir {
        config.backup_dir = backup_dir.clone();
    }
    if let Some(extension) = &args.extension {
        config.extension = extension.clone();
    }
    if !args.components.is_empty() {
        config.components = args.components.clone();
    }
    config.exclude.extend(args.exclude.iter().cloned());
    config.skip_dirs.extend(args.skip_dirs.iter().cloned());

    Ok(config.normalized())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = build_config(&args).context("Failed to load configuration")?;
    let options = RunOptions {
        dry_run: args.dry_run,
        verbose: args.verbose,
    };

    let pipeline = Pipeline::new(config, options).context("Invalid configuration")?;
    let mut reporter = Reporter::new(options);
    pipeline.run(&mut reporter).context("Run aborted")?;

    Ok(())
}
