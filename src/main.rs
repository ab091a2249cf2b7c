//! Compile-checks code blocks embedded in markdown slides.
//!
//! Scans one slide deck for `~~~cpp` fences, compiles each checked block
//! through an external compiler, and prints a per-fragment report plus a
//! final tally. The exit code reflects only precondition failures (missing
//! slides, unusable configuration), never the tally itself.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use slidecheck::config::{CheckConfig, ConfigOverrides};
use slidecheck::{logging, report, run};

#[derive(Parser)]
#[command(
    name = "slidecheck",
    version,
    about = "Compile-check code blocks embedded in markdown slides"
)]
struct Cli {
    /// Markdown slide deck to scan.
    slides: PathBuf,

    /// Compiler executable used to verify each checked block.
    compiler: String,

    /// TOML file overriding wrapper text, flags, or the fence tag.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    logging::init();
    if let Err(err) = try_main() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = CheckConfig::default();
    if let Some(path) = &cli.config {
        config = config.apply(ConfigOverrides::load(path)?);
    }
    // The positional compiler argument wins over any config-file value.
    config.compiler = cli.compiler;
    config.validate()?;

    print!("{}", report::banner());
    run::run(&cli.slides, &config)?;
    Ok(())
}
