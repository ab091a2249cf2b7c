//! Verification run orchestration.
//!
//! Coordinates document loading, fragment extraction, per-fragment
//! compilation, and the final tally. Three sequential phases, no retries:
//! load, scan/extract, verify each fragment in document order.

use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};
use tracing::{debug, info, instrument, warn};

use crate::compile::verify_fragment;
use crate::config::CheckConfig;
use crate::report::{Tally, fragment_report, summary};
use crate::scan::FencePatterns;

/// Run a full verification pass over the document at `document_path`.
///
/// The missing-document precondition is the only fatal error: compiler
/// problems surface as per-fragment failures and the run visits every
/// extracted fragment even when earlier ones failed. The returned tally is
/// not reflected in the process exit code.
#[instrument(skip_all, fields(document = %document_path.display()))]
pub fn run(document_path: &Path, config: &CheckConfig) -> Result<Tally> {
    if !document_path.is_file() {
        bail!("expected slides at {}", document_path.display());
    }

    print_compiler_version(config);
    println!("Found slides at {}", document_path.display());

    let document = fs::read_to_string(document_path)
        .with_context(|| format!("read {}", document_path.display()))?;
    info!(bytes = document.len(), "slides loaded");

    let patterns = FencePatterns::for_tag(&config.tag)?;
    let fragments = patterns.extract_checked_fragments(&document);
    info!(fragments = fragments.len(), "checked fragments extracted");

    let mut tally = Tally::default();
    for fragment in &fragments {
        debug!(index = fragment.index, "verifying fragment");
        let verification = verify_fragment(&fragment.text, config)?;
        print!("{}", fragment_report(fragment, &verification));
        tally.record(&verification);
    }

    tally.unchecked = patterns.count_unchecked_markers(&document);
    print!("{}", summary(&tally));

    info!(
        success = tally.success,
        error = tally.error,
        unchecked = tally.unchecked,
        "run complete"
    );
    Ok(tally)
}

/// Best-effort `--version` banner for the configured compiler.
///
/// A compiler that cannot be run here is not fatal; the same problem will
/// show up as a failure on every checked fragment downstream.
fn print_compiler_version(config: &CheckConfig) {
    println!(
        "Using {} as {} compiler, with version:",
        config.compiler, config.source_language
    );
    match Command::new(&config.compiler)
        .arg("--version")
        .stdin(Stdio::null())
        .status()
    {
        Ok(status) => debug!(exit_code = ?status.code(), "compiler version printed"),
        Err(err) => warn!(err = %err, "could not run compiler --version"),
    }
}
