//! Fragment compilation via an external compiler subprocess.
//!
//! Each verification wraps one fragment in the configured translation-unit
//! shell, persists it to a scoped temporary directory, and pipes it to the
//! compiler's stdin with compile-only flags. Classification looks only at
//! the combined stdout/stderr text, never at the exit status: a compiler
//! that exits zero but prints warnings still fails the fragment.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

use anyhow::{Context, Result, anyhow};
use tempfile::TempDir;
use tracing::{debug, instrument, warn};

use crate::config::CheckConfig;

/// Classification of one verified fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Error,
}

/// Outcome of one fragment verification plus the compiler's combined output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub outcome: Outcome,
    /// Merged stdout/stderr of the compiler, surrounding whitespace trimmed,
    /// otherwise verbatim. Empty exactly when the outcome is `Success`.
    pub diagnostics: String,
}

impl Verification {
    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }
}

/// Wrap `fragment` in the configured shell and compile it.
///
/// The translation unit lives in a temporary directory that is removed on
/// every exit path, and the compiler runs inside that directory so
/// compile-only artifacts vanish with it. Exactly one subprocess is spawned
/// per call. A compiler that cannot be spawned at all is absorbed into the
/// same classification: the spawn error text becomes the diagnostics and the
/// fragment counts as a failure, so the run can continue past it.
#[instrument(skip_all, fields(compiler = %config.compiler))]
pub fn verify_fragment(fragment: &str, config: &CheckConfig) -> Result<Verification> {
    let unit = format!("{}\n{}\n{}", config.preamble, fragment, config.postamble);

    let scratch = TempDir::new().context("create scratch dir")?;
    let unit_path = scratch.path().join("fragment.unit");
    fs::write(&unit_path, &unit).with_context(|| format!("write {}", unit_path.display()))?;
    let unit_bytes = fs::read(&unit_path).with_context(|| format!("read {}", unit_path.display()))?;

    let diagnostics = match compile_unit(&unit_bytes, scratch.path(), config) {
        Ok(output) => output,
        Err(err) => {
            warn!(err = %err, "compiler invocation failed");
            format!("{err:#}")
        }
    };

    let diagnostics = diagnostics.trim().to_string();
    let outcome = if diagnostics.is_empty() {
        Outcome::Success
    } else {
        Outcome::Error
    };
    debug!(outcome = ?outcome, "fragment classified");
    Ok(Verification {
        outcome,
        diagnostics,
    })
}

/// Pipe `unit` to the compiler and return its merged stdout/stderr.
fn compile_unit(unit: &[u8], workdir: &Path, config: &CheckConfig) -> Result<String> {
    let mut cmd = Command::new(&config.compiler);
    cmd.arg("-c")
        .arg(format!("-x{}", config.source_language))
        .args(config.flags.split_whitespace())
        .arg("-")
        .current_dir(workdir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!("spawning compiler");
    let mut child = cmd.spawn().context("spawn compiler")?;

    let mut child_stdin = child
        .stdin
        .take()
        .ok_or_else(|| anyhow!("stdin was not piped"))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;

    // Drain both pipes on their own threads so a chatty compiler cannot
    // deadlock against the stdin write.
    let stdout_handle = thread::spawn(move || read_stream(stdout));
    let stderr_handle = thread::spawn(move || read_stream(stderr));

    if let Err(err) = child_stdin.write_all(unit) {
        // A compiler that rejects its arguments exits before reading stdin;
        // its diagnostics matter more than the broken pipe.
        warn!(err = %err, "short write to compiler stdin");
    }
    drop(child_stdin);

    let status = child.wait().context("wait for compiler")?;

    let stdout = join_output(stdout_handle).context("join stdout")?;
    let stderr = join_output(stderr_handle).context("join stderr")?;

    let mut combined = stdout;
    combined.extend_from_slice(&stderr);

    debug!(exit_code = ?status.code(), bytes = combined.len(), "compiler finished");
    Ok(String::from_utf8_lossy(&combined).into_owned())
}

fn read_stream<R: Read>(mut reader: R) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).context("read compiler output")?;
    Ok(buf)
}

fn join_output(handle: thread::JoinHandle<Result<Vec<u8>>>) -> Result<Vec<u8>> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(anyhow!("output reader thread panicked")),
    }
}
