//! Per-fragment report rendering and the run tally.
//!
//! Rendering is separated from printing so the output can be asserted on in
//! tests; the orchestration layer writes the rendered text to stdout.

use crate::compile::Verification;
use crate::scan::Fragment;

/// Counter summary of one verification run.
///
/// Counters are mutated once per fragment during the scan and read once at
/// the end; their sum equals the total matched regions across both marker
/// classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Fragments that compiled without any diagnostic output.
    pub success: usize,
    /// Fragments with diagnostics, spawn failures included.
    pub error: usize,
    /// Blocks marked with the fence-whitespace-tag convention, never compiled.
    pub unchecked: usize,
}

impl Tally {
    /// Record one verified fragment.
    pub fn record(&mut self, verification: &Verification) {
        if verification.is_success() {
            self.success += 1;
        } else {
            self.error += 1;
        }
    }

    /// Total matched regions across both marker classes.
    pub fn total(&self) -> usize {
        self.success + self.error + self.unchecked
    }
}

/// Opening banner printed before any fragment is processed.
pub fn banner() -> String {
    "\n##############################################\n\
     ## Checking code in the slides will compile ##\n\
     ##############################################\n\n"
        .to_string()
}

/// Render the report for one verified fragment: the fragment text followed
/// by its verdict and, on failure, the verbatim compiler diagnostics.
pub fn fragment_report(fragment: &Fragment, verification: &Verification) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n##### Compiling {}\n", "#".repeat(40)));
    out.push_str(&format!("~~~\n{}\n~~~\n", fragment.text));
    if verification.is_success() {
        out.push_str(&format!("##### Fine! {}\n\n", "#".repeat(44)));
    } else {
        out.push_str(&format!("##### Errors! {}\n", "#".repeat(72)));
        out.push_str(&format!("{}\n", verification.diagnostics));
        out.push_str(&format!("{}\n\n", "#".repeat(56)));
    }
    out
}

/// Render the final three-line summary.
pub fn summary(tally: &Tally) -> String {
    format!(
        "\nThere were {} bad code blocks.\nThere were {} good code blocks.\nThere were {} unchecked code blocks.\n\n",
        tally.error, tally.success, tally.unchecked
    )
}
