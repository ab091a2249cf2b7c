//! Compile-checking for code fragments embedded in markdown slides.
//!
//! A slide deck marks code blocks with two fence shapes: `~~~cpp` (tag glued
//! to the fence) means the block must compile, `~~~ cpp` (whitespace before
//! the tag) means the block is intentionally left unverified. This crate
//! scans a deck, wraps each checked fragment in a fixed translation-unit
//! shell, and feeds it to an external compiler. A fragment passes only when
//! the compiler stays completely silent; warnings count as failures even
//! when the compiler exits zero.
//!
//! The pipeline is strictly sequential: load → scan/extract → verify each
//! fragment → tally. [`run`] orchestrates, [`scan`] finds fragments,
//! [`compile`] shells out, [`report`] renders the human-readable output.

pub mod compile;
pub mod config;
pub mod logging;
pub mod report;
pub mod run;
pub mod scan;
