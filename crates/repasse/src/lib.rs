//! Repasse CLI tools.
//!
//! This crate provides command-line tools for revenue-sharing reports:
//!
//! - `repasse-extract`: Import a report and print its financial records
//! - `repasse-reconcile`: Cross-check a report against its own summaries
//!
//! # Example Usage
//!
//! ```bash
//! repasse-extract repasse_fevereiro.html --format summary
//! repasse-extract repasse_fevereiro.html --output batch.json
//! repasse-reconcile repasse_fevereiro.html --tolerance 0.05
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
pub mod report;
