//! Solving many share files at once.
//!
//! Cases share nothing, so they are solved in parallel on the rayon pool.
//! A failure is recorded in that case's report and never stops the others.

use crate::collect::load_share_set;
use crate::{Recovery, Shortfall, SssError};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A named share file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Case {
    pub label: String,
    pub source: PathBuf,
}

impl Case {
    pub fn new(label: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Case {
            label: label.into(),
            source: source.into(),
        }
    }

    /// Uses the file stem as the label, falling back to the full path.
    pub fn from_path(source: impl Into<PathBuf>) -> Self {
        let source = source.into();
        let label = label_for(&source);
        Case { label, source }
    }
}

#[derive(Debug)]
pub struct CaseReport {
    pub label: String,
    pub outcome: Result<Recovery, SssError>,
}

impl CaseReport {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

pub fn solve_case(case: &Case, shortfall: Shortfall) -> CaseReport {
    let outcome =
        load_share_set(&case.source).and_then(|set| set.reconstruct(shortfall));

    match &outcome {
        Ok(recovery) => info!(
            case = %case.label,
            used = recovery.used,
            authoritative = recovery.authoritative,
            "secret recovered"
        ),
        Err(e) => warn!(case = %case.label, error = %e, "case failed"),
    }

    CaseReport {
        label: case.label.clone(),
        outcome,
    }
}

/// Solves every case and returns the reports in the order the cases were given.
pub fn solve_batch(cases: &[Case], shortfall: Shortfall) -> Vec<CaseReport> {
    cases
        .par_iter()
        .map(|case| solve_case(case, shortfall))
        .collect()
}

fn label_for(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
