use std::path::PathBuf;

use publiciser::PubliciseOutcome;
use serde::Serialize;

/// Serializable form of a [`PubliciseOutcome`] for `--json`.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Report {
    Skipped {
        fingerprint: String,
    },
    Rewritten {
        output: PathBuf,
        fingerprint: String,
        cache_updated: bool,
        types: usize,
        types_changed: usize,
        methods_changed: usize,
        fields_changed: usize,
    },
    TargetMissing {
        path: PathBuf,
    },
}

impl From<&PubliciseOutcome> for Report {
    fn from(outcome: &PubliciseOutcome) -> Self {
        match outcome {
            PubliciseOutcome::Skipped { fingerprint } => Report::Skipped {
                fingerprint: fingerprint.to_string(),
            },
            PubliciseOutcome::Rewritten {
                summary,
                fingerprint,
                cache_updated,
            } => Report::Rewritten {
                output: summary.output.clone(),
                fingerprint: fingerprint.to_string(),
                cache_updated: *cache_updated,
                types: summary.types,
                types_changed: summary.types_changed,
                methods_changed: summary.methods_changed,
                fields_changed: summary.fields_changed,
            },
            PubliciseOutcome::TargetMissing { path } => {
                Report::TargetMissing { path: path.clone() }
            }
        }
    }
}

/// Print the outcome as JSON (if `json`) or as a single human-readable line.
pub fn print_outcome(outcome: &PubliciseOutcome, json: bool) -> anyhow::Result<()> {
    if json {
        let json = serde_json::to_string_pretty(&Report::from(outcome))?;
        println!("{json}");
    } else {
        match outcome {
            PubliciseOutcome::TargetMissing { .. } => eprintln!("{outcome}"),
            _ => println!("{outcome}"),
        }
    }
    Ok(())
}
