//! Batch driver: walks an input directory and writes one report per record.
//!
//! Record files are named `q<NNN>.txt`; each contributes its first line as
//! one record. Reports land in the output directory (created if absent) as
//! `a<NNN>.txt`. A failed record is logged and skipped; it never aborts the
//! batch.

use crate::config;
use crate::error::PipelineError;
use crate::pipeline::Pipeline;
use crate::report::Report;
use regex::Regex;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

static INPUT_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(config::INPUT_FILE_PATTERN).expect("valid input file pattern"));

/// Per-batch outcome counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Records processed and reported (including degenerate empty records).
    pub processed: usize,
    /// Records that failed a pipeline stage.
    pub failed: usize,
    /// Directory entries not matching the record naming pattern.
    pub skipped: usize,
}

/// Runs the pipeline over every record file in `input_dir`, writing one
/// report per record into `output_dir`.
pub fn run_batch(
    pipeline: &Pipeline,
    input_dir: &Path,
    output_dir: &Path,
) -> Result<BatchSummary, PipelineError> {
    fs::create_dir_all(output_dir)?;

    let mut entries: Vec<_> = fs::read_dir(input_dir)?.collect::<Result<_, _>>()?;
    // Deterministic processing order regardless of directory iteration order.
    entries.sort_by_key(|e| e.file_name());

    let mut summary = BatchSummary::default();
    for entry in entries {
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();
        let Some(captures) = INPUT_FILE.captures(&name) else {
            summary.skipped += 1;
            continue;
        };
        let record_no = &captures[1];
        let out_path = output_dir.join(format!(
            "{}{}.txt",
            config::OUTPUT_FILE_PREFIX,
            record_no
        ));

        match process_record_file(pipeline, &entry.path()) {
            Ok(report) => {
                fs::write(&out_path, report.to_string())?;
                summary.processed += 1;
                tracing::info!(file = %name, "record processed");
            }
            Err(PipelineError::EmptyInput) => {
                // Empty input is a valid degenerate record: report it empty.
                fs::write(&out_path, Report::default().to_string())?;
                summary.processed += 1;
                tracing::info!(file = %name, "empty record");
            }
            Err(error) => {
                summary.failed += 1;
                tracing::warn!(file = %name, %error, "record failed");
            }
        }
    }

    tracing::info!(
        processed = summary.processed,
        failed = summary.failed,
        skipped = summary.skipped,
        "batch complete"
    );
    Ok(summary)
}

/// Reads the first line of a record file and runs the pipeline over it.
fn process_record_file(pipeline: &Pipeline, path: &Path) -> Result<Report, PipelineError> {
    let file = fs::File::open(path)?;
    let mut line = String::new();
    let read = BufReader::new(file).read_line(&mut line)?;
    if read == 0 {
        return Err(PipelineError::EmptyInput);
    }
    pipeline.run_record(line.trim_end_matches(['\r', '\n']))
}
