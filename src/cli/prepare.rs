use std::fs;
use std::path::Path;
use std::process;

use crate::cli::args::PrepareArgs;
use crate::format::SourceFormat;
use crate::pipeline::{self, PipelineConfig};
use crate::source::{self, SequenceSource};
use crate::{error, info, success, verbose, warn};

/// Output file name for the assembled dataset.
pub const DATASET_FILE: &str = "dataset.json";

/// Output file name for the frozen label encoding, list form, ordered to
/// match classifier output indices.
pub const LABELS_FILE: &str = "exercise_labels.json";

/// Run the prepare command.
#[allow(clippy::missing_panics_doc)]
pub fn run_prepare(args: &PrepareArgs) {
    let format: SourceFormat = match args.format.parse() {
        Ok(f) => f,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    let config = PipelineConfig::new()
        .with_seed(args.seed)
        .with_window(args.window)
        .with_smoothing(!args.no_smooth)
        .with_augmentation(!args.no_augment);

    // Discover sources, then load each one; a source that fails to load is
    // skipped with a warning rather than aborting the run.
    let locations = match source::discover(Path::new(&args.source)) {
        Ok(locations) => locations,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };
    verbose!("Found {} source(s) under {} ({format})", locations.len(), args.source);

    let mut sources: Vec<SequenceSource> = Vec::with_capacity(locations.len());
    let mut load_failures = 0usize;
    for location in &locations {
        match location.load(format) {
            Ok(s) => {
                verbose!("  {} - {} frames", s.id, s.frames.len());
                sources.push(s);
            }
            Err(e) => {
                warn!("skipping {}: {e}", location.id());
                load_failures += 1;
            }
        }
    }

    let output = match pipeline::run(&config, &sources) {
        Ok(output) => output,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    for (id, reason) in &output.report.failures {
        warn!("skipped source {id}: {reason}");
    }

    if let Err(e) = write_artifacts(&output, &args.output) {
        error!("{e}");
        process::exit(1);
    }

    let report = &output.report;
    info!(
        "Sources: {} processed, {} skipped",
        report.sources_total - report.sources_failed,
        report.sources_failed + load_failures
    );
    info!(
        "Frames: {} seen, {} unlabeled, {} degenerate",
        report.frames_total, report.frames_unlabeled, report.degenerate_dropped
    );
    info!(
        "Samples: {} raw, {} after augmentation, {} labels",
        report.samples_raw, report.samples_final, report.num_labels
    );
    success!(
        "Wrote {DATASET_FILE} and {LABELS_FILE} to {}",
        args.output
    );
}

fn write_artifacts(
    output: &crate::pipeline::PipelineOutput,
    out_dir: &str,
) -> crate::error::Result<()> {
    let dir = Path::new(out_dir);
    fs::create_dir_all(dir)?;
    output.dataset.save(dir.join(DATASET_FILE))?;
    output.encoding.save(dir.join(LABELS_FILE))?;
    Ok(())
}
