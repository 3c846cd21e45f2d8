mod loader;
mod report;

use anyhow::Result;
use clap::Parser;
use gem_rechit_matcher::{
    GemRecHitMatcher, InMemoryEventSetup, ParameterSet, SimHitTable,
    parameters::{REC_HIT_INPUT_KEY, VERBOSE_KEY},
};
use gem_validation_common::tracer::{TracerEngine, TracerOptions};
use loader::{load_event_file, load_geometry, load_parameters};
use report::MatchReport;
use std::{fs::File, io::BufWriter, path::PathBuf};
use tracing::{debug, info, info_span};

#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Cli {
    /// JSON file holding the rec hit collections and simulated tracks of one event
    #[clap(long)]
    event: PathBuf,

    /// JSON file describing the GEM eta partitions
    #[clap(long)]
    geometry: PathBuf,

    /// JSON parameter set; absent keys take the matcher defaults
    #[clap(long)]
    parameters: Option<PathBuf>,

    /// Overrides the rec hit input tag. An empty string disables matching
    #[clap(long)]
    rechit_input: Option<String>,

    /// Overrides the matcher's verbosity
    #[clap(long, env = "GEM_RECHIT_VERBOSE")]
    verbose: Option<i32>,

    /// Write the report here instead of stdout
    #[clap(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let _tracer = TracerEngine::new(TracerOptions::default());

    let args = Cli::parse();
    debug!("{args:?}");

    let mut parameters = match &args.parameters {
        Some(path) => load_parameters(path)?,
        None => ParameterSet::new(),
    };
    if let Some(input) = &args.rechit_input {
        parameters.insert(REC_HIT_INPUT_KEY, input.as_str());
    }
    if let Some(verbose) = args.verbose {
        parameters.insert(VERBOSE_KEY, verbose);
    }

    let event_setup = InMemoryEventSetup::new(load_geometry(&args.geometry)?);
    let (event, tracks) = load_event_file(&args.event)?.into_parts();
    info!(num_tracks = tracks.len(), "Loaded event");

    let mut reports = Vec::with_capacity(tracks.len());
    for record in tracks {
        let span = info_span!("track", track_id = record.track.track_id);
        let _guard = span.enter();

        let mut sim_hits = SimHitTable::new(
            record.track,
            record.vertex,
            parameters.clone(),
            &event,
            &event_setup,
        )?;
        for sim_hit in record.sim_hits {
            sim_hits.add_sim_hit(sim_hit.det_id, sim_hit.entry_point);
        }

        let matcher = GemRecHitMatcher::new(&sim_hits)?;
        let report = MatchReport::new(&matcher);
        info!(
            num_rechits = report.num_rechits(),
            num_super_chambers = report.super_chambers.len(),
            "Matched"
        );
        reports.push(report);
    }

    match &args.output {
        Some(path) => {
            serde_json::to_writer_pretty(BufWriter::new(File::create(path)?), &reports)?;
            info!("Report written to {}", path.display());
        }
        None => {
            serde_json::to_writer_pretty(std::io::stdout().lock(), &reports)?;
            println!();
        }
    }
    Ok(())
}
