use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::info;

use crate::config::ResolvedConfig;
use crate::domain::{Genome, Organism};
use crate::error::CatalogError;
use crate::genomes::{BuildWarning, build_genomes};
use crate::organisms::build_organisms;
use crate::table::Table;
use crate::writer::CatalogWriter;

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    pub genomes: Vec<Genome>,
    pub organisms: Vec<Organism>,
    pub warnings: Vec<BuildWarning>,
    pub sequencing_runs: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildResult {
    pub genomes: usize,
    pub organisms: usize,
    pub sequencing_runs: usize,
    pub warnings: Vec<BuildWarning>,
    pub genomes_output: String,
    pub organisms_output: String,
    pub written: bool,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

#[derive(Debug, Clone)]
pub struct App {
    config: ResolvedConfig,
}

impl App {
    pub fn new(config: ResolvedConfig) -> Self {
        Self { config }
    }

    pub fn build_catalog(&self, sink: &dyn ProgressSink) -> Result<Catalog, CatalogError> {
        let start = Instant::now();

        sink.event(ProgressEvent {
            message: format!("reading {}", self.config.genomes_source),
            elapsed: None,
        });
        let genome_table = Table::read(&self.config.genomes_source, self.config.delimiter)?;

        sink.event(ProgressEvent {
            message: format!("reading {}", self.config.runs_source),
            elapsed: None,
        });
        let run_table = Table::read(&self.config.runs_source, self.config.delimiter)?;

        let build = build_genomes(&genome_table, &run_table)?;
        sink.event(ProgressEvent {
            message: format!(
                "built {} genomes ({} sequencing runs joined)",
                build.genomes.len(),
                build.sequencing_runs
            ),
            elapsed: Some(start.elapsed()),
        });

        let organisms = build_organisms(&build.genomes, self.config.organism_fields)?;
        sink.event(ProgressEvent {
            message: format!("built {} organisms", organisms.len()),
            elapsed: Some(start.elapsed()),
        });

        Ok(Catalog {
            genomes: build.genomes,
            organisms,
            warnings: build.warnings,
            sequencing_runs: build.sequencing_runs,
        })
    }

    pub fn run(
        &self,
        options: BuildOptions,
        sink: &dyn ProgressSink,
    ) -> Result<BuildResult, CatalogError> {
        let catalog = self.build_catalog(sink)?;

        info!(count = catalog.genomes.len(), "genomes");
        info!(count = catalog.organisms.len(), "organisms");

        if !options.dry_run {
            let start = Instant::now();
            CatalogWriter::write(
                &self.config.genomes_output,
                &catalog.genomes,
                &self.config.organisms_output,
                &catalog.organisms,
            )?;
            sink.event(ProgressEvent {
                message: format!(
                    "wrote {} and {}",
                    self.config.genomes_output, self.config.organisms_output
                ),
                elapsed: Some(start.elapsed()),
            });
        }

        Ok(BuildResult {
            genomes: catalog.genomes.len(),
            organisms: catalog.organisms.len(),
            sequencing_runs: catalog.sequencing_runs,
            warnings: catalog.warnings,
            genomes_output: self.config.genomes_output.to_string(),
            organisms_output: self.config.organisms_output.to_string(),
            written: !options.dry_run,
        })
    }
}
