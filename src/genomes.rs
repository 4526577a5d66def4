use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;

use crate::collate::locale_cmp;
use crate::domain::{Genome, Number, SequencingRun};
use crate::error::CatalogError;
use crate::normalize::{self, InvalidNumber};
use crate::table::{Row, Table};

pub const GENOME_COLUMNS: [&str; 19] = [
    "accession",
    "annotationStatus",
    "chromosomeCount",
    "coverage",
    "gcPercent",
    "geneModelUrl",
    "isRef",
    "length",
    "level",
    "scaffoldCount",
    "scaffoldL50",
    "scaffoldN50",
    "species",
    "speciesTaxonomyId",
    "strain",
    "taxonomicGroup",
    "taxonomyId",
    "tolId",
    "ucscBrowser",
];

// `sra_ids` is present in the source but not carried into the catalog.
pub const SEQUENCING_RUN_COLUMNS: [&str; 12] = [
    "accession",
    "biosample",
    "instrument",
    "library_layout",
    "library_source",
    "library_strategy",
    "platform",
    "run_total_bases",
    "sra_run_acc",
    "sra_sample_acc",
    "sra_study_acc",
    "total_bases",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildWarning {
    pub accession: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct GenomeBuild {
    pub genomes: Vec<Genome>,
    pub warnings: Vec<BuildWarning>,
    pub sequencing_runs: usize,
}

struct Cells<'a> {
    row: Row<'a>,
}

impl<'a> Cells<'a> {
    fn text(&self, column: &str) -> Result<&'a str, CatalogError> {
        self.row.get(column)
    }

    fn owned(&self, column: &str) -> Result<String, CatalogError> {
        self.text(column).map(str::to_string)
    }

    fn string_or_null(&self, column: &str) -> Result<Option<String>, CatalogError> {
        Ok(normalize::string_or_null(self.text(column)?))
    }

    fn number(&self, column: &str) -> Result<Number, CatalogError> {
        normalize::number(self.text(column)?).map_err(|err| self.invalid(column, err))
    }

    fn number_or_null(&self, column: &str) -> Result<Option<Number>, CatalogError> {
        normalize::number_or_null(self.text(column)?).map_err(|err| self.invalid(column, err))
    }

    fn list(&self, column: &str) -> Result<Vec<String>, CatalogError> {
        Ok(normalize::list(self.text(column)?))
    }

    fn invalid(&self, column: &str, err: InvalidNumber) -> CatalogError {
        CatalogError::InvalidNumber {
            path: self.row.path().to_path_buf(),
            line: self.row.line(),
            field: column.to_string(),
            value: err.0,
        }
    }

    fn missing(&self, column: &str) -> CatalogError {
        CatalogError::MissingRequiredField {
            path: self.row.path().to_path_buf(),
            line: self.row.line(),
            field: column.to_string(),
        }
    }
}

pub fn parse_sequencing_run(row: Row<'_>) -> Result<SequencingRun, CatalogError> {
    let cells = Cells { row };
    Ok(SequencingRun {
        accession: cells.owned("accession")?,
        biosample: cells.owned("biosample")?,
        instrument: cells.owned("instrument")?,
        library_layout: cells.owned("library_layout")?,
        library_source: cells.owned("library_source")?,
        library_strategy: cells.owned("library_strategy")?,
        platform: cells.owned("platform")?,
        run_total_bases: cells.number("run_total_bases")?,
        sra_run_acc: cells.owned("sra_run_acc")?,
        sra_sample_acc: cells.owned("sra_sample_acc")?,
        sra_study_acc: cells.owned("sra_study_acc")?,
        total_bases: cells.number("total_bases")?,
    })
}

pub fn parse_genome(row: Row<'_>) -> Result<(Genome, Option<BuildWarning>), CatalogError> {
    let cells = Cells { row };
    let accession = cells.owned("accession")?;

    let tol_ids = cells.list("tolId")?;
    let warning = (tol_ids.len() > 1).then(|| {
        let message = format!("Multiple ToLIDs found ({})", tol_ids.join(", "));
        warn!(accession = %accession, "{message}");
        BuildWarning {
            accession: accession.clone(),
            message,
        }
    });

    let is_ref =
        normalize::boolean_label(cells.text("isRef")?).ok_or_else(|| cells.missing("isRef"))?;

    let genome = Genome {
        annotation_status: cells.string_or_null("annotationStatus")?,
        chromosomes: cells.number_or_null("chromosomeCount")?,
        coverage: cells.string_or_null("coverage")?,
        gc_percent: cells.number("gcPercent")?,
        gene_model_url: cells.string_or_null("geneModelUrl")?,
        is_ref,
        length: cells.number("length")?,
        level: cells.owned("level")?,
        ncbi_taxonomy_id: cells.owned("taxonomyId")?,
        scaffold_count: cells.number_or_null("scaffoldCount")?,
        scaffold_l50: cells.number_or_null("scaffoldL50")?,
        scaffold_n50: cells.number_or_null("scaffoldN50")?,
        species: cells.owned("species")?,
        species_taxonomy_id: cells.owned("speciesTaxonomyId")?,
        sra_data: Vec::new(),
        strain: cells.string_or_null("strain")?,
        taxonomic_group: cells.list("taxonomicGroup")?,
        tol_id: tol_ids.into_iter().next(),
        ucsc_browser_url: cells.string_or_null("ucscBrowser")?,
        accession,
    };
    Ok((genome, warning))
}

pub fn build_genomes(genome_table: &Table, run_table: &Table) -> Result<GenomeBuild, CatalogError> {
    genome_table.require_columns(&GENOME_COLUMNS)?;
    run_table.require_columns(&SEQUENCING_RUN_COLUMNS)?;

    // Runs are parsed only once they join a genome; orphan rows never fail the build.
    let mut runs_by_accession: HashMap<&str, Vec<Row<'_>>> = HashMap::new();
    for row in run_table.rows() {
        runs_by_accession
            .entry(row.get("accession")?)
            .or_default()
            .push(row);
    }

    let mut genomes = Vec::with_capacity(genome_table.len());
    let mut warnings = Vec::new();
    let mut sequencing_runs = 0;
    for row in genome_table.rows() {
        let (mut genome, warning) = parse_genome(row)?;
        if let Some(rows) = runs_by_accession.get(genome.accession.as_str()) {
            genome.sra_data = rows
                .iter()
                .map(|row| parse_sequencing_run(*row))
                .collect::<Result<_, _>>()?;
            sequencing_runs += genome.sra_data.len();
        }
        warnings.extend(warning);
        genomes.push(genome);
    }

    genomes.sort_by(|a, b| locale_cmp(&a.accession, &b.accession));
    Ok(GenomeBuild {
        genomes,
        warnings,
        sequencing_runs,
    })
}
