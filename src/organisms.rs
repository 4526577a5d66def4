use std::collections::HashMap;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::collate::locale_cmp;
use crate::domain::{Genome, Number, Organism};
use crate::error::CatalogError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OrganismFieldPolicy {
    #[default]
    LastWriteWins,
    Strict,
}

impl Organism {
    fn empty(taxonomy_id: &str) -> Self {
        Self {
            assembly_count: 0,
            assembly_taxonomy_ids: Vec::new(),
            genomes: Vec::new(),
            max_scaffold_n50: None,
            ncbi_taxonomy_id: taxonomy_id.to_string(),
            species: String::new(),
            taxonomic_group: Vec::new(),
            tol_id: None,
        }
    }
}

pub fn combine(organism: Option<Organism>, genome: &Genome) -> Organism {
    let mut organism = organism.unwrap_or_else(|| Organism::empty(&genome.species_taxonomy_id));
    organism.assembly_count += 1;
    if !organism
        .assembly_taxonomy_ids
        .contains(&genome.ncbi_taxonomy_id)
    {
        organism
            .assembly_taxonomy_ids
            .push(genome.ncbi_taxonomy_id.clone());
    }
    organism.genomes.push(genome.clone());
    organism.max_scaffold_n50 = Number::max_defined(organism.max_scaffold_n50, genome.scaffold_n50);
    organism.ncbi_taxonomy_id = genome.species_taxonomy_id.clone();
    organism.species = genome.species.clone();
    organism.taxonomic_group = genome.taxonomic_group.clone();
    organism.tol_id = genome.tol_id.clone();
    organism
}

fn check_consistent(existing: &Organism, genome: &Genome) -> Result<(), CatalogError> {
    let mismatch = |field: &'static str, existing: String, incoming: String| {
        CatalogError::InconsistentOrganism {
            taxonomy_id: genome.species_taxonomy_id.clone(),
            field,
            existing,
            incoming,
            accession: genome.accession.clone(),
        }
    };
    if existing.species != genome.species {
        return Err(mismatch(
            "species",
            existing.species.clone(),
            genome.species.clone(),
        ));
    }
    if existing.taxonomic_group != genome.taxonomic_group {
        return Err(mismatch(
            "taxonomicGroup",
            existing.taxonomic_group.join(","),
            genome.taxonomic_group.join(","),
        ));
    }
    if existing.tol_id != genome.tol_id {
        return Err(mismatch(
            "tolId",
            existing.tol_id.clone().unwrap_or_default(),
            genome.tol_id.clone().unwrap_or_default(),
        ));
    }
    Ok(())
}

pub fn build_organisms(
    genomes: &[Genome],
    policy: OrganismFieldPolicy,
) -> Result<Vec<Organism>, CatalogError> {
    let by_taxonomy_id = genomes.iter().try_fold(
        HashMap::<String, Organism>::new(),
        |mut acc, genome| {
            let existing = acc.remove(&genome.species_taxonomy_id);
            if let (OrganismFieldPolicy::Strict, Some(existing)) = (policy, &existing) {
                check_consistent(existing, genome)?;
            }
            acc.insert(
                genome.species_taxonomy_id.clone(),
                combine(existing, genome),
            );
            Ok::<_, CatalogError>(acc)
        },
    )?;

    let mut organisms: Vec<Organism> = by_taxonomy_id.into_values().collect();
    organisms.sort_by(|a, b| locale_cmp(&a.ncbi_taxonomy_id, &b.ncbi_taxonomy_id));
    Ok(organisms)
}
