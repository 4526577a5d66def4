use std::fs;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::organisms::OrganismFieldPolicy;
use crate::table::TAB;

pub const DEFAULT_CONFIG_FILE: &str = "catalog-build.json";
pub const DEFAULT_GENOMES_SOURCE: &str = "catalog-build/source/genomes-from-ncbi.tsv";
pub const DEFAULT_RUNS_SOURCE: &str = "catalog-build/source/primary-data-ncbi.tsv";
pub const DEFAULT_GENOMES_OUTPUT: &str = "catalog/genomes.json";
pub const DEFAULT_ORGANISMS_OUTPUT: &str = "catalog/organisms.json";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub genomes_source: Option<Utf8PathBuf>,
    #[serde(default)]
    pub runs_source: Option<Utf8PathBuf>,
    #[serde(default)]
    pub genomes_output: Option<Utf8PathBuf>,
    #[serde(default)]
    pub organisms_output: Option<Utf8PathBuf>,
    #[serde(default)]
    pub delimiter: Option<String>,
    #[serde(default)]
    pub organism_fields: Option<OrganismFieldPolicy>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub genomes_source: Utf8PathBuf,
    pub runs_source: Utf8PathBuf,
    pub genomes_output: Utf8PathBuf,
    pub organisms_output: Utf8PathBuf,
    pub delimiter: u8,
    pub organism_fields: OrganismFieldPolicy,
}

#[derive(Debug, Clone, Default)]
pub struct BuildOverrides {
    pub genomes_source: Option<Utf8PathBuf>,
    pub runs_source: Option<Utf8PathBuf>,
    pub genomes_output: Option<Utf8PathBuf>,
    pub organisms_output: Option<Utf8PathBuf>,
    pub delimiter: Option<String>,
    pub organism_fields: Option<OrganismFieldPolicy>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, CatalogError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            return Self::resolve_config(Config::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| CatalogError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| CatalogError::ConfigParse(err.to_string()))?;

        Self::resolve_config(config)
    }

    pub fn resolve_config(config: Config) -> Result<ResolvedConfig, CatalogError> {
        let delimiter = match config.delimiter.as_deref() {
            Some(value) => parse_delimiter(value)?,
            None => TAB,
        };

        Ok(ResolvedConfig {
            genomes_source: config
                .genomes_source
                .unwrap_or_else(|| DEFAULT_GENOMES_SOURCE.into()),
            runs_source: config
                .runs_source
                .unwrap_or_else(|| DEFAULT_RUNS_SOURCE.into()),
            genomes_output: config
                .genomes_output
                .unwrap_or_else(|| DEFAULT_GENOMES_OUTPUT.into()),
            organisms_output: config
                .organisms_output
                .unwrap_or_else(|| DEFAULT_ORGANISMS_OUTPUT.into()),
            delimiter,
            organism_fields: config.organism_fields.unwrap_or_default(),
        })
    }
}

impl ResolvedConfig {
    pub fn apply(mut self, overrides: BuildOverrides) -> Result<Self, CatalogError> {
        if let Some(path) = overrides.genomes_source {
            self.genomes_source = path;
        }
        if let Some(path) = overrides.runs_source {
            self.runs_source = path;
        }
        if let Some(path) = overrides.genomes_output {
            self.genomes_output = path;
        }
        if let Some(path) = overrides.organisms_output {
            self.organisms_output = path;
        }
        if let Some(value) = overrides.delimiter {
            self.delimiter = parse_delimiter(&value)?;
        }
        if let Some(policy) = overrides.organism_fields {
            self.organism_fields = policy;
        }
        Ok(self)
    }
}

pub fn parse_delimiter(value: &str) -> Result<u8, CatalogError> {
    match value {
        "tab" | "\\t" | "\t" => Ok(TAB),
        _ => match value.as_bytes() {
            [byte] if byte.is_ascii() && *byte != b'\n' && *byte != b'\r' => Ok(*byte),
            _ => Err(CatalogError::InvalidDelimiter(value.to_string())),
        },
    }
}
