use std::fs;

use assert_matches::assert_matches;
use camino::Utf8PathBuf;

use brc_catalog_build::config::{BuildOverrides, Config, ConfigLoader, DEFAULT_RUNS_SOURCE};
use brc_catalog_build::error::CatalogError;
use brc_catalog_build::organisms::OrganismFieldPolicy;

#[test]
fn parse_config_file() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("catalog-build.json");
    fs::write(
        &path,
        r#"{
  "schema_version": 1,
  "genomes_source": "data/genomes.csv",
  "genomes_output": "public/genomes.json",
  "delimiter": ",",
  "organism_fields": "strict"
}"#,
    )
    .unwrap();

    let resolved = ConfigLoader::resolve(path.to_str()).unwrap();
    assert_eq!(resolved.genomes_source.as_str(), "data/genomes.csv");
    assert_eq!(resolved.runs_source.as_str(), DEFAULT_RUNS_SOURCE);
    assert_eq!(resolved.genomes_output.as_str(), "public/genomes.json");
    assert_eq!(resolved.delimiter, b',');
    assert_eq!(resolved.organism_fields, OrganismFieldPolicy::Strict);
}

#[test]
fn explicit_missing_config_is_an_error() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("nope.json");
    let err = ConfigLoader::resolve(path.to_str()).unwrap_err();
    assert_matches!(err, CatalogError::ConfigRead(_));
}

#[test]
fn malformed_config_is_a_parse_error() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("catalog-build.json");
    fs::write(&path, r#"{"organism_fields": "first-wins"}"#).unwrap();
    let err = ConfigLoader::resolve(path.to_str()).unwrap_err();
    assert_matches!(err, CatalogError::ConfigParse(_));
}

#[test]
fn overrides_take_precedence() {
    let config = Config {
        genomes_source: Some(Utf8PathBuf::from("a.tsv")),
        runs_source: None,
        genomes_output: None,
        organisms_output: None,
        delimiter: Some("tab".to_string()),
        organism_fields: Some(OrganismFieldPolicy::Strict),
    };
    let resolved = ConfigLoader::resolve_config(config)
        .unwrap()
        .apply(BuildOverrides {
            genomes_source: Some(Utf8PathBuf::from("b.tsv")),
            delimiter: Some(";".to_string()),
            organism_fields: Some(OrganismFieldPolicy::LastWriteWins),
            ..BuildOverrides::default()
        })
        .unwrap();
    assert_eq!(resolved.genomes_source.as_str(), "b.tsv");
    assert_eq!(resolved.delimiter, b';');
    assert_eq!(resolved.organism_fields, OrganismFieldPolicy::LastWriteWins);
}

#[test]
fn bad_override_delimiter_is_rejected() {
    let resolved = ConfigLoader::resolve_config(Config::default()).unwrap();
    let err = resolved
        .apply(BuildOverrides {
            delimiter: Some("||".to_string()),
            ..BuildOverrides::default()
        })
        .unwrap_err();
    assert_matches!(err, CatalogError::InvalidDelimiter(_));
}
