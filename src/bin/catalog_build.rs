use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use brc_catalog_build::app::{App, BuildOptions, BuildResult};
use brc_catalog_build::config::{BuildOverrides, ConfigLoader};
use brc_catalog_build::error::CatalogError;
use brc_catalog_build::organisms::OrganismFieldPolicy;
use brc_catalog_build::output::{JsonOutput, LogOutput, OutputMode};

#[derive(Parser)]
#[command(name = "catalog-build")]
#[command(about = "Build the genome and organism JSON catalogs from NCBI-derived TSV tables")]
#[command(version, args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    args: BuildArgs,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Build and write both catalog files (default)")]
    Build(BuildArgs),
    #[command(about = "Build both catalogs without writing anything")]
    Check(BuildArgs),
}

#[derive(Args, Clone)]
struct BuildArgs {
    #[arg(long)]
    config: Option<String>,

    #[arg(long)]
    genomes_source: Option<Utf8PathBuf>,

    #[arg(long)]
    runs_source: Option<Utf8PathBuf>,

    #[arg(long)]
    genomes_output: Option<Utf8PathBuf>,

    #[arg(long)]
    organisms_output: Option<Utf8PathBuf>,

    #[arg(long)]
    delimiter: Option<String>,

    #[arg(long, value_enum)]
    organism_fields: Option<OrganismFieldPolicy>,

    #[arg(long)]
    json: bool,
}

impl BuildArgs {
    fn overrides(&self) -> BuildOverrides {
        BuildOverrides {
            genomes_source: self.genomes_source.clone(),
            runs_source: self.runs_source.clone(),
            genomes_output: self.genomes_output.clone(),
            organisms_output: self.organisms_output.clone(),
            delimiter: self.delimiter.clone(),
            organism_fields: self.organism_fields,
        }
    }
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<CatalogError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &CatalogError) -> u8 {
    match error {
        CatalogError::OutputWrite { .. } => 3,
        err if err.is_input_error() => 2,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let (args, options) = match cli.command {
        Some(Commands::Build(args)) => (args, BuildOptions { dry_run: false }),
        Some(Commands::Check(args)) => (args, BuildOptions { dry_run: true }),
        None => (cli.args, BuildOptions { dry_run: false }),
    };
    let output_mode = if args.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let config = ConfigLoader::resolve(args.config.as_deref())?.apply(args.overrides())?;
    let app = App::new(config);

    let result = match output_mode {
        OutputMode::Json => app.run(options, &JsonOutput)?,
        OutputMode::Human => app.run(options, &LogOutput)?,
    };

    match output_mode {
        OutputMode::Json => JsonOutput::print_build(&result).into_diagnostic()?,
        OutputMode::Human => print_build_summary(&result),
    }
    Ok(())
}

fn print_build_summary(result: &BuildResult) {
    let green = "\x1b[32m";
    let yellow = "\x1b[33m";
    let cyan = "\x1b[36m";
    let reset = "\x1b[0m";

    println!("{cyan}Catalog build summary{reset}");
    println!("{green}Genomes: {}{reset}", result.genomes);
    println!("{green}Organisms: {}{reset}", result.organisms);
    println!("{green}Sequencing runs: {}{reset}", result.sequencing_runs);
    println!("{yellow}Warnings: {}{reset}", result.warnings.len());
    for warning in &result.warnings {
        println!("{yellow}  {}: {}{reset}", warning.accession, warning.message);
    }
    if result.written {
        println!("{cyan}  wrote {}{reset}", result.genomes_output);
        println!("{cyan}  wrote {}{reset}", result.organisms_output);
    } else {
        println!("{cyan}  check only, nothing written{reset}");
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn write_failures_exit_with_3() {
        let err = CatalogError::OutputWrite {
            path: Utf8PathBuf::from("catalog/genomes.json"),
            message: "read-only file system".to_string(),
        };
        assert_eq!(map_exit_code(&err), 3);
    }

    #[test]
    fn input_failures_exit_with_2() {
        let invalid = CatalogError::InvalidNumber {
            path: Utf8PathBuf::from("genomes.tsv"),
            line: 2,
            field: "gcPercent".to_string(),
            value: "n/a".to_string(),
        };
        let unreadable = CatalogError::SourceRead {
            path: Utf8PathBuf::from("genomes.tsv"),
            message: "not found".to_string(),
        };
        assert_eq!(map_exit_code(&invalid), 2);
        assert_eq!(map_exit_code(&unreadable), 2);
    }

    #[test]
    fn config_failures_exit_with_1() {
        assert_eq!(map_exit_code(&CatalogError::ConfigRead(PathBuf::from("x.json"))), 1);
        assert_eq!(map_exit_code(&CatalogError::ConfigParse("eof".to_string())), 1);
        assert_eq!(map_exit_code(&CatalogError::InvalidDelimiter("||".to_string())), 1);
    }
}
