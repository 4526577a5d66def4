use std::fs;
use std::io::Write;

use camino::Utf8Path;
use serde::Serialize;
use tempfile::{Builder, NamedTempFile};

use crate::domain::{Genome, Organism};
use crate::error::CatalogError;

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut content = serde_json::to_vec_pretty(value)?;
    content.push(b'\n');
    Ok(content)
}

pub struct CatalogWriter;

impl CatalogWriter {
    /// Writes both catalog files, or neither if anything fails before the
    /// final renames.
    pub fn write(
        genomes_path: &Utf8Path,
        genomes: &[Genome],
        organisms_path: &Utf8Path,
        organisms: &[Organism],
    ) -> Result<(), CatalogError> {
        let genomes_json = render_json(genomes).map_err(|err| write_error(genomes_path, err))?;
        let organisms_json =
            render_json(organisms).map_err(|err| write_error(organisms_path, err))?;

        let staged_genomes = stage(genomes_path, &genomes_json)?;
        let staged_organisms = stage(organisms_path, &organisms_json)?;

        commit(staged_genomes, genomes_path)?;
        commit(staged_organisms, organisms_path)?;
        Ok(())
    }
}

fn stage(path: &Utf8Path, content: &[u8]) -> Result<NamedTempFile, CatalogError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    fs::create_dir_all(parent.as_std_path()).map_err(|err| write_error(path, err))?;
    let mut temp = Builder::new()
        .prefix(".catalog-build")
        .suffix(".tmp")
        .tempfile_in(parent.as_std_path())
        .map_err(|err| write_error(path, err))?;
    temp.write_all(content)
        .map_err(|err| write_error(path, err))?;
    temp.as_file()
        .sync_all()
        .map_err(|err| write_error(path, err))?;
    Ok(temp)
}

fn commit(temp: NamedTempFile, path: &Utf8Path) -> Result<(), CatalogError> {
    temp.persist(path.as_std_path())
        .map_err(|err| write_error(path, err.error))?;
    tracing::debug!(path = %path, "wrote catalog file");
    Ok(())
}

fn write_error(path: &Utf8Path, err: impl std::fmt::Display) -> CatalogError {
    CatalogError::OutputWrite {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
