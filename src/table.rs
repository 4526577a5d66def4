use std::collections::HashMap;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use csv::{ReaderBuilder, StringRecord};

use crate::error::CatalogError;

pub const TAB: u8 = b'\t';

#[derive(Debug, Clone)]
pub struct Table {
    path: Utf8PathBuf,
    columns: HashMap<String, usize>,
    rows: Vec<StringRecord>,
}

#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    record: &'a StringRecord,
    line: u64,
}

impl Table {
    pub fn read(path: &Utf8Path, delimiter: u8) -> Result<Self, CatalogError> {
        let bytes = fs::read(path.as_std_path()).map_err(|err| CatalogError::SourceRead {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        let content = String::from_utf8(bytes).map_err(|err| CatalogError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        Self::parse(path, &content, delimiter)
    }

    pub fn parse(origin: &Utf8Path, content: &str, delimiter: u8) -> Result<Self, CatalogError> {
        check_quoting(origin, content, delimiter)?;

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(false)
            .from_reader(content.as_bytes());
        let headers = reader
            .headers()
            .map_err(|err| csv_error(origin, err))?
            .clone();
        let columns = headers
            .iter()
            .enumerate()
            .map(|(index, name)| (name.to_string(), index))
            .collect();
        let rows = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| csv_error(origin, err))?;
        tracing::debug!(path = %origin, rows = rows.len(), "read source table");
        Ok(Self {
            path: origin.to_path_buf(),
            columns,
            rows,
        })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    pub fn require_columns(&self, columns: &[&str]) -> Result<(), CatalogError> {
        match columns.iter().find(|column| !self.has_column(column)) {
            Some(column) => Err(CatalogError::MissingColumn {
                path: self.path.clone(),
                column: column.to_string(),
            }),
            None => Ok(()),
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        // Header is line 1.
        self.rows.iter().enumerate().map(move |(index, record)| Row {
            table: self,
            record,
            line: record
                .position()
                .map(|pos| pos.line())
                .unwrap_or(index as u64 + 2),
        })
    }
}

impl<'a> Row<'a> {
    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn path(&self) -> &'a Utf8Path {
        &self.table.path
    }

    pub fn get(&self, column: &str) -> Result<&'a str, CatalogError> {
        let index =
            self.table
                .columns
                .get(column)
                .ok_or_else(|| CatalogError::MissingColumn {
                    path: self.table.path.clone(),
                    column: column.to_string(),
                })?;
        Ok(self.record.get(*index).unwrap_or(""))
    }
}

// One record per line: a quoted field must close on its own line, right
// before a delimiter or the line end. Quotes inside unquoted fields are text.
fn check_quoting(path: &Utf8Path, content: &str, delimiter: u8) -> Result<(), CatalogError> {
    for (index, line) in content.lines().enumerate() {
        let bytes = line.as_bytes();
        let mut pos = 0;
        loop {
            if bytes.get(pos) == Some(&b'"') {
                pos += 1;
                loop {
                    match bytes.get(pos) {
                        None => return Err(quote_error(path, index, "quote not closed")),
                        Some(b'"') => match bytes.get(pos + 1) {
                            Some(b'"') => pos += 2,
                            Some(&next) if next != delimiter => {
                                return Err(quote_error(path, index, "invalid closing quote"));
                            }
                            _ => {
                                pos += 1;
                                break;
                            }
                        },
                        Some(_) => pos += 1,
                    }
                }
            } else {
                while bytes.get(pos).is_some_and(|&byte| byte != delimiter) {
                    pos += 1;
                }
            }
            if pos >= bytes.len() {
                break;
            }
            pos += 1;
        }
    }
    Ok(())
}

fn quote_error(path: &Utf8Path, index: usize, message: &str) -> CatalogError {
    CatalogError::Parse {
        path: path.to_path_buf(),
        message: format!("{message} on line {}", index + 1),
    }
}

fn csv_error(path: &Utf8Path, err: csv::Error) -> CatalogError {
    if let csv::ErrorKind::Io(io) = err.kind() {
        return CatalogError::SourceRead {
            path: path.to_path_buf(),
            message: io.to_string(),
        };
    }
    CatalogError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn rows_are_addressed_by_header() {
        let table = Table::parse(
            Utf8Path::new("runs.tsv"),
            "accession\tplatform\nGCA_1\tILLUMINA\nGCA_2\t\n",
            TAB,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows[0].get("accession").unwrap(), "GCA_1");
        assert_eq!(rows[0].get("platform").unwrap(), "ILLUMINA");
        assert_eq!(rows[1].get("platform").unwrap(), "");
        assert_eq!(rows[1].line(), 3);
    }

    #[test]
    fn numbers_stay_text() {
        let table = Table::parse(Utf8Path::new("t.tsv"), "length\n007\n", TAB).unwrap();
        let row = table.rows().next().unwrap();
        assert_eq!(row.get("length").unwrap(), "007");
    }

    #[test]
    fn unequal_row_length_is_a_parse_error() {
        let err = Table::parse(Utf8Path::new("bad.tsv"), "a\tb\n1\t2\t3\n", TAB).unwrap_err();
        assert_matches!(err, CatalogError::Parse { .. });
    }

    #[test]
    fn unclosed_quote_is_a_parse_error() {
        let err = Table::parse(Utf8Path::new("t.tsv"), "a\tb\n1\t\"2\n3\t4\n", TAB).unwrap_err();
        assert_matches!(
            err,
            CatalogError::Parse { message, .. } if message == "quote not closed on line 2"
        );
        let err = Table::parse(Utf8Path::new("t.tsv"), "a\tb\n1\t\"2\n", TAB).unwrap_err();
        assert_matches!(err, CatalogError::Parse { .. });
    }

    #[test]
    fn text_after_closing_quote_is_a_parse_error() {
        let err = Table::parse(Utf8Path::new("t.tsv"), "a\tb\nx\t\"q\" z\n", TAB).unwrap_err();
        assert_matches!(
            err,
            CatalogError::Parse { message, .. } if message == "invalid closing quote on line 2"
        );
    }

    #[test]
    fn well_formed_quotes_are_accepted() {
        let table = Table::parse(
            Utf8Path::new("t.tsv"),
            "a\tb\tc\n\"x\ty\"\t\"say \"\"hi\"\"\"\t5\" tall\n",
            TAB,
        )
        .unwrap();
        let row = table.rows().next().unwrap();
        assert_eq!(row.get("a").unwrap(), "x\ty");
        assert_eq!(row.get("b").unwrap(), "say \"hi\"");
        assert_eq!(row.get("c").unwrap(), "5\" tall");
    }

    #[test]
    fn unknown_column_is_reported() {
        let table = Table::parse(Utf8Path::new("t.tsv"), "a\n1\n", TAB).unwrap();
        assert_matches!(
            table.require_columns(&["a", "b"]),
            Err(CatalogError::MissingColumn { column, .. }) if column == "b"
        );
        let row = table.rows().next().unwrap();
        assert_matches!(row.get("zzz"), Err(CatalogError::MissingColumn { .. }));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(temp.path().join("absent.tsv")).unwrap();
        assert_matches!(
            Table::read(&path, TAB),
            Err(CatalogError::SourceRead { .. })
        );
    }

    #[test]
    fn custom_delimiter() {
        let table = Table::parse(Utf8Path::new("t.csv"), "a,b\n1,2\n", b',').unwrap();
        assert_eq!(table.rows().next().unwrap().get("b").unwrap(), "2");
    }
}
