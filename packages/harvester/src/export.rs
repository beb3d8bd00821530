//! Tabular export of harvested records.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::Row;

/// Column-ordered table built from records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Build a table whose columns are the union of the records' keys,
    /// in the order each key is first seen.
    pub fn from_records<'a, R, I>(records: I) -> Self
    where
        R: Row + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let mut columns: Vec<String> = Vec::new();
        let mut keyed_rows: Vec<Vec<(&'static str, Option<String>)>> = Vec::new();

        for record in records {
            let cells = record.cells();
            for (key, _) in &cells {
                if !columns.iter().any(|c| c == key) {
                    columns.push((*key).to_string());
                }
            }
            keyed_rows.push(cells);
        }

        let rows = keyed_rows
            .into_iter()
            .map(|cells| {
                columns
                    .iter()
                    .map(|column| {
                        cells
                            .iter()
                            .find(|(key, _)| key == column)
                            .and_then(|(_, value)| value.clone())
                    })
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write header and rows as CSV to any writer.
    ///
    /// A table without columns writes nothing.
    pub fn write_to<W: std::io::Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        if !self.columns.is_empty() {
            csv.write_record(&self.columns)?;
        }
        for row in &self.rows {
            csv.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
        }
        csv.flush()?;
        Ok(())
    }

    /// Write the table to `path`, creating the parent directory if needed.
    ///
    /// The file is written next to its destination and renamed into place.
    pub fn write_csv(&self, path: &Path) -> Result<PathBuf> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let temp_path = path.with_file_name(format!(".{file_name}.tmp"));

        if let Err(e) = self.write_and_rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }
        Ok(path.to_path_buf())
    }

    fn write_and_rename(&self, temp_path: &Path, path: &Path) -> Result<()> {
        {
            let file = File::create(temp_path)?;
            self.write_to(&file)?;
            file.sync_all()?;
        }

        // On Windows, rename fails if the destination already exists
        #[cfg(target_os = "windows")]
        if path.exists() {
            fs::remove_file(path)?;
        }

        fs::rename(temp_path, path)?;
        Ok(())
    }
}
