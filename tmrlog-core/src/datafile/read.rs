use std::{io::Read, path::Path};

use tmrlog_types::Sample;

use crate::{is_valid_header, DataFileError, DataFileResult};

/// Читает все строки файла данных, проверяя заголовок.
pub fn read_samples(path: impl AsRef<Path>) -> DataFileResult<Vec<Sample>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    check_header(&mut reader)?;

    reader
        .deserialize::<Sample>()
        .map(|row| row.map_err(DataFileError::from))
        .collect()
}

/// Считает строки данных (без заголовка), не разбирая значения.
pub fn count_rows(path: impl AsRef<Path>) -> DataFileResult<u64> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    check_header(&mut reader)?;

    let mut rows = 0u64;
    for record in reader.records() {
        record?;
        rows += 1;
    }

    Ok(rows)
}

fn check_header<R: Read>(reader: &mut csv::Reader<R>) -> DataFileResult<()> {
    let headers = reader.headers()?;

    if !is_valid_header(headers.iter()) {
        return Err(DataFileError::HeaderMismatch {
            found: headers.iter().map(String::from).collect(),
        });
    }

    Ok(())
}
