use std::{
    fs::{self, File, OpenOptions},
    path::{Path, PathBuf},
};

use log::debug;
use tmrlog_types::Sample;

use crate::{DataFileResult, CSV_COLUMNS};

/// Писатель CSV файла данных.
///
/// Файл не держится открытым между пачками: каждая пачка открывает его
/// заново. Если файла нет, он создаётся и первой строкой пишется заголовок;
/// иначе строки дописываются в конец без заголовка.
#[derive(Debug, Clone)]
pub struct DataFileWriter {
    path: PathBuf,
}

/// Итог записи одной пачки.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushReport {
    /// Записано строк данных (без заголовка)
    pub rows: usize,
    /// Был ли записан заголовок (файл создан этой пачкой)
    pub header_written: bool,
}

impl DataFileWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `true`, если следующая пачка создаст файл и запишет заголовок.
    pub fn needs_header(&self) -> bool {
        !self.path.is_file()
    }

    /// Записывает пачку в файл: создание с заголовком или дозапись.
    pub fn append_batch(
        &self,
        samples: &[Sample],
    ) -> DataFileResult<FlushReport> {
        let header_written = self.needs_header();

        let file = if header_written {
            self.ensure_parent_dir()?;
            File::create(&self.path)?
        } else {
            OpenOptions::new().append(true).open(&self.path)?
        };

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if header_written {
            writer.write_record(CSV_COLUMNS)?;
        }

        for sample in samples {
            writer.serialize(sample)?;
        }

        writer.flush()?;

        debug!(
            "Wrote {} rows to {:?} (header: {header_written})",
            samples.len(),
            self.path
        );

        Ok(FlushReport {
            rows: samples.len(),
            header_written,
        })
    }

    fn ensure_parent_dir(&self) -> DataFileResult<()> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
                fs::create_dir_all(parent)?;
                debug!("Created output directory {parent:?}");
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
