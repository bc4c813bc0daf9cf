//! Формат файла данных tmrlog
//!
//! CSV файл с колонками `Time stamp,TMR,Power,Temp`. Заголовок пишется один
//! раз, при создании файла; все последующие пачки только дописываются.
//!
//! # Быстрый старт
//!
//! ```no_run
//! use tmrlog_core::{read_samples, DataFileWriter};
//! use tmrlog_types::{Reading, Sample};
//!
//! let writer = DataFileWriter::new("data.csv");
//! let batch = vec![Sample::now(Reading::new(1.0, 2.0, 3.0))];
//! writer.append_batch(&batch)?;
//!
//! let samples = read_samples("data.csv")?;
//! assert!(!samples.is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod datafile;
pub mod error;
pub mod format;

pub use datafile::*;
pub use error::*;
pub use format::*;

/// Версия библиотеки.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
