use thiserror::Error;

/// Результат операций с файлом данных.
pub type DataFileResult<T> = std::result::Result<T, DataFileError>;

#[derive(Debug, Error)]
pub enum DataFileError {
    /// Ошибки ввода/вывода
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Ошибка сериализации/разбора CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Заголовок существующего файла не совпадает с ожидаемым
    #[error("Unexpected header: {found:?}, expected \"Time stamp,TMR,Power,Temp\"")]
    HeaderMismatch { found: Vec<String> },
}
