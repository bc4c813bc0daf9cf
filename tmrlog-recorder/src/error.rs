use thiserror::Error;

pub type RecorderResult<T> = std::result::Result<T, RecorderError>;

/// Фатальные ошибки записи. Ошибки разбора отдельных строк сюда не
/// попадают: они восстановимые, см. [`tmrlog_types::LineError`].
#[derive(Debug, Error)]
pub enum RecorderError {
    /// Устройство не найдено или не поддерживается сборкой
    #[error("Sensor device not found: {0}")]
    DeviceNotFound(String),

    /// Ошибка устройства при чтении
    #[error("Sensor device error: {0}")]
    DeviceError(String),

    /// Ошибка открытия/настройки последовательного порта
    #[cfg(feature = "serial")]
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// Ошибка ввода/вывода
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Ошибка записи CSV файла
    #[error("Data file error: {0}")]
    DataFile(#[from] tmrlog_core::DataFileError),

    /// Некорректная конфигурация
    #[error("Config error: {0}")]
    Config(String),
}
