use std::{path::PathBuf, time::Duration};

use tmrlog_core::DEFAULT_OUTPUT_FILE;
use tmrlog_types::DEFAULT_DELIMITER;

use crate::{RecorderError, RecorderResult};

/// Последовательный порт Jetson по умолчанию (UART на 40-pin разъёме).
pub const DEFAULT_PORT: &str = "/dev/ttyTHS1";

/// Скорость порта по умолчанию.
pub const DEFAULT_BAUD: u32 = 38_400;

/// Показаний в одной пачке.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Источник строк с показаниями.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceKind {
    /// Встроенный симулятор (не требует железа).
    Simulated,
    /// Микроконтроллер на последовательном порту (требует feature `serial`).
    Serial,
}

/// Полная конфигурация сессии записи.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Источник данных
    pub device: DeviceKind,
    /// Путь к последовательному порту
    pub port_path: String,
    /// Скорость порта (бод)
    pub baud_rate: u32,
    /// Таймаут чтения одной строки; по таймауту приходит пустая строка
    pub read_timeout: Duration,
    /// Корректных показаний в одной пачке
    pub batch_size: usize,
    /// Разделитель полей в строке от микроконтроллера
    pub delimiter: char,
    /// Путь к выходному CSV файлу
    pub output_path: PathBuf,
    /// Ограничение по числу пачек (None = до Ctrl+C)
    pub max_batches: Option<u64>,
    /// Интервал вывода статистики (секунды)
    pub stats_interval_secs: u64,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl RecorderConfig {
    /// Проверяет конфигурацию перед стартом.
    pub fn validate(&self) -> RecorderResult<()> {
        if self.batch_size == 0 {
            return Err(RecorderError::Config(
                "batch size must be > 0".to_string(),
            ));
        }

        if self.read_timeout.is_zero() {
            return Err(RecorderError::Config(
                "read timeout must be > 0".to_string(),
            ));
        }

        if self.baud_rate == 0 {
            return Err(RecorderError::Config("baud rate must be > 0".to_string()));
        }

        if !is_usable_delimiter(self.delimiter) {
            return Err(RecorderError::Config(format!(
                "delimiter {:?} clashes with number syntax or whitespace",
                self.delimiter
            )));
        }

        if self.max_batches == Some(0) {
            return Err(RecorderError::Config(
                "max batches must be > 0 when set".to_string(),
            ));
        }

        Ok(())
    }
}

/// Разделитель не должен встречаться внутри записи числа.
fn is_usable_delimiter(c: char) -> bool {
    !(c.is_whitespace() || c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для DeviceKind, RecorderConfig
////////////////////////////////////////////////////////////////////////////////

impl std::fmt::Display for DeviceKind {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            DeviceKind::Simulated => write!(f, "sim"),
            DeviceKind::Serial => write!(f, "serial"),
        }
    }
}

impl std::str::FromStr for DeviceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sim" | "simulated" => Ok(DeviceKind::Simulated),
            "serial" | "uart" | "tty" => Ok(DeviceKind::Serial),
            _ => Err(format!("Unknown device type: '{s}'. Use: sim, serial")),
        }
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            device: DeviceKind::Serial,
            port_path: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD,
            read_timeout: Duration::from_secs(1),
            batch_size: DEFAULT_BATCH_SIZE,
            delimiter: DEFAULT_DELIMITER,
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            max_batches: None,
            stats_interval_secs: 5,
        }
    }
}

/// Парсит таймаут чтения.
///
/// Поддерживает суффиксы `ms` и `s`; число без суффикса — секунды
/// (дробные допустимы).
///
/// # Примеры
/// ```
/// use std::time::Duration;
/// use tmrlog_recorder::config::parse_timeout;
/// assert_eq!(parse_timeout("1").unwrap(), Duration::from_secs(1));
/// assert_eq!(parse_timeout("250ms").unwrap(), Duration::from_millis(250));
/// assert_eq!(parse_timeout("0.5s").unwrap(), Duration::from_millis(500));
/// ```
pub fn parse_timeout(s: &str) -> Result<Duration, String> {
    let lower = s.trim().to_lowercase();

    if let Some(v) = lower.strip_suffix("ms") {
        return v
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| format!("Invalid timeout '{s}': {e}"));
    }

    let num_str = lower.strip_suffix('s').unwrap_or(&lower).trim();
    let secs: f64 = num_str
        .parse()
        .map_err(|e| format!("Invalid timeout value '{num_str}': {e}"))?;

    if !secs.is_finite() || secs < 0.0 {
        return Err(format!("Invalid timeout '{s}': must be a non-negative number"));
    }

    Ok(Duration::from_secs_f64(secs))
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
