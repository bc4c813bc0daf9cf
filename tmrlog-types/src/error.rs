use thiserror::Error;

/// Результат разбора одной строки от микроконтроллера.
pub type LineResult<T> = std::result::Result<T, LineError>;

/// Ошибки разбора строки. Все они восстановимые: строка отбрасывается,
/// чтение продолжается.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LineError {
    /// После разбиения по разделителю получилось не 3 поля
    #[error("Incomplete data received: expected {expected} fields, got {found}")]
    Incomplete { expected: usize, found: usize },

    /// Поле не удалось преобразовать в число с плавающей точкой
    #[error("Could not convert field #{index} ('{value}') to float")]
    InvalidNumber { index: usize, value: String },
}

impl LineError {
    pub fn is_incomplete(&self) -> bool {
        matches!(self, LineError::Incomplete { .. })
    }

    pub fn is_invalid_number(&self) -> bool {
        matches!(self, LineError::InvalidNumber { .. })
    }
}
