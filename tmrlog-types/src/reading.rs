use crate::{LineError, LineResult};

/// Разделитель полей по умолчанию: микроконтроллер шлёт `<tmr>x<power>x<temp>`.
pub const DEFAULT_DELIMITER: char = 'x';

/// Количество полей в корректной строке.
pub const FIELD_COUNT: usize = 3;

/// Одно показание датчика (без метки времени).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Магнитное поле (TMR)
    pub tmr: f64,
    /// Мощность
    pub power: f64,
    /// Температура
    pub temp: f64,
}

impl Reading {
    pub fn new(
        tmr: f64,
        power: f64,
        temp: f64,
    ) -> Self {
        Self { tmr, power, temp }
    }
}

/// Разбивает строку по разделителю, не проверяя количество полей.
///
/// Строка предварительно очищается от пробельных символов по краям, так что
/// `\r\n` в конце не попадает в последнее поле. Пустая строка (таймаут чтения)
/// даёт одно пустое поле.
pub fn split_fields(
    line: &str,
    delimiter: char,
) -> Vec<&str> {
    line.trim().split(delimiter).collect()
}

/// Разбирает строку вида `1.0x2.0x3.0` в [`Reading`].
///
/// # Примеры
/// ```
/// use tmrlog_types::{parse_line, Reading};
/// assert_eq!(parse_line("1.0x2.0x3.0", 'x').unwrap(), Reading::new(1.0, 2.0, 3.0));
/// assert!(parse_line("1.0x2.0", 'x').unwrap_err().is_incomplete());
/// assert!(parse_line("badx2.0x3.0", 'x').unwrap_err().is_invalid_number());
/// ```
pub fn parse_line(
    line: &str,
    delimiter: char,
) -> LineResult<Reading> {
    let fields = split_fields(line, delimiter);
    parse_fields(&fields)
}

/// Разбирает уже разделённые поля.
pub fn parse_fields(fields: &[&str]) -> LineResult<Reading> {
    if fields.len() != FIELD_COUNT {
        return Err(LineError::Incomplete {
            expected: FIELD_COUNT,
            found: fields.len(),
        });
    }

    let mut values = [0.0_f64; FIELD_COUNT];

    for (index, (slot, raw)) in values.iter_mut().zip(fields).enumerate() {
        *slot = raw
            .trim()
            .parse::<f64>()
            .map_err(|_| LineError::InvalidNumber {
                index,
                value: raw.to_string(),
            })?;
    }

    Ok(Reading::new(values[0], values[1], values[2]))
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_line() {
        let r = parse_line("1.0x2.0x3.0", DEFAULT_DELIMITER).unwrap();
        assert_eq!(r, Reading::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_parse_strips_line_ending() {
        let r = parse_line("  -0.25x12.5x36.6\r\n", DEFAULT_DELIMITER).unwrap();
        assert_eq!(r, Reading::new(-0.25, 12.5, 36.6));
    }

    #[test]
    fn test_parse_scientific_notation() {
        let r = parse_line("1e-3x2E2x3", DEFAULT_DELIMITER).unwrap();
        assert_eq!(r, Reading::new(0.001, 200.0, 3.0));
    }

    #[test]
    fn test_two_fields_is_incomplete() {
        let err = parse_line("1.0x2.0", DEFAULT_DELIMITER).unwrap_err();
        assert_eq!(
            err,
            LineError::Incomplete {
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_four_fields_is_incomplete() {
        let err = parse_line("1x2x3x4", DEFAULT_DELIMITER).unwrap_err();
        assert!(err.is_incomplete());
    }

    #[test]
    fn test_empty_line_is_incomplete() {
        // Таймаут чтения отдаёт пустую строку — одно пустое поле
        let err = parse_line("", DEFAULT_DELIMITER).unwrap_err();
        assert_eq!(
            err,
            LineError::Incomplete {
                expected: 3,
                found: 1
            }
        );
    }

    #[test]
    fn test_non_numeric_field() {
        let err = parse_line("badx2.0x3.0", DEFAULT_DELIMITER).unwrap_err();
        assert_eq!(
            err,
            LineError::InvalidNumber {
                index: 0,
                value: "bad".to_string()
            }
        );
    }

    #[test]
    fn test_empty_field_is_invalid_number() {
        let err = parse_line("1.0xx3.0", DEFAULT_DELIMITER).unwrap_err();
        assert_eq!(
            err,
            LineError::InvalidNumber {
                index: 1,
                value: String::new()
            }
        );
    }

    #[test]
    fn test_custom_delimiter() {
        let r = parse_line("4;5;6", ';').unwrap();
        assert_eq!(r, Reading::new(4.0, 5.0, 6.0));
        assert!(parse_line("4x5x6", ';').unwrap_err().is_incomplete());
    }

    #[test]
    fn test_split_fields_keeps_raw_values() {
        assert_eq!(split_fields("1.0x2.0x3.0\n", 'x'), vec!["1.0", "2.0", "3.0"]);
        assert_eq!(split_fields("", 'x'), vec![""]);
    }
}
