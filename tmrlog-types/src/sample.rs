use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::Reading;

/// Формат метки времени: локальное время с микросекундами.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Показание датчика с меткой времени — одна строка CSV файла.
///
/// Имена колонок задаются через `serde(rename)` и совпадают с заголовком
/// `Time stamp,TMR,Power,Temp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    #[serde(rename = "Time stamp")]
    pub timestamp: String,
    #[serde(rename = "TMR")]
    pub tmr: f64,
    #[serde(rename = "Power")]
    pub power: f64,
    #[serde(rename = "Temp")]
    pub temp: f64,
}

impl Sample {
    /// Ставит на показание метку времени `at`.
    pub fn stamp(
        reading: Reading,
        at: DateTime<Local>,
    ) -> Self {
        Self {
            timestamp: format_timestamp(at),
            tmr: reading.tmr,
            power: reading.power,
            temp: reading.temp,
        }
    }

    /// Ставит на показание текущее локальное время.
    pub fn now(reading: Reading) -> Self {
        Self::stamp(reading, Local::now())
    }

    pub fn reading(&self) -> Reading {
        Reading::new(self.tmr, self.power, self.temp)
    }
}

/// Форматирует время как `YYYY-MM-DD HH:MM:SS.ffffff`.
pub fn format_timestamp(at: DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_timestamp_has_microseconds() {
        let at = Local
            .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
            .single()
            .unwrap()
            + chrono::Duration::microseconds(42);

        assert_eq!(format_timestamp(at), "2024-01-02 03:04:05.000042");
    }

    #[test]
    fn test_stamp_keeps_values() {
        let at = Local
            .with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
            .single()
            .unwrap();
        let s = Sample::stamp(Reading::new(1.5, -2.0, 30.25), at);

        assert_eq!(s.timestamp, "2024-06-01 12:00:00.000000");
        assert_eq!(s.reading(), Reading::new(1.5, -2.0, 30.25));
    }

    #[test]
    fn test_now_timestamp_layout() {
        let s = Sample::now(Reading::new(0.0, 0.0, 0.0));
        // "YYYY-MM-DD HH:MM:SS.ffffff"
        assert_eq!(s.timestamp.len(), 26);
        assert_eq!(&s.timestamp[4..5], "-");
        assert_eq!(&s.timestamp[10..11], " ");
        assert_eq!(&s.timestamp[19..20], ".");
    }
}
