// Источник строк от микроконтроллера. Реальный порт и симулятор отдают
// сырые строки одинаково, разбор и отбраковка происходят в pipeline.
// Хэндл живёт одну пачку: pipeline открывает устройство заново на каждую
// пачку, закрытие — через Drop.

use std::{
    f64::consts::PI,
    io::{BufRead, ErrorKind},
    thread,
    time::Duration,
};

use log::trace;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{DeviceKind, RecorderConfig, RecorderError, RecorderResult};

/// Абстракция источника показаний.
pub trait SensorDevice: Send {
    /// Информация об устройстве
    fn info(&self) -> DeviceInfo;

    /// Читает одну строку (без разбора).
    ///
    /// Таймаут чтения не ошибка: возвращается то, что успело прийти,
    /// в том числе пустая строка.
    fn read_line(&mut self) -> RecorderResult<String>;
}

/// Информация об устройстве (для логирования).
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceInfo {
    pub name: String,
    pub port: Option<String>,
    pub baud_rate: Option<u32>,
    pub read_timeout: Option<Duration>,
}

/// Построчный источник поверх любого [`BufRead`].
///
/// Для последовательного порта `R = BufReader<Box<dyn SerialPort>>`.
/// Конец потока считается фатальной ошибкой: порт так себя не ведёт,
/// а для файла/канала это значит, что данных больше не будет.
pub struct LineDevice<R> {
    reader: R,
    info: DeviceInfo,
}

impl<R: BufRead + Send> LineDevice<R> {
    pub fn new(
        reader: R,
        info: DeviceInfo,
    ) -> Self {
        Self { reader, info }
    }
}

impl<R: BufRead + Send> SensorDevice for LineDevice<R> {
    fn info(&self) -> DeviceInfo {
        self.info.clone()
    }

    fn read_line(&mut self) -> RecorderResult<String> {
        let mut buf = Vec::with_capacity(64);

        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => {
                return Err(RecorderError::DeviceError(format!(
                    "{}: end of stream",
                    self.info.name
                )))
            }
            Ok(_) => {}
            // Частичная строка остаётся в buf, как и при обычном чтении
            Err(e) if e.kind() == ErrorKind::TimedOut => {
                trace!("Read timeout ({} bytes pending)", buf.len());
            }
            Err(e) => return Err(e.into()),
        }

        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Последовательный порт микроконтроллера.
#[cfg(feature = "serial")]
pub type SerialDevice = LineDevice<std::io::BufReader<Box<dyn serialport::SerialPort>>>;

/// Открывает последовательный порт с заданной скоростью и таймаутом.
#[cfg(feature = "serial")]
pub fn open_serial(
    path: &str,
    baud_rate: u32,
    read_timeout: Duration,
) -> RecorderResult<SerialDevice> {
    let port = serialport::new(path, baud_rate)
        .timeout(read_timeout)
        .open()?;

    let info = DeviceInfo {
        name: "Serial sensor".to_string(),
        port: Some(path.to_string()),
        baud_rate: Some(baud_rate),
        read_timeout: Some(read_timeout),
    };

    Ok(LineDevice::new(std::io::BufReader::new(port), info))
}

/// Генерирует синтетические строки `<tmr>x<power>x<temp>` для тестов и
/// отладки без железа.
pub struct SimulatedDevice {
    /// Пауза перед каждой строкой (темп микроконтроллера)
    pub line_interval: Duration,
    /// Доля битых строк (0.0..=1.0)
    pub malformed_ratio: f64,
    pub delimiter: char,
    rng: StdRng,
    tick: u64,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl SimulatedDevice {
    pub fn new(delimiter: char) -> Self {
        Self::with_rng(delimiter, StdRng::from_entropy())
    }

    /// Детерминированный симулятор.
    pub fn with_seed(
        delimiter: char,
        seed: u64,
    ) -> Self {
        Self::with_rng(delimiter, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        delimiter: char,
        rng: StdRng,
    ) -> Self {
        Self {
            line_interval: Duration::from_millis(1),
            malformed_ratio: 0.0,
            delimiter,
            rng,
            tick: 0,
        }
    }

    pub fn with_malformed_ratio(
        mut self,
        ratio: f64,
    ) -> Self {
        self.malformed_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    pub fn with_line_interval(
        mut self,
        interval: Duration,
    ) -> Self {
        self.line_interval = interval;
        self
    }

    fn next_line(&mut self) -> String {
        self.tick += 1;
        let d = self.delimiter;

        let t = self.tick as f64 * 1e-3;
        let tmr = 1.2 * (2.0 * PI * 0.5 * t).sin() + self.rng.gen_range(-0.02..0.02);
        let power = 3.3 + self.rng.gen_range(-0.05..0.05);
        let temp = 25.0 + self.tick as f64 * 1e-4 + self.rng.gen_range(-0.1..0.1);

        if self.rng.gen_bool(self.malformed_ratio) {
            // Типичные помехи на линии: обрыв, мусор, пустая строка
            return match self.rng.gen_range(0..3) {
                0 => format!("{tmr:.4}{d}{power:.4}\r\n"),
                1 => format!("#?{d}{power:.4}{d}{temp:.2}\r\n"),
                _ => "\r\n".to_string(),
            };
        }

        format!("{tmr:.4}{d}{power:.4}{d}{temp:.2}\r\n")
    }
}

impl SensorDevice for SimulatedDevice {
    fn info(&self) -> DeviceInfo {
        DeviceInfo {
            name: "Simulated sensor".to_string(),
            port: None,
            baud_rate: None,
            read_timeout: None,
        }
    }

    fn read_line(&mut self) -> RecorderResult<String> {
        if !self.line_interval.is_zero() {
            thread::sleep(self.line_interval);
        }

        Ok(self.next_line())
    }
}

/// Создаёт нужное устройство по конфигурации.
pub fn create_device(config: &RecorderConfig) -> RecorderResult<Box<dyn SensorDevice>> {
    match &config.device {
        DeviceKind::Simulated => Ok(Box::new(SimulatedDevice::new(config.delimiter))),
        DeviceKind::Serial => {
            #[cfg(feature = "serial")]
            {
                let dev = open_serial(&config.port_path, config.baud_rate, config.read_timeout)?;
                Ok(Box::new(dev))
            }
            #[cfg(not(feature = "serial"))]
            Err(RecorderError::DeviceNotFound(format!(
                "{}: compiled without serial support. \
                 Rebuild with: cargo build --features serial",
                config.port_path
            )))
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
