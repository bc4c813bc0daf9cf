//! Запись показаний TMR датчика с последовательного порта в CSV.
//!
//! Микроконтроллер шлёт строки `<tmr>x<power>x<temp>`; [`RecordingPipeline`]
//! собирает их в пачки фиксированного размера и дописывает в файл данных.

pub mod config;
pub mod device;
pub mod error;
pub mod metrics;
pub mod pipeline;

pub use config::*;
pub use device::*;
pub use error::*;
pub use metrics::*;
pub use pipeline::*;
