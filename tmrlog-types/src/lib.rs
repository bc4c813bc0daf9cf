pub mod error;
pub mod reading;
pub mod sample;

pub use error::*;
pub use reading::*;
pub use sample::*;
