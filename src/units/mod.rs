//! 단위 정의 및 변환 모듈 모음.

pub mod concentration;
pub mod pressure;
pub mod temperature;

pub use concentration::{ConcentrationUnit, PPM_PER_PERCENT};
pub use pressure::PressureUnit;
pub use temperature::TemperatureUnit;
