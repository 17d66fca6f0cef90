//! 10밸브 희석 발생기의 밸브 조합 선택 엔진.

pub mod coefficients;
pub mod selector;

pub use coefficients::*;
pub use selector::*;
