pub mod indicators;
pub mod market;
pub mod ohlcv;
pub mod prediction;
pub mod trading;

pub use indicators::*;
pub use market::*;
pub use ohlcv::*;
pub use prediction::*;
pub use trading::*;
