//! Domain types for signalsim.

pub mod bar;
pub mod daily;
pub mod equity;
pub mod position;
pub mod trade;

pub use bar::{validate_bars, Bar};
pub use daily::DailyPnl;
pub use equity::{EquityPoint, EquitySnapshot};
pub use position::{PositionDirection, PositionState};
pub use trade::Trade;
