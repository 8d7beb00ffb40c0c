pub mod indicator;

pub use indicator::{IndicatorChange, IndicatorState, Slot};
