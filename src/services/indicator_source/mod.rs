//! IndicatorSource service: responsibility and boundaries
//!
//! This module and its submodules only read keyboard lock LEDs and deliver the
//! full indicator state. Computing which slots changed belongs to
//! IndicatorStateTracker; picking and drawing icons belongs to IndicatorDisplay.

mod dry_run;
mod evdev_source;
mod r#trait;

pub use self::r#trait::create_indicator_source;
