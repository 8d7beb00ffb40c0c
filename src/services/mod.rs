pub mod display;
pub mod icons;
pub mod indicator_source;
pub mod render_sink;
pub mod tracker;

pub use display::IndicatorDisplay;
pub use icons::IconSet;
pub use indicator_source::create_indicator_source;
pub use render_sink::create_render_sink;
pub use tracker::IndicatorStateTracker;
