use crate::config::Config;
use crate::error::Result;
use crate::events::IndicatorState;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Trait for keyboard indicator sources that can run in different modes
#[async_trait::async_trait]
pub trait IndicatorSourceTrait {
    /// Query the live indicator state once, synchronously
    fn query_state(&mut self) -> Result<IndicatorState>;

    /// Deliver the full indicator state on every change notification.
    /// Returns `Ok(())` once the receiving side is gone.
    async fn run(self: Box<Self>, updates: mpsc::Sender<IndicatorState>) -> Result<()>;
}

/// Factory function to create an appropriate indicator source based on the dry_run flag.
///
/// Construction initializes the platform side; an error here means indicators
/// are unavailable and the daemon cannot start.
pub fn create_indicator_source(
    config: Arc<Config>,
    dry_run: bool,
) -> Result<Box<dyn IndicatorSourceTrait + Send>> {
    if dry_run {
        Ok(Box::new(super::dry_run::DryRunIndicatorSource::new(
            std::time::Duration::from_millis(config.dry_run.interval_ms),
        )))
    } else {
        Ok(Box::new(super::evdev_source::EvdevIndicatorSource::new(
            config,
        )?))
    }
}
