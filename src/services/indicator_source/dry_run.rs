use crate::error::Result;
use crate::events::IndicatorState;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::info;

use super::r#trait::IndicatorSourceTrait;

/// Эмуляция индикаторов: перебирает все 8 состояний по таймеру
pub struct DryRunIndicatorSource {
    state: IndicatorState,
    period: Duration,
}

impl DryRunIndicatorSource {
    pub fn new(period: Duration) -> Self {
        info!("Инициализация DryRunIndicatorSource (период: {:?})", period);
        Self {
            state: IndicatorState::default(),
            period,
        }
    }

    async fn run_impl(mut self, updates: mpsc::Sender<IndicatorState>) -> Result<()> {
        info!("Dry-run режим - индикаторы эмулируются");

        let mut ticker = interval(self.period);
        // Первый тик срабатывает сразу
        ticker.tick().await;

        loop {
            ticker.tick().await;

            self.state = IndicatorState::from_bits(self.state.bits() + 1);
            info!("Dry-run: эмулируем состояние {}", self.state);

            if updates.send(self.state).await.is_err() {
                info!("Получатель состояний закрыт, dry-run источник остановлен");
                return Ok(());
            }
        }
    }
}

#[async_trait::async_trait]
impl IndicatorSourceTrait for DryRunIndicatorSource {
    fn query_state(&mut self) -> Result<IndicatorState> {
        Ok(self.state)
    }

    async fn run(self: Box<Self>, updates: mpsc::Sender<IndicatorState>) -> Result<()> {
        (*self).run_impl(updates).await
    }
}
