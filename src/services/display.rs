use crate::debug_if_enabled;
use crate::error::Result;
use crate::events::IndicatorState;
use crate::services::icons::IconSet;
use crate::services::render_sink::RenderSink;
use crate::services::tracker::IndicatorStateTracker;
use tracing::warn;

/// Связывает трекер состояния с иконками и приёмником отрисовки.
///
/// Вызывается только из одного цикла событий, блокировки не нужны.
pub struct IndicatorDisplay {
    tracker: IndicatorStateTracker,
    icons: IconSet,
    sink: Box<dyn RenderSink + Send>,
}

impl IndicatorDisplay {
    pub fn new(
        tracker: IndicatorStateTracker,
        icons: IconSet,
        sink: Box<dyn RenderSink + Send>,
    ) -> Self {
        Self {
            tracker,
            icons,
            sink,
        }
    }

    /// Применить новое полное состояние. Возвращает число перерисованных слотов.
    ///
    /// Ошибка приёмника не прерывает остальные слоты. Неотрисованный слот
    /// помечается в трекере и будет повторён при следующем обновлении;
    /// вызывающему возвращается первая ошибка.
    pub fn update(&mut self, state: IndicatorState) -> Result<usize> {
        let changes = self.tracker.apply_update(state);
        debug_if_enabled!("Состояние индикаторов: {} (изменений: {})", state, changes.len());

        let mut first_error = None;
        for change in &changes {
            debug_if_enabled!("Смена иконки: {}", change);
            let icon = self.icons.path_for(change.slot, change.is_on);
            if let Err(e) = self.sink.render(change.slot, change.is_on, &icon) {
                warn!("{}: не удалось отрисовать {}: {}", change.slot, icon.display(), e);
                self.tracker.invalidate(change.slot);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(changes.len()),
        }
    }

    pub fn state(&self) -> IndicatorState {
        self.tracker.baseline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KbledError;
    use crate::events::Slot;
    use parking_lot::Mutex;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    #[derive(Default, Clone)]
    struct RecordingSink {
        rendered: Arc<Mutex<Vec<(Slot, bool, PathBuf)>>>,
        failures_left: usize,
    }

    impl RenderSink for RecordingSink {
        fn render(&mut self, slot: Slot, is_on: bool, icon: &Path) -> Result<()> {
            if self.failures_left > 0 {
                self.failures_left -= 1;
                return Err(KbledError::Internal("приёмник недоступен".to_string()));
            }
            self.rendered.lock().push((slot, is_on, icon.to_path_buf()));
            Ok(())
        }
    }

    fn display_with(initial: u32, sink: RecordingSink) -> IndicatorDisplay {
        IndicatorDisplay::new(
            IndicatorStateTracker::new(IndicatorState::from_bits(initial)),
            IconSet::new("/img"),
            Box::new(sink),
        )
    }

    #[test]
    fn test_initial_update_renders_all_icons() {
        let sink = RecordingSink::default();
        let mut display = display_with(0b001, sink.clone());

        assert_eq!(display.update(IndicatorState::from_bits(0b001)).unwrap(), 3);

        let rendered = sink.rendered.lock();
        assert_eq!(
            *rendered,
            vec![
                (Slot::CapsLock, true, PathBuf::from("/img/capslock-on.png")),
                (Slot::NumLock, false, PathBuf::from("/img/numlock-off.png")),
                (Slot::ScrollLock, false, PathBuf::from("/img/scrllock-off.png")),
            ]
        );
    }

    #[test]
    fn test_only_changed_slots_rendered() {
        let sink = RecordingSink::default();
        let mut display = display_with(0b000, sink.clone());
        display.update(IndicatorState::from_bits(0b000)).unwrap();
        sink.rendered.lock().clear();

        assert_eq!(display.update(IndicatorState::from_bits(0b010)).unwrap(), 1);
        assert_eq!(display.update(IndicatorState::from_bits(0b010)).unwrap(), 0);

        let rendered = sink.rendered.lock();
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].0, Slot::NumLock);
        assert!(rendered[0].1);
        assert_eq!(display.state().bits(), 0b010);
    }

    #[test]
    fn test_sink_error_does_not_skip_other_slots() {
        let sink = RecordingSink {
            failures_left: 1,
            ..Default::default()
        };
        let mut display = display_with(0b000, sink.clone());

        assert!(display.update(IndicatorState::from_bits(0b000)).is_err());
        {
            let rendered = sink.rendered.lock();
            let slots: Vec<Slot> = rendered.iter().map(|r| r.0).collect();
            assert_eq!(slots, vec![Slot::NumLock, Slot::ScrollLock]);
        }

        // Caps Lock не отрисован и повторяется при том же состоянии
        assert_eq!(display.update(IndicatorState::from_bits(0b000)).unwrap(), 1);
        let rendered = sink.rendered.lock();
        assert_eq!(rendered.len(), 3);
        assert_eq!(
            rendered[2],
            (Slot::CapsLock, false, PathBuf::from("/img/capslock-off.png"))
        );
        assert_eq!(display.state().bits(), 0b000);
    }

    #[test]
    fn test_failing_sink_keeps_retrying() {
        let sink = RecordingSink {
            failures_left: usize::MAX,
            ..Default::default()
        };
        let mut display = display_with(0b000, sink.clone());

        assert!(display.update(IndicatorState::from_bits(0b100)).is_err());
        assert!(display.update(IndicatorState::from_bits(0b100)).is_err());
        assert!(sink.rendered.lock().is_empty());
        assert_eq!(display.state().bits(), 0b111);
    }
}
