use crate::events::{IndicatorChange, IndicatorState, Slot};
use smallvec::SmallVec;

/// Изменения за одно обновление: не больше одного на слот
pub type Changes = SmallVec<[IndicatorChange; 3]>;

/// Хранит последнее отрисованное состояние и вычисляет, какие слоты изменились.
///
/// Уведомления платформы несут полное состояние, а не дельту, поэтому дельту
/// считаем здесь: перезагрузка иконки стоит чтения файла.
#[derive(Debug, Clone)]
pub struct IndicatorStateTracker {
    baseline: IndicatorState,
}

impl IndicatorStateTracker {
    pub fn new(current: IndicatorState) -> Self {
        let mut tracker = Self {
            baseline: IndicatorState::default(),
        };
        tracker.initialize(current);
        tracker
    }

    /// Базовое состояние = дополнение текущего, чтобы первый `apply_update`
    /// отрисовал все три слота.
    pub fn initialize(&mut self, current: IndicatorState) {
        self.baseline = current.complement();
    }

    pub fn apply_update(&mut self, new_state: IndicatorState) -> Changes {
        let changes = Slot::ALL
            .iter()
            .filter(|slot| self.baseline.is_on(**slot) != new_state.is_on(**slot))
            .map(|slot| IndicatorChange::new(*slot, new_state.is_on(*slot)))
            .collect();

        self.baseline = new_state;
        changes
    }

    /// Слот не был отрисован: инвертируем его бит в базовом состоянии, чтобы
    /// следующий `apply_update` снова выдал изменение для него.
    pub fn invalidate(&mut self, slot: Slot) {
        self.baseline = self.baseline.with(slot, !self.baseline.is_on(slot));
    }

    pub fn baseline(&self) -> IndicatorState {
        self.baseline
    }
}
