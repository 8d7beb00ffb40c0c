use crate::config::Config;
use crate::error::{KbledError, Result};
use crate::events::{IndicatorState, Slot};
use crate::kbled_error;
use crate::utils::DeviceFinder;
use evdev::{AttributeSetRef, Device, EventType, InputEvent, LedCode};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use super::r#trait::IndicatorSourceTrait;

const LOCK_LEDS: [LedCode; 3] = [LedCode::LED_CAPSL, LedCode::LED_NUML, LedCode::LED_SCROLLL];

/// Источник состояния светодиодов клавиатуры через evdev.
///
/// Устройство не захватывается эксклюзивно: нам нужны только события EV_LED.
pub struct EvdevIndicatorSource {
    device: Device,
    device_path: PathBuf,
    state: IndicatorState,
}

impl EvdevIndicatorSource {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        info!("Инициализация EvdevIndicatorSource");

        let device_path = DeviceFinder::find_keyboard_device(&config.input.device_path)?;

        let device = Device::open(&device_path).map_err(|e| {
            KbledError::DeviceNotFound(format!(
                "Не удалось открыть устройство {:?}: {}",
                device_path, e
            ))
        })?;

        Self::check_lock_leds(&device, &device_path)?;

        info!("Устройство: {}", device.name().unwrap_or("Unknown"));
        info!("Физический путь: {:?}", device.physical_path());

        Ok(Self {
            device,
            device_path,
            state: IndicatorState::default(),
        })
    }

    fn check_lock_leds(device: &Device, device_path: &Path) -> Result<()> {
        let leds = device.supported_leds().ok_or_else(|| {
            kbled_error!(
                extension_unavailable,
                "устройство {:?} не имеет светодиодов",
                device_path
            )
        })?;

        for led in LOCK_LEDS {
            if !leds.contains(led) {
                return Err(kbled_error!(
                    extension_unavailable,
                    "устройство {:?} не поддерживает {:?}",
                    device_path,
                    led
                ));
            }
        }

        Ok(())
    }

    async fn run_impl(self, updates: mpsc::Sender<IndicatorState>) -> Result<()> {
        info!(
            "EvdevIndicatorSource запущен, ожидаем события EV_LED от {:?}",
            self.device_path
        );

        let mut state = self.state;
        let mut stream = self.device.into_event_stream()?;

        loop {
            let event = stream.next_event().await?;

            let Some(next) = fold_led_event(state, &event) else {
                trace!("Пропуск события: {:?}", event);
                continue;
            };

            state = next;
            debug!("EV_LED {} = {}, состояние: {}", event.code(), event.value(), state);

            if updates.send(state).await.is_err() {
                info!("Получатель состояний закрыт, EvdevIndicatorSource остановлен");
                return Ok(());
            }
        }
    }
}

#[async_trait::async_trait]
impl IndicatorSourceTrait for EvdevIndicatorSource {
    fn query_state(&mut self) -> Result<IndicatorState> {
        let leds = self.device.get_led_state()?;
        self.state = state_from_leds(&leds);
        debug!("Текущее состояние светодиодов: {}", self.state);
        Ok(self.state)
    }

    async fn run(self: Box<Self>, updates: mpsc::Sender<IndicatorState>) -> Result<()> {
        (*self).run_impl(updates).await
    }
}

/// Светодиоды evdev нумеруются NUML=0, CAPSL=1, SCROLLL=2, слоты идут иначе
pub fn slot_for_led(led: LedCode) -> Option<Slot> {
    match led {
        LedCode::LED_CAPSL => Some(Slot::CapsLock),
        LedCode::LED_NUML => Some(Slot::NumLock),
        LedCode::LED_SCROLLL => Some(Slot::ScrollLock),
        _ => None,
    }
}

/// Событие EV_LED несёт один светодиод: вписываем его в последнее полное
/// состояние. Прочие события и светодиоды без слота дают `None`.
pub fn fold_led_event(state: IndicatorState, event: &InputEvent) -> Option<IndicatorState> {
    if event.event_type() != EventType::LED {
        return None;
    }

    let slot = slot_for_led(LedCode(event.code()))?;
    Some(state.with(slot, event.value() != 0))
}

pub fn state_from_leds(leds: &AttributeSetRef<LedCode>) -> IndicatorState {
    leds.iter()
        .filter_map(slot_for_led)
        .fold(IndicatorState::default(), |state, slot| state.with(slot, true))
}
