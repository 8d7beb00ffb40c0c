use crate::error::{KbledError, Result};
use evdev::{KeyCode, LedCode};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub struct DeviceFinder;

impl DeviceFinder {
    /// Найти клавиатуру со светодиодами индикаторов
    pub fn find_keyboard_device(device_path: &str) -> Result<PathBuf> {
        if device_path != "auto" {
            let path = PathBuf::from(device_path);
            return if path.exists() {
                info!("Используется указанное устройство: {:?}", path);
                Ok(path)
            } else {
                KbledError::device_not_found(format!("Указанное устройство не найдено: {:?}", path))
            };
        }

        Self::auto_find_keyboard()
    }

    fn auto_find_keyboard() -> Result<PathBuf> {
        info!("Начинаем автопоиск клавиатуры со светодиодами...");

        if let Ok(device) = Self::find_by_id() {
            info!("Найдено устройство по ID: {:?}", device);
            return Ok(device);
        }

        if let Ok(device) = Self::find_by_event_devices() {
            info!("Найдено устройство среди event устройств: {:?}", device);
            return Ok(device);
        }

        KbledError::device_not_found(
            "Не удалось найти клавиатуру со светодиодами CapsLock/NumLock/ScrollLock. \
             Убедитесь, что пользователь добавлен в группу 'input'",
        )
    }

    fn find_by_id() -> Result<PathBuf> {
        let by_id_dir = Path::new("/dev/input/by-id");

        if !by_id_dir.exists() {
            debug!("Директория /dev/input/by-id не существует");
            return KbledError::device_not_found("Директория by-id не найдена");
        }

        let mut candidates = Self::list_dir(by_id_dir)?
            .into_iter()
            .filter(|path| Self::file_name(path).ends_with("event-kbd"))
            .collect::<Vec<_>>();
        candidates.sort();

        candidates
            .into_iter()
            .find(|path| Self::is_led_keyboard(path))
            .ok_or_else(|| {
                KbledError::DeviceNotFound("Клавиатура со светодиодами не найдена в by-id".to_string())
            })
    }

    fn find_by_event_devices() -> Result<PathBuf> {
        let mut event_devices = Self::list_dir(Path::new("/dev/input"))?
            .into_iter()
            .filter(|path| Self::file_name(path).starts_with("event"))
            .collect::<Vec<_>>();
        event_devices.sort();

        event_devices
            .into_iter()
            .find(|path| Self::is_led_keyboard(path))
            .ok_or_else(|| {
                KbledError::DeviceNotFound(
                    "Не найдена клавиатура со светодиодами среди event устройств".to_string(),
                )
            })
    }

    fn list_dir(dir: &Path) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(dir)
            .map_err(|e| KbledError::Permission(format!("Нет доступа к {:?}: {}", dir, e)))?;

        let mut paths = Vec::new();
        for entry in entries {
            paths.push(entry?.path());
        }
        Ok(paths)
    }

    fn file_name(path: &Path) -> &str {
        path.file_name().and_then(|n| n.to_str()).unwrap_or("")
    }

    fn is_led_keyboard(device_path: &Path) -> bool {
        let device = match evdev::Device::open(device_path) {
            Ok(device) => device,
            Err(e) => {
                debug!("Не удалось открыть устройство {:?}: {}", device_path, e);
                return false;
            }
        };

        let has_keys = device.supported_keys().map_or(false, |keys| {
            keys.contains(KeyCode::KEY_CAPSLOCK)
                && keys.contains(KeyCode::KEY_NUMLOCK)
                && keys.contains(KeyCode::KEY_A)
        });

        let has_leds = device.supported_leds().map_or(false, |leds| {
            leds.contains(LedCode::LED_CAPSL)
                && leds.contains(LedCode::LED_NUML)
                && leds.contains(LedCode::LED_SCROLLL)
        });

        match (has_keys, has_leds) {
            (true, true) => {
                info!(
                    "Устройство {:?} подходит ({})",
                    device_path,
                    device.name().unwrap_or("Unknown")
                );
                true
            }
            (true, false) => {
                warn!("Клавиатура {:?} без светодиодов индикаторов, пропускаем", device_path);
                false
            }
            _ => {
                debug!("Устройство {:?} не является клавиатурой", device_path);
                false
            }
        }
    }
}
