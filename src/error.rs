use thiserror::Error;

#[derive(Error, Debug)]
pub enum KbledError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Устройство не найдено: {0}")]
    DeviceNotFound(String),

    #[error("Недостаточно прав доступа: {0}")]
    Permission(String),

    #[error("Индикаторы клавиатуры недоступны: {0}")]
    ExtensionUnavailable(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl KbledError {
    pub fn device_not_found<T>(msg: impl Into<String>) -> Result<T> {
        Err(KbledError::DeviceNotFound(msg.into()))
    }
}

pub type Result<T> = std::result::Result<T, KbledError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! kbled_error {
    (device_not_found, $($arg:tt)*) => {
        $crate::error::KbledError::DeviceNotFound(format!($($arg)*))
    };
    (permission, $($arg:tt)*) => {
        $crate::error::KbledError::Permission(format!($($arg)*))
    };
    (extension_unavailable, $($arg:tt)*) => {
        $crate::error::KbledError::ExtensionUnavailable(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::KbledError::Internal(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_macro_formats_message() {
        let err = kbled_error!(extension_unavailable, "нет {} на {}", "LED_CAPSL", "/dev/input/event3");
        assert!(matches!(err, KbledError::ExtensionUnavailable(_)));
        assert_eq!(
            err.to_string(),
            "Индикаторы клавиатуры недоступны: нет LED_CAPSL на /dev/input/event3"
        );
    }

    #[test]
    fn test_device_not_found_helper() {
        let result: Result<()> = KbledError::device_not_found("event7");
        assert!(matches!(result, Err(KbledError::DeviceNotFound(ref m)) if m == "event7"));
    }
}
