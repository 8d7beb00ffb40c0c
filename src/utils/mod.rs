pub mod device_finder;
pub mod permissions;

pub use device_finder::DeviceFinder;

/// debug! только при включённом уровне DEBUG: форматирование состояния
/// индикаторов не выполняется на каждом событии, если оно никому не нужно
#[macro_export]
macro_rules! debug_if_enabled {
    ($($arg:tt)*) => {
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!($($arg)*);
        }
    };
}
