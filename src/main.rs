use anyhow::Result;
use clap::Parser;
use std::future::Future;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
mod config;
mod error;
mod events;
mod services;
mod utils;

use config::Config;
use events::IndicatorState;
use services::{
    create_indicator_source,
    create_render_sink,
    IconSet,
    IndicatorDisplay,
    IndicatorStateTracker,
};

#[derive(Parser, Debug)]
#[command(name = "kbled")]
#[command(about = "Индикаторы CapsLock, NumLock и ScrollLock")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "kbled.toml")]
    config: String,

    /// Режим сухого запуска (индикаторы эмулируются)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (перекрывает logging.level)
    #[arg(long)]
    log_level: Option<String>,

    /// Отрисовать текущее состояние и завершиться
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Загрузка конфигурации
    let config = Arc::new(Config::load(&args.config)?);

    // Инициализация системы логирования
    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    init_tracing(level, &config.logging.format)?;

    info!("Запуск kbled v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - светодиоды эмулируются");
    } else {
        utils::permissions::check_permissions()?;
    }

    // Без индикаторов работать нечему: ошибка здесь фатальна
    let mut source = create_indicator_source(config.clone(), args.dry_run)?;
    let initial = source.query_state()?;
    info!("Начальное состояние индикаторов: {}", initial);

    let icons = IconSet::from_config(&config.icons);
    info!("Каталог иконок: {}", icons.dir().display());
    for path in icons.missing() {
        warn!("Иконка не найдена: {}", path.display());
    }

    let sink = create_render_sink(&config.output)?;
    let mut indicator_display =
        IndicatorDisplay::new(IndicatorStateTracker::new(initial), icons, sink);
    indicator_display.update(initial)?;

    if args.once {
        return Ok(());
    }

    let (tx, mut rx) = mpsc::channel(16);
    let source_handle = tokio::spawn(source.run(tx));

    info!("Ожидаем изменения индикаторов");

    let shutdown = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
            Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
        }
    };

    let stop = drive_display(&mut indicator_display, &mut rx, shutdown).await;
    let last = indicator_display.state();

    match stop {
        Stop::Shutdown => {
            info!("Завершение работы...");
            source_handle.abort();
            let _ = source_handle.await;
        }
        // Канал закрылся сам: источник завершился, его ошибка фатальна
        Stop::SourceClosed => wait_for_source(source_handle).await?,
    }

    info!("kbled завершил работу (последнее состояние: {})", last);
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Stop {
    Shutdown,
    SourceClosed,
}

/// Единственный потребитель состояний: обновления применяются по одному
async fn drive_display(
    indicator_display: &mut IndicatorDisplay,
    updates: &mut mpsc::Receiver<IndicatorState>,
    shutdown: impl Future<Output = ()>,
) -> Stop {
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => return Stop::Shutdown,
            state = updates.recv() => {
                let Some(state) = state else {
                    return Stop::SourceClosed;
                };
                if let Err(e) = indicator_display.update(state) {
                    error!("Ошибка отрисовки индикаторов: {}", e);
                }
            }
        }
    }
}

async fn wait_for_source(source_handle: JoinHandle<error::Result<()>>) -> Result<()> {
    match source_handle.await {
        Ok(Ok(())) => {
            warn!("Источник индикаторов остановился");
            Ok(())
        }
        Ok(Err(e)) => Err(anyhow::Error::new(e).context("Источник индикаторов завершился с ошибкой")),
        Err(e) => Err(anyhow::Error::new(e).context("Задача источника индикаторов прервана")),
    }
}

fn init_tracing(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    // Логи идут в stderr: stdout занят режимом output.mode = "stdout"
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        "full" => registry.with(fmt_layer).init(),
        _ => registry.with(fmt_layer.compact()).init(),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KbledError;
    use crate::services::render_sink::LogRenderSink;

    fn log_display(initial: u32) -> IndicatorDisplay {
        IndicatorDisplay::new(
            IndicatorStateTracker::new(IndicatorState::from_bits(initial)),
            IconSet::new("/img"),
            Box::new(LogRenderSink),
        )
    }

    #[tokio::test]
    async fn test_drive_applies_updates_until_source_closes() {
        let mut indicator_display = log_display(0);
        let (tx, mut rx) = mpsc::channel(4);
        tx.send(IndicatorState::from_bits(0b001)).await.unwrap();
        tx.send(IndicatorState::from_bits(0b011)).await.unwrap();
        drop(tx);

        let stop = drive_display(&mut indicator_display, &mut rx, std::future::pending()).await;

        assert_eq!(stop, Stop::SourceClosed);
        assert_eq!(indicator_display.state().bits(), 0b011);
    }

    #[tokio::test]
    async fn test_drive_stops_on_shutdown() {
        let mut indicator_display = log_display(0b100);
        let (_tx, mut rx) = mpsc::channel::<IndicatorState>(4);

        let stop = drive_display(&mut indicator_display, &mut rx, async {}).await;

        assert_eq!(stop, Stop::Shutdown);
        // Обновлений не было: трекер остаётся на дополнении начального состояния
        assert_eq!(
            indicator_display.state(),
            IndicatorState::from_bits(0b100).complement()
        );
    }

    #[tokio::test]
    async fn test_source_error_is_propagated() {
        let handle = tokio::spawn(async {
            Err::<(), _>(KbledError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "устройство отключено",
            )))
        });

        let err = wait_for_source(handle).await.unwrap_err();
        assert!(err.to_string().contains("Источник индикаторов"));
        assert!(matches!(err.downcast_ref::<KbledError>(), Some(KbledError::Io(_))));
    }

    #[tokio::test]
    async fn test_clean_source_exit_is_ok() {
        let handle = tokio::spawn(async { Ok::<(), KbledError>(()) });
        assert!(wait_for_source(handle).await.is_ok());
    }
}
