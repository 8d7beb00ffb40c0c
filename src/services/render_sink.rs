use crate::config::OutputConfig;
use crate::error::{KbledError, Result};
use crate::events::Slot;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Получатель смен иконок. Сам файлы не читает: только передаёт путь дальше.
pub trait RenderSink {
    fn render(&mut self, slot: Slot, is_on: bool, icon: &Path) -> Result<()>;
}

/// Сообщает о смене иконки через tracing
#[derive(Debug, Default)]
pub struct LogRenderSink;

impl RenderSink for LogRenderSink {
    fn render(&mut self, slot: Slot, is_on: bool, icon: &Path) -> Result<()> {
        info!(
            "{}: {} ({})",
            slot,
            if is_on { "включён" } else { "выключен" },
            icon.display()
        );
        Ok(())
    }
}

/// Строка на каждое изменение: `<stem> <on|off> <path>`, для панелей и скриптов
pub struct StdoutRenderSink<W: Write> {
    out: W,
}

impl<W: Write> StdoutRenderSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[allow(dead_code)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSink for StdoutRenderSink<W> {
    fn render(&mut self, slot: Slot, is_on: bool, icon: &Path) -> Result<()> {
        writeln!(
            self.out,
            "{} {} {}",
            slot.icon_stem(),
            if is_on { "on" } else { "off" },
            icon.display()
        )?;
        self.out.flush()?;
        Ok(())
    }
}

/// Factory function to create the render sink selected by `output.mode`
pub fn create_render_sink(config: &OutputConfig) -> Result<Box<dyn RenderSink + Send>> {
    match config.mode.as_str() {
        "log" => Ok(Box::new(LogRenderSink)),
        "stdout" => Ok(Box::new(StdoutRenderSink::new(std::io::stdout()))),
        other => Err(KbledError::Internal(format!(
            "Неизвестный режим вывода: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stdout_sink_line_format() {
        let mut sink = StdoutRenderSink::new(Vec::new());
        sink.render(Slot::ScrollLock, true, Path::new("/img/scrllock-on.png"))
            .unwrap();
        sink.render(Slot::CapsLock, false, Path::new("/img/capslock-off.png"))
            .unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            text,
            "scrllock on /img/scrllock-on.png\ncapslock off /img/capslock-off.png\n"
        );
    }

    #[test]
    fn test_log_sink_never_fails() {
        let mut sink = LogRenderSink;
        assert!(sink.render(Slot::NumLock, true, Path::new("numlock-on.png")).is_ok());
    }

    #[test]
    fn test_factory_rejects_unknown_mode() {
        let config = OutputConfig {
            mode: "gtk".to_string(),
        };
        assert!(create_render_sink(&config).is_err());

        let config = OutputConfig {
            mode: "stdout".to_string(),
        };
        assert!(create_render_sink(&config).is_ok());
    }
}
