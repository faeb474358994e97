use crate::settings::LoggingSettings;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "homeswap.log";

/// Installs the global tracing subscriber.
///
/// Console output always goes to stderr so stdout stays clean for CSV and JSON.
/// If `settings.directory` is set, a second layer writes to a daily-rolling file;
/// the returned guard must be held until exit or buffered lines are lost.
///
/// Calling this twice is harmless: the second install is ignored.
pub fn init_tracing(settings: &LoggingSettings) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let console = fmt::layer().with_writer(std::io::stderr).with_target(false);

    match &settings.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file = fmt::layer().with_writer(writer).with_ansi(false);
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(file)
                .try_init();
            Some(guard)
        }
        None => {
            let _ = tracing_subscriber::registry().with(filter).with(console).try_init();
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_sink_returns_a_guard() {
        let dir = tempfile::tempdir().unwrap();
        let settings = LoggingSettings {
            level: "debug".to_string(),
            directory: Some(dir.path().to_path_buf()),
        };
        let guard = init_tracing(&settings);
        assert!(guard.is_some());
        tracing::info!("written to the rolling file");
    }
}
