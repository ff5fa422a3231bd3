use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::config::schema::LoggingConfig;
use crate::utils::expand_tilde;

const LOG_FILE_PREFIX: &str = "statefulchat.log";
const RETENTION_DAYS: u64 = 7;

/// Initialize the logging system.
///
/// Diagnostics go to a daily-rolling file and, if enabled, to stderr.
/// Stdout is left to the interactive surface.
pub fn init_logging(config: &LoggingConfig) -> WorkerGuard {
    // 1. Log Level
    let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| config.level.clone());

    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level_str));

    for (module, level) in &config.overrides {
        if let Ok(directive) = format!("{}={}", module, level).parse() {
            filter = filter.add_directive(directive);
        } else {
            eprintln!("Invalid log directive: {}={}", module, level);
        }
    }

    // 2. Log Format
    let format_str = std::env::var("LOG_FORMAT").unwrap_or_else(|_| config.format.clone());
    let is_json = format_str.to_lowercase() == "json";

    // 3. File Appender, produces statefulchat.log.YYYY-MM-DD
    let log_dir = expand_tilde(&config.dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // 4. Layers
    let file_layer = if is_json {
        fmt::layer()
            .json()
            .with_writer(non_blocking)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    let stderr_layer = config.stderr.then(|| {
        if is_json {
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .boxed()
        } else {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .boxed()
        }
    });

    // 5. Init Subscriber
    let result = Registry::default()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init();
    if let Err(e) = result {
        eprintln!("Logging already initialized: {}", e);
    }

    // 6. Cleanup old logs
    if let Err(e) = cleanup_old_logs(&log_dir, RETENTION_DAYS) {
        eprintln!("Failed to clean up old logs: {}", e);
    }

    guard
}

/// Remove diagnostic log files older than `days` days
fn cleanup_old_logs(dir: &Path, days: u64) -> std::io::Result<()> {
    if !dir.exists() {
        return Ok(());
    }

    let now = std::time::SystemTime::now();
    let threshold = std::time::Duration::from_secs(days * 24 * 3600);

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let is_ours = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.starts_with(LOG_FILE_PREFIX));
        if !is_ours {
            continue;
        }

        let age = entry
            .metadata()
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| now.duration_since(modified).ok());
        if age.is_some_and(|age| age > threshold) {
            if let Err(e) = std::fs::remove_file(&path) {
                eprintln!("Failed to remove old log file {:?}: {}", path, e);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    #[test]
    fn test_cleanup_removes_only_stale_diagnostics() {
        let temp_dir = TempDir::new().unwrap();
        let stale = temp_dir.path().join("statefulchat.log.2020-01-01");
        let fresh = temp_dir.path().join("statefulchat.log.2099-01-01");
        let audit = temp_dir.path().join("log_2020-01-01_00-00-00.txt");
        for path in [&stale, &fresh, &audit] {
            File::create(path).unwrap();
        }
        let long_ago = SystemTime::now() - Duration::from_secs(30 * 24 * 3600);
        for path in [&stale, &audit] {
            File::options()
                .write(true)
                .open(path)
                .unwrap()
                .set_modified(long_ago)
                .unwrap();
        }

        cleanup_old_logs(temp_dir.path(), 7).unwrap();

        assert!(!stale.exists());
        assert!(fresh.exists());
        assert!(audit.exists());
    }

    #[test]
    fn test_cleanup_ignores_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        assert!(cleanup_old_logs(&temp_dir.path().join("nope"), 7).is_ok());
    }
}
