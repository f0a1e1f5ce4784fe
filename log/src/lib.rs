//! Logging setup for ry: a log file that is always written, plus stdout when
//! asked for.
//!
//! ## Environment Variables
//!
//! 1. **`RY_LOG`** (highest priority). A bare level such as `debug` applies to
//!    every ry crate; anything with `=`, `:` or `,` is used as a filter as-is.
//! 2. **`RUST_LOG`**, used as-is.
//! 3. **Default**: `warn` globally, `info` for ry crates.
//!
//! Without either variable the file only receives warnings, and stdout is
//! silent in release builds.
//!
//! ## Log File Location
//!
//! Default: `<data_local_dir>/ry/logs/ry-<pid>.log`, e.g.
//! `~/.local/share/ry/logs/ry-12345.log` on Linux. A path with an extension
//! names the file itself, any other path names the directory.

use std::{
    env,
    error::Error,
    path::{Path, PathBuf},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

type BoxError = Box<dyn Error + Send + Sync>;

const CRATES: [&str; 4] = ["ry", "ry_text", "ry_config", "ry_bin"];

/// Returned from [`init`]. Dropping it flushes and stops the file writer.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

#[derive(Debug, Default, Clone)]
pub struct LogConfig {
    pub log_file: Option<PathBuf>,
    /// Forces the stdout layer on or off instead of deciding from the
    /// environment.
    pub stdout: Option<bool>,
}

/// Installs the global subscriber.
pub fn init(config: LogConfig) -> Result<LogGuard, BoxError> {
    let (log_dir, filename) = resolve_log_path(config.log_file.as_deref());
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, &filename);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let ry_log = env::var("RY_LOG").ok();
    let rust_log = env::var("RUST_LOG").ok();
    let configured = ry_log.is_some() || rust_log.is_some();

    let file_directives = if configured {
        filter_directives(ry_log.as_deref(), rust_log.as_deref())
    } else {
        "warn".to_string()
    };
    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_filter(EnvFilter::try_new(file_directives)?);

    let stdout_layer = if config.stdout.unwrap_or(configured || cfg!(debug_assertions)) {
        let directives = filter_directives(ry_log.as_deref(), rust_log.as_deref());
        Some(fmt::layer().with_filter(EnvFilter::try_new(directives)?))
    } else {
        None
    };

    Registry::default()
        .with(file_layer)
        .with(stdout_layer)
        .try_init()?;

    Ok(LogGuard {
        _file_guard: file_guard,
        log_file: log_dir.join(filename),
    })
}

/// Stdout-only logging for tests. Safe to call from every test.
pub fn test() {
    let directives = filter_directives(
        env::var("RY_LOG").ok().as_deref(),
        env::var("RUST_LOG").ok().as_deref(),
    );
    if let Ok(filter) = EnvFilter::try_new(directives) {
        fmt().with_env_filter(filter).with_test_writer().try_init().ok();
    }
}

fn resolve_log_path(path: Option<&Path>) -> (PathBuf, String) {
    let default_name = format!("ry-{}.log", std::process::id());

    match path {
        Some(path) if path.extension().is_some() => {
            let dir = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or(default_name);
            (dir.to_path_buf(), name)
        },
        Some(dir) => (dir.to_path_buf(), default_name),
        None => {
            let dir = dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("ry")
                .join("logs");
            (dir, default_name)
        },
    }
}

/// Filter directives for the given `RY_LOG` and `RUST_LOG` values.
fn filter_directives(ry_log: Option<&str>, rust_log: Option<&str>) -> String {
    match (ry_log, rust_log) {
        (Some(ry_log), _) if ry_log.contains(['=', ':', ',']) => ry_log.to_string(),
        (Some(level), _) => per_crate(level),
        (None, Some(rust_log)) => rust_log.to_string(),
        (None, None) => per_crate("info"),
    }
}

fn per_crate(level: &str) -> String {
    let mut directives = String::from("warn");
    for krate in CRATES {
        directives.push_str(&format!(",{krate}={level}"));
    }
    directives
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_is_info_for_ry_crates() {
        assert_eq!(
            filter_directives(None, None),
            "warn,ry=info,ry_text=info,ry_config=info,ry_bin=info"
        );
    }

    #[test]
    fn ry_log_level_expands_and_wins() {
        assert_eq!(
            filter_directives(Some("debug"), Some("trace")),
            "warn,ry=debug,ry_text=debug,ry_config=debug,ry_bin=debug"
        );
        assert_eq!(filter_directives(Some("ry_text=trace"), None), "ry_text=trace");
        assert_eq!(filter_directives(None, Some("error")), "error");
    }

    #[test]
    fn log_path_with_extension_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("session.log");
        assert_eq!(
            resolve_log_path(Some(&file)),
            (dir.path().to_path_buf(), "session.log".to_string())
        );

        let (resolved_dir, name) = resolve_log_path(Some(dir.path()));
        assert_eq!(resolved_dir, dir.path());
        assert!(name.starts_with("ry-") && name.ends_with(".log"));
    }

    #[test]
    fn bare_file_name_lands_in_current_dir() {
        let (dir, name) = resolve_log_path(Some(Path::new("ry.log")));
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, "ry.log");
    }
}
