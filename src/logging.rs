//! File logging bootstrap.
//!
//! Logs go to `<data_dir>/logs/kakeibo_*.log`, rotated by size. Stdout stays
//! clean for command output. Initialization happens at most once per process;
//! a second call with the same directory is a no-op.

use std::path::{Path, PathBuf};

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;

use crate::error::{KakeiboError, Result};

const LOG_FILE_BASENAME: &str = "kakeibo";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;
const SUPPORTED_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    log_dir: PathBuf,
    _logger: LoggerHandle,
}

pub fn init_logging(level: &str, log_dir: &Path) -> Result<()> {
    let level = normalize_level(level)?;

    if let Some(state) = LOGGING_STATE.get() {
        if state.log_dir == log_dir {
            return Ok(());
        }
        return Err(KakeiboError::Logging(format!(
            "already logging to `{}`; refusing to switch to `{}`",
            state.log_dir.display(),
            log_dir.display()
        )));
    }

    LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState> {
        std::fs::create_dir_all(log_dir)?;

        let logger = Logger::try_with_str(level)
            .map_err(|e| KakeiboError::Logging(format!("invalid log level `{level}`: {e}")))?
            .log_to_file(
                FileSpec::default()
                    .directory(log_dir)
                    .basename(LOG_FILE_BASENAME),
            )
            .rotate(
                Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(MAX_LOG_FILES),
            )
            .write_mode(WriteMode::BufferAndFlush)
            .append()
            .format_for_files(flexi_logger::detailed_format)
            .start()
            .map_err(|e| KakeiboError::Logging(format!("failed to start logger: {e}")))?;

        info!(
            "event=app_start status=ok version={} level={level} log_dir={}",
            env!("CARGO_PKG_VERSION"),
            log_dir.display()
        );

        Ok(LoggingState {
            log_dir: log_dir.to_path_buf(),
            _logger: logger,
        })
    })?;

    Ok(())
}

fn normalize_level(level: &str) -> Result<&'static str> {
    let wanted = level.trim().to_ascii_lowercase();
    SUPPORTED_LEVELS
        .iter()
        .copied()
        .find(|l| *l == wanted)
        .ok_or_else(|| KakeiboError::Logging(format!("unsupported log level `{level}`")))
}
