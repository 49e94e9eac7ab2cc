use std::env;

use once_cell::sync::OnceCell;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, FmtSubscriber};

// 日志写线程的guard必须活到进程结束, 否则落盘日志会丢
static LOG_GUARDS: OnceCell<Vec<WorkerGuard>> = OnceCell::new();
static LOG_INIT: OnceCell<()> = OnceCell::new();

/// 设置日志
pub fn setup_logging() -> anyhow::Result<()> {
    if LOG_INIT.get().is_some() {
        return Ok(());
    }

    // rbatis 等库走 log 门面
    let _ = env_logger::try_init();

    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "LOCAL".to_string());
    if app_env == "LOCAL" {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::INFO)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    } else {
        let info_file = RollingFileAppender::new(Rotation::DAILY, "log_files", "info.log");
        let error_file = RollingFileAppender::new(Rotation::DAILY, "log_files", "error.log");

        let (info_non_blocking, info_guard) = tracing_appender::non_blocking(info_file);
        let (error_non_blocking, error_guard) = tracing_appender::non_blocking(error_file);

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(info_non_blocking)
                    .with_filter(EnvFilter::new("info")),
            )
            .with(
                fmt::layer()
                    .with_writer(error_non_blocking)
                    .with_filter(EnvFilter::new("error")),
            )
            .try_init();

        let _ = LOG_GUARDS.set(vec![info_guard, error_guard]);
    }

    let _ = LOG_INIT.set(());
    Ok(())
}
