//! # Rust Ads
//!
//! 自动化广告投放治理引擎: 把已批准的月度预算变成在投活动,
//! 持续评估表现并在无人干预下调整或停止花费。

use std::sync::Arc;

use anyhow::Result;
use dotenv::dotenv;
use once_cell::sync::Lazy;
use tokio::sync::Mutex;
use tokio_cron_scheduler::JobScheduler;
use tracing::info;

pub mod ads;
pub mod app_config;
pub mod error;
pub mod time_util;

/// 应用初始化
pub async fn app_init() -> Result<()> {
    // 加载环境变量
    dotenv().ok();

    // 设置日志
    app_config::log::setup_logging()?;

    // 初始化数据库连接并建表
    app_config::db::init_db().await?;
    ads::model::init_tables().await?;

    info!("应用初始化完成");
    Ok(())
}

/// 全局调度器
pub static SCHEDULER: Lazy<Arc<Mutex<Option<Arc<JobScheduler>>>>> =
    Lazy::new(|| Arc::new(Mutex::new(None)));

/// 初始化并启动调度器
pub async fn init_scheduler() -> Result<Arc<JobScheduler>> {
    let mut scheduler_opt = SCHEDULER.lock().await;

    if scheduler_opt.is_none() {
        let mut scheduler = JobScheduler::new().await?;
        scheduler.start().await?;
        let arc_scheduler = Arc::new(scheduler);
        *scheduler_opt = Some(Arc::clone(&arc_scheduler));
        return Ok(arc_scheduler);
    }

    Ok(Arc::clone(scheduler_opt.as_ref().unwrap()))
}

/// 关闭调度器
pub async fn shutdown_scheduler() -> Result<()> {
    info!("正在关闭调度器...");

    let mut scheduler_guard = SCHEDULER.lock().await;
    if scheduler_guard.take().is_some() {
        info!("调度器关闭完成");
    } else {
        info!("调度器未初始化, 跳过关闭");
    }

    Ok(())
}
