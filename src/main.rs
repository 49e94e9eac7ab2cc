use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing::info;

use rust_ads::ads::services::campaign_service;
use rust_ads::ads::services::scheduler_service::{AdsJobScheduler, Cadence};
use rust_ads::ads::{task, AdsEngine};

/// 自动化广告投放治理引擎
#[derive(Parser, Debug)]
#[command(name = "rust_ads")]
struct Args {
    /// 立即执行一次指定任务后退出:
    /// hourly-optimization | daily-check | weekly-summary | monthly-proposal | month-end-report
    #[arg(long)]
    job: Option<String>,

    /// 立即创建一个活动后退出, 参数为月度预算(分)
    #[arg(long)]
    create_campaign: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    rust_ads::app_init().await?;
    let engine = Arc::new(AdsEngine::from_env());

    // 手动触发模式: 跑一次就退出, 方便运维验证
    if let Some(job) = args.job.as_deref() {
        let cadence = Cadence::from_key(job)
            .ok_or_else(|| anyhow!("未知任务: {} (可选: {:?})", job, Cadence::ALL.map(|c| c.task_key())))?;
        info!("手动执行任务: {}", job);
        task::run_cadence(cadence, engine.as_ref()).await;
        return Ok(());
    }
    if let Some(monthly_budget_cents) = args.create_campaign {
        let local_id =
            campaign_service::create_campaign(engine.as_ref(), monthly_budget_cents).await?;
        info!("活动已创建, 本地ID: {}", local_id);
        return Ok(());
    }

    // 常驻模式: 注册五个投放节奏
    rust_ads::init_scheduler().await?;
    for cadence in Cadence::ALL {
        let job = AdsJobScheduler::create_scheduled_job(cadence, Arc::clone(&engine))?;
        AdsJobScheduler::register_job(job).await?;
        info!("已注册定时任务: {} ({})", cadence.task_key(), cadence.cron_expression());
    }
    info!("广告投放引擎已启动");

    // 捕捉Ctrl+C信号以平滑关闭
    tokio::signal::ctrl_c().await?;
    rust_ads::shutdown_scheduler().await?;

    Ok(())
}
