use tracing::{error, info};

use crate::ads::services::scheduler_service::Cadence;
use crate::ads::AdsEngine;

pub mod budget_job;
pub mod optimize_job;
pub mod report_job;
pub mod task_lock;

use task_lock::{AcquireOutcome, TaskLock};

/// 调度器的统一入口: 抢锁 -> 执行 -> 无条件释放。
/// 单个节奏的失败只记录日志, 绝不抛出调度器顶层循环。
pub async fn run_cadence(cadence: Cadence, engine: &AdsEngine) {
    let key = cadence.task_key();
    match TaskLock::acquire(key, cadence.lock_ttl_secs()).await {
        AcquireOutcome::Acquired(lock) => {
            let result = dispatch(cadence, engine).await;
            if let Err(e) = result {
                error!("定时任务执行失败 {}: {}", key, e);
            }
            lock.release().await;
        }
        AcquireOutcome::Held => {
            info!("任务锁被其他实例持有, 本轮跳过: {}", key);
        }
    }
}

async fn dispatch(cadence: Cadence, engine: &AdsEngine) -> anyhow::Result<()> {
    match cadence {
        Cadence::HourlyOptimization => optimize_job::run_hourly_optimization(engine).await,
        Cadence::DailyCheck => report_job::run_daily_performance_check(engine).await,
        Cadence::WeeklySummary => report_job::send_weekly_performance_summary(engine).await,
        Cadence::MonthlyProposal => budget_job::request_monthly_budget_approval(engine).await,
        Cadence::MonthEndReport => report_job::generate_month_end_report(engine).await,
    }
}
