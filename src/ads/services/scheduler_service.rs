//! 调度服务模块
//!
//! 负责五个投放节奏的定时任务创建与注册, 与具体任务逻辑解耦。
//! 每个节奏相互独立, 任何一个失败都不影响其它节奏的后续触发。

use std::sync::Arc;
use std::time::Duration;

use tokio_cron_scheduler::Job;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::ads::task;
use crate::ads::AdsEngine;

/// 调度器服务错误类型
#[derive(thiserror::Error, Debug)]
pub enum SchedulerServiceError {
    #[error("调度器未初始化")]
    NotInitialized,

    #[error("任务创建失败: {reason}")]
    JobCreationFailed { reason: String },

    #[error("任务注册失败: {reason}")]
    JobRegistrationFailed { reason: String },
}

/// 投放节奏。每个节奏一个独立定时器, 幂等(漏跑/重跑都安全)。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// 每小时: 出价优化
    HourlyOptimization,
    /// 每天 09:00: 表现检查(含前一天数据同步)
    DailyCheck,
    /// 每周一 09:00: 表现汇总发负责人
    WeeklySummary,
    /// 每月25日 09:00: 下月预算提案
    MonthlyProposal,
    /// 每月1日 09:00: 月末总结报告
    MonthEndReport,
}

impl Cadence {
    pub const ALL: [Cadence; 5] = [
        Cadence::HourlyOptimization,
        Cadence::DailyCheck,
        Cadence::WeeklySummary,
        Cadence::MonthlyProposal,
        Cadence::MonthEndReport,
    ];

    /// 任务唯一标识, 也是跨实例互斥锁的key
    pub fn task_key(&self) -> &'static str {
        match self {
            Cadence::HourlyOptimization => "hourly-optimization",
            Cadence::DailyCheck => "daily-check",
            Cadence::WeeklySummary => "weekly-summary",
            Cadence::MonthlyProposal => "monthly-proposal",
            Cadence::MonthEndReport => "month-end-report",
        }
    }

    /// 互斥锁租约时长(秒)。取节奏周期以内的值, 崩溃后锁能自动过期。
    pub fn lock_ttl_secs(&self) -> u64 {
        match self {
            Cadence::HourlyOptimization => 3300,
            _ => 3600,
        }
    }

    pub fn from_key(key: &str) -> Option<Cadence> {
        Cadence::ALL.iter().copied().find(|c| c.task_key() == key)
    }

    /// 六段式cron表达式。秒位支持偏移, 避免整点惊群。
    pub fn cron_expression(&self) -> String {
        let offset_sec: u64 = std::env::var("ADS_CRON_OFFSET_SEC")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(|v| v.min(59))
            .unwrap_or(5);
        let sec = offset_sec.to_string();

        match self {
            Cadence::HourlyOptimization => format!("{} 0 * * * *", sec),
            Cadence::DailyCheck => format!("{} 0 9 * * *", sec),
            Cadence::WeeklySummary => format!("{} 0 9 * * Mon", sec),
            Cadence::MonthlyProposal => format!("{} 0 9 25 * *", sec),
            Cadence::MonthEndReport => format!("{} 0 9 1 * *", sec),
        }
    }
}

/// 广告任务调度器
pub struct AdsJobScheduler;

impl AdsJobScheduler {
    const MAX_RETRY_ATTEMPTS: u32 = 3;
    const RETRY_DELAY_MS: u64 = 100;

    /// 创建定时任务。任务体内部自带锁与错误兜底,
    /// 这里只负责把节奏挂到cron上。
    pub fn create_scheduled_job(
        cadence: Cadence,
        engine: Arc<AdsEngine>,
    ) -> Result<Job, SchedulerServiceError> {
        let cron_expression = cadence.cron_expression();
        debug!(
            "创建定时任务: cadence={}, cron={}",
            cadence.task_key(),
            cron_expression
        );

        let job = Job::new_async(cron_expression.as_str(), move |_uuid, _lock| {
            let engine = Arc::clone(&engine);
            Box::pin(async move {
                task::run_cadence(cadence, engine.as_ref()).await;
            })
        })
        .map_err(|e| SchedulerServiceError::JobCreationFailed {
            reason: format!("创建定时任务失败: {}", e),
        })?;

        debug!("定时任务创建成功: {}", job.guid());
        Ok(job)
    }

    /// 注册任务到调度器(带重试机制)
    pub async fn register_job(job: Job) -> Result<Uuid, SchedulerServiceError> {
        let job_id = job.guid();

        for attempt in 1..=Self::MAX_RETRY_ATTEMPTS {
            match Self::try_register_job(job.clone()).await {
                Ok(_) => {
                    info!("任务注册成功: {} (尝试次数: {})", job_id, attempt);
                    return Ok(job_id);
                }
                Err(e) if attempt < Self::MAX_RETRY_ATTEMPTS => {
                    warn!("任务注册失败, 第{}次重试: {}", attempt, e);
                    tokio::time::sleep(Duration::from_millis(
                        Self::RETRY_DELAY_MS * attempt as u64,
                    ))
                    .await;
                }
                Err(e) => {
                    error!("任务注册最终失败: {}", e);
                    return Err(e);
                }
            }
        }

        Err(SchedulerServiceError::JobRegistrationFailed {
            reason: "达到最大重试次数".to_string(),
        })
    }

    /// 尝试注册任务(单次)
    async fn try_register_job(job: Job) -> Result<(), SchedulerServiceError> {
        let scheduler_guard = crate::SCHEDULER.lock().await;
        let scheduler = scheduler_guard
            .as_ref()
            .ok_or(SchedulerServiceError::NotInitialized)?;

        scheduler
            .add(job)
            .await
            .map_err(|e| SchedulerServiceError::JobRegistrationFailed {
                reason: format!("添加任务到调度器失败: {}", e),
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_keys_unique() {
        let mut keys: Vec<&str> = Cadence::ALL.iter().map(|c| c.task_key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), Cadence::ALL.len());
    }

    #[test]
    fn test_from_key_round_trip() {
        for cadence in Cadence::ALL {
            assert_eq!(Cadence::from_key(cadence.task_key()), Some(cadence));
        }
        assert_eq!(Cadence::from_key("no-such-task"), None);
    }

    #[test]
    fn test_cron_expressions() {
        std::env::remove_var("ADS_CRON_OFFSET_SEC");
        assert_eq!(
            Cadence::HourlyOptimization.cron_expression(),
            "5 0 * * * *"
        );
        assert_eq!(Cadence::MonthlyProposal.cron_expression(), "5 0 9 25 * *");
        assert_eq!(Cadence::MonthEndReport.cron_expression(), "5 0 9 1 * *");
    }
}
