use std::sync::Arc;

use rust_ads::ads::services::scheduler_service::{AdsJobScheduler, Cadence};
use rust_ads::ads::AdsEngine;

/// 五个节奏的cron表达式都能被调度器接受并完成注册
#[tokio::test]
async fn test_register_all_cadence_jobs() -> anyhow::Result<()> {
    rust_ads::init_scheduler().await?;
    let engine = Arc::new(AdsEngine::from_env());

    for cadence in Cadence::ALL {
        let job = AdsJobScheduler::create_scheduled_job(cadence, Arc::clone(&engine))?;
        AdsJobScheduler::register_job(job).await?;
    }

    rust_ads::shutdown_scheduler().await?;
    Ok(())
}
