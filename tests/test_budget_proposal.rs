use rust_ads::ads::task::budget_job;
use rust_ads::ads::AdsEngine;

/// 同月重复执行预算提案, 只会产生一条 pending 记录。
/// 依赖真实数据库, 本地没有配置时直接跳过。
#[tokio::test]
async fn test_monthly_proposal_idempotent() -> anyhow::Result<()> {
    if let Err(e) = rust_ads::app_init().await {
        eprintln!("应用初始化失败, 跳过集成测试: {}", e);
        return Ok(());
    }

    let engine = AdsEngine::from_env();
    budget_job::request_monthly_budget_approval(&engine).await?;
    budget_job::request_monthly_budget_approval(&engine).await?;

    let next_month = rust_ads::time_util::next_month_start(&chrono::Utc::now());
    let count: u64 = rust_ads::app_config::db::get_db_client()
        .query_decode(
            "SELECT COUNT(1) FROM ad_budget_approval WHERE month = ? AND status = 'pending'",
            vec![next_month.into()],
        )
        .await?;
    assert_eq!(count, 1, "同月只允许一条pending预算提案");
    Ok(())
}
