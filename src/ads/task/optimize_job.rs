use anyhow::{anyhow, Result};
use tracing::{debug, error, info, warn, Level};

use crate::ads::model::campaign::{CampaignEntity, CampaignModel, CampaignStatus};
use crate::ads::services::{budget_service, campaign_service, performance_service};
use crate::ads::strategy::bid_adjustment::{self, BidAction};
use crate::ads::{format_cents, format_cents_f, AdsEngine};
use crate::error::AppError;

/// 每小时的出价优化。
/// 当日花费触顶时整轮静默跳过 — 这是刻意的熔断, 不是错误。
pub async fn run_hourly_optimization(engine: &AdsEngine) -> Result<()> {
    let span = tracing::span!(Level::INFO, "run_hourly_optimization");
    let _enter = span.enter();

    if budget_service::is_daily_limit_reached().await? {
        info!("当日花费已达上限, 跳过本轮优化");
        return Ok(());
    }

    let campaigns = CampaignModel::new()
        .await
        .list_by_status(CampaignStatus::Active)
        .await?;
    if campaigns.is_empty() {
        info!("没有active状态的活动, 本轮无事可做");
        return Ok(());
    }
    info!("开始优化 {} 个活动", campaigns.len());

    // 单个活动失败不影响其他活动
    for campaign in &campaigns {
        if let Err(e) = optimize_campaign(engine, campaign).await {
            error!("优化活动失败 {}: {}", campaign.name, e);
        }
    }

    info!("本轮优化完成");
    Ok(())
}

async fn optimize_campaign(engine: &AdsEngine, campaign: &CampaignEntity) -> Result<()> {
    let campaign_id = campaign
        .id
        .ok_or_else(|| anyhow!("活动 {} 缺少本地ID", campaign.name))?;

    let perf = performance_service::get_campaign_performance(
        campaign_id,
        engine.optimization.lookback_days,
    )
    .await?;
    // 窗口内无数据等于"不知道", 不是零花费, 什么都不做
    let Some(perf) = perf else {
        debug!("活动 {} 窗口内无表现数据", campaign.name);
        return Ok(());
    };

    info!(
        "活动 {} 近{}天: clicks={}, conversions={}, cost={}, cpl={}, ctr={:.2}%",
        campaign.name,
        engine.optimization.lookback_days,
        perf.clicks,
        perf.conversions,
        format_cents(perf.cost_cents),
        if perf.cost_per_lead_cents > 0.0 {
            format_cents_f(perf.cost_per_lead_cents)
        } else {
            "N/A".to_string()
        },
        perf.ctr,
    );

    let decision = bid_adjustment::decide(
        &engine.optimization,
        perf.cost_per_lead_cents,
        perf.clicks,
    );
    debug!("出价决策 {}: {:?}", campaign.name, decision);

    match decision.action {
        // 只有暂停是机械执行的
        BidAction::Pause => {
            match campaign_service::set_campaign_status(engine, campaign, CampaignStatus::Paused)
                .await
            {
                Ok(()) => info!("已暂停活动 {}: {}", campaign.name, decision.reason),
                Err(AppError::PlatformNotConfigured) => {
                    warn!("平台未配置, 无法暂停活动 {}", campaign.name)
                }
                Err(e) => return Err(e.into()),
            }
        }
        // 涨跌出价没有可调用的出价级API, 仅作为人工信号输出
        BidAction::Increase => info!(
            "建议上调出价 {:.0}% [{}]: {}",
            decision.adjustment * 100.0,
            campaign.name,
            decision.reason
        ),
        BidAction::Decrease => info!(
            "建议下调出价 {:.0}% [{}]: {}",
            decision.adjustment * 100.0,
            campaign.name,
            decision.reason
        ),
        BidAction::Maintain => debug!("维持出价 [{}]: {}", campaign.name, decision.reason),
    }
    Ok(())
}
