use anyhow::Result;
use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, info, warn, Level};

use crate::ads::model::campaign::{CampaignEntity, CampaignModel, CampaignStatus};
use crate::ads::model::performance::{PerformanceEntity, PerformanceModel};
use crate::ads::services::performance_service;
use crate::ads::{format_cents, format_cents_f, AdsEngine};
use crate::app_config::email;
use crate::time_util;

/// 每日表现检查: 先把前一天的平台数据同步进库, 再输出30天报告。
pub async fn run_daily_performance_check(engine: &AdsEngine) -> Result<()> {
    let span = tracing::span!(Level::INFO, "run_daily_performance_check");
    let _enter = span.enter();

    // 同步失败不阻塞报表
    if let Err(e) = sync_yesterday_performance(engine).await {
        warn!("同步前一天表现数据失败: {}", e);
    }

    let campaigns = CampaignModel::new()
        .await
        .list_by_status(CampaignStatus::Active)
        .await?;
    if campaigns.is_empty() {
        info!("没有active状态的活动, 跳过每日检查");
        return Ok(());
    }

    let reports = collect_reports(engine, &campaigns).await;
    info!("每日广告表现检查完成\n{}", reports.join("\n\n---\n\n"));
    Ok(())
}

/// 拉取所有活动前一天的平台日报并写库, 首次写入时累加活动汇总。
/// 尽力而为: 单个活动失败只告警。
async fn sync_yesterday_performance(engine: &AdsEngine) -> Result<()> {
    let Some(platform) = engine.platform.as_ref() else {
        debug!("平台未配置, 跳过表现同步");
        return Ok(());
    };

    let yesterday = time_util::days_ago(&Utc::now(), 1);
    let campaigns = CampaignModel::new().await.list_all().await?;
    let performance_model = PerformanceModel::new().await;
    let campaign_model = CampaignModel::new().await;

    for campaign in &campaigns {
        let (Some(campaign_id), Some(external_id)) = (campaign.id, campaign.external_id.as_deref())
        else {
            continue;
        };
        match platform.fetch_daily_stats(external_id, &yesterday).await {
            Ok(Some(stats)) => {
                let row = PerformanceEntity {
                    id: None,
                    campaign_id,
                    date: yesterday.clone(),
                    impressions: stats.impressions,
                    clicks: stats.clicks,
                    // 平台上报微单位, 入库统一转成分
                    cost_cents: stats.cost_micros / 10_000,
                    conversions: stats.conversions,
                };
                match performance_model.upsert_daily(&row).await {
                    Ok(true) => {
                        if let Err(e) = campaign_model
                            .bump_totals(
                                campaign_id,
                                row.impressions,
                                row.clicks,
                                row.cost_cents,
                                row.conversions,
                            )
                            .await
                        {
                            warn!("累加活动汇总失败 {}: {}", campaign.name, e);
                        }
                    }
                    Ok(false) => debug!("{} 当日数据已存在, 覆盖更新", campaign.name),
                    Err(e) => warn!("写入日报失败 {}: {}", campaign.name, e),
                }
            }
            Ok(None) => debug!("{} 前一天没有平台数据", campaign.name),
            Err(e) => warn!("拉取平台日报失败 {}: {}", campaign.name, e),
        }
    }
    Ok(())
}

async fn collect_reports(engine: &AdsEngine, campaigns: &[CampaignEntity]) -> Vec<String> {
    let futures = campaigns.iter().map(|campaign| {
        performance_service::generate_campaign_report(
            campaign,
            engine.engine_cfg.report_lookback_days,
            engine.engine_cfg.avg_revenue_per_lead_cents,
        )
    });
    join_all(futures)
        .await
        .into_iter()
        .zip(campaigns)
        .filter_map(|(result, campaign)| match result {
            Ok(report) => Some(report),
            Err(e) => {
                warn!("生成报告失败 {}: {}", campaign.name, e);
                None
            }
        })
        .collect()
}

/// 每周表现汇总, 通过通知渠道推给负责人。
/// 发送失败只记录, 不算任务失败。
pub async fn send_weekly_performance_summary(engine: &AdsEngine) -> Result<()> {
    let span = tracing::span!(Level::INFO, "send_weekly_performance_summary");
    let _enter = span.enter();

    let campaigns = CampaignModel::new()
        .await
        .list_by_status(CampaignStatus::Active)
        .await?;
    if campaigns.is_empty() {
        info!("没有active状态的活动, 跳过周报");
        return Ok(());
    }

    let reports = collect_reports(engine, &campaigns).await;
    let summary = format!(
        "Weekly Ad Performance Summary\n\n{}\n\n\
         This is an automated weekly summary. No action required.\n\
         View detailed metrics in your admin dashboard.",
        reports.join("\n\n---\n\n")
    );

    let sent = email::send_email("Weekly Ad Performance Summary", summary).await;
    if sent {
        info!("周报已发送");
    } else {
        warn!("周报发送失败");
    }
    Ok(())
}

/// ROI 分档给出下月方向性建议
pub fn month_end_recommendation(roi_percent: f64) -> &'static str {
    if roi_percent > 200.0 {
        "Increase budget by 20% to scale winning campaigns"
    } else if roi_percent > 100.0 {
        "Maintain current budget and continue optimization"
    } else {
        "Reduce budget by 20% and focus on improving conversion rates"
    }
}

/// 月末总结: 全部活动的累计数据 + 综合线索成本 + ROI + 下月建议。
pub async fn generate_month_end_report(engine: &AdsEngine) -> Result<()> {
    let span = tracing::span!(Level::INFO, "generate_month_end_report");
    let _enter = span.enter();

    let campaigns = CampaignModel::new().await.list_all().await?;
    if campaigns.is_empty() {
        info!("没有任何活动, 跳过月末报告");
        return Ok(());
    }

    let total_spent_cents: i64 = campaigns.iter().map(|c| c.total_spent_cents).sum();
    let total_conversions: i64 = campaigns.iter().map(|c| c.total_conversions).sum();

    let avg_cost_per_lead_cents = if total_conversions > 0 {
        total_spent_cents as f64 / total_conversions as f64
    } else {
        0.0
    };
    let projected_revenue_cents =
        total_conversions * engine.engine_cfg.avg_revenue_per_lead_cents;
    let roi = if total_spent_cents > 0 {
        (projected_revenue_cents as f64 - total_spent_cents as f64) / total_spent_cents as f64
            * 100.0
    } else {
        0.0
    };

    let reports = collect_reports(engine, &campaigns).await;
    let summary = format!(
        "Monthly Ad Performance Report\n\n\
         Overall Performance:\n\
         - Total Spent: {}\n\
         - Total Leads Generated: {}\n\
         - Average Cost per Lead: {}\n\
         - Projected Revenue: {}\n\
         - ROI: {:.0}%\n\n\
         Campaign Details:\n{}\n\n\
         Recommendation for Next Month:\n{}",
        format_cents(total_spent_cents),
        total_conversions,
        if avg_cost_per_lead_cents > 0.0 {
            format_cents_f(avg_cost_per_lead_cents)
        } else {
            "N/A".to_string()
        },
        format_cents(projected_revenue_cents),
        roi,
        reports.join("\n\n---\n\n"),
        month_end_recommendation(roi)
    );

    let sent = email::send_email("Monthly Ad Performance Report", summary).await;
    if sent {
        info!("月末报告已发送");
    } else {
        warn!("月末报告发送失败");
    }
    Ok(())
}
