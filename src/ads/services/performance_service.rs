use anyhow::Result;
use chrono::Utc;
use serde::Serialize;

use crate::ads::model::campaign::CampaignEntity;
use crate::ads::model::performance::PerformanceModel;
use crate::ads::{format_cents, format_cents_f};
use crate::time_util;

/// 窗口内聚合出的活动表现指标。金额为分。
#[derive(Debug, Clone, Serialize)]
pub struct CampaignPerformance {
    pub impressions: i64,
    pub clicks: i64,
    pub cost_cents: i64,
    pub conversions: i64,
    /// 点击率(百分比)
    pub ctr: f64,
    /// 单次点击成本(分)
    pub cpc_cents: f64,
    /// 单条线索成本(分)
    pub cost_per_lead_cents: f64,
    /// 转化率(百分比)
    pub conversion_rate: f64,
}

impl CampaignPerformance {
    /// 从原始汇总派生指标。除零场景一律取0。
    pub fn from_totals(impressions: i64, clicks: i64, cost_cents: i64, conversions: i64) -> Self {
        let ctr = if clicks > 0 && impressions > 0 {
            clicks as f64 / impressions as f64 * 100.0
        } else {
            0.0
        };
        let cpc_cents = if clicks > 0 {
            cost_cents as f64 / clicks as f64
        } else {
            0.0
        };
        let cost_per_lead_cents = if conversions > 0 {
            cost_cents as f64 / conversions as f64
        } else {
            0.0
        };
        let conversion_rate = if clicks > 0 {
            conversions as f64 / clicks as f64 * 100.0
        } else {
            0.0
        };
        Self {
            impressions,
            clicks,
            cost_cents,
            conversions,
            ctr,
            cpc_cents,
            cost_per_lead_cents,
            conversion_rate,
        }
    }
}

/// 聚合单个活动最近 days 天的表现。
/// 窗口内没有任何行时返回 None — 调用方必须把它当"无数据",
/// 而不是零花费。纯读取, 无副作用。
pub async fn get_campaign_performance(
    campaign_id: i64,
    days: i64,
) -> Result<Option<CampaignPerformance>> {
    let from_date = time_util::days_ago(&Utc::now(), days);
    let totals = PerformanceModel::new()
        .await
        .sum_since(campaign_id, &from_date)
        .await?;
    if totals.row_count == 0 {
        return Ok(None);
    }
    Ok(Some(CampaignPerformance::from_totals(
        totals.impressions,
        totals.clicks,
        totals.cost_cents,
        totals.conversions,
    )))
}

/// 渲染单个活动的文本报告(发给负责人的通知正文片段)
pub fn render_campaign_report(
    campaign: &CampaignEntity,
    perf: &CampaignPerformance,
    lookback_days: i64,
    avg_revenue_per_lead_cents: i64,
) -> String {
    let roi = if perf.conversions > 0 && perf.cost_cents > 0 {
        (perf.conversions as f64 * avg_revenue_per_lead_cents as f64 - perf.cost_cents as f64)
            / perf.cost_cents as f64
            * 100.0
    } else {
        0.0
    };

    format!(
        "Campaign: {}\n\
         Status: {}\n\
         Period: Last {} days\n\n\
         Performance:\n\
         - Impressions: {}\n\
         - Clicks: {}\n\
         - CTR: {:.2}%\n\
         - Cost: {}\n\
         - Conversions: {}\n\
         - Cost per Lead: {}\n\
         - Conversion Rate: {:.2}%\n\
         - ROI: {}\n\n\
         Budget:\n\
         - Daily Budget: {}\n\
         - Monthly Budget: {}\n\
         - Target Cost per Lead: {}",
        campaign.name,
        campaign.status,
        lookback_days,
        perf.impressions,
        perf.clicks,
        perf.ctr,
        format_cents(perf.cost_cents),
        perf.conversions,
        if perf.cost_per_lead_cents > 0.0 {
            format_cents_f(perf.cost_per_lead_cents)
        } else {
            "N/A".to_string()
        },
        perf.conversion_rate,
        if roi > 0.0 {
            format!("{:.0}%", roi)
        } else {
            "N/A".to_string()
        },
        format_cents(campaign.daily_budget_cents),
        format_cents(campaign.monthly_budget_cents),
        format_cents(campaign.target_cost_per_lead_cents),
    )
}

/// 聚合30天窗口并渲染报告; 无数据时给出占位文案
pub async fn generate_campaign_report(
    campaign: &CampaignEntity,
    lookback_days: i64,
    avg_revenue_per_lead_cents: i64,
) -> Result<String> {
    let campaign_id = match campaign.id {
        Some(id) => id,
        None => return Ok(format!("Campaign {} has no local id", campaign.name)),
    };
    match get_campaign_performance(campaign_id, lookback_days).await? {
        Some(perf) => Ok(render_campaign_report(
            campaign,
            &perf,
            lookback_days,
            avg_revenue_per_lead_cents,
        )),
        None => Ok(format!(
            "Campaign: {}\nNo performance data available",
            campaign.name
        )),
    }
}
