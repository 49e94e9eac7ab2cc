use chrono::Utc;
use tracing::{info, warn};

use crate::ads::copywriter;
use crate::ads::format_cents;
use crate::ads::model::campaign::{CampaignEntity, CampaignModel, CampaignStatus};
use crate::ads::platform::campaigns::extract_id_from_resource_name;
use crate::ads::AdsEngine;
use crate::error::AppError;
use crate::time_util;

/// 创建流水线中单个步骤的失败策略。
/// 预算/活动/广告组/关键词/广告失败必须中止;
/// 地理定向失败只记录继续(事后可以人工补投)。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPolicy {
    AbortOnFailure,
    ContinueOnFailure,
}

/// 日预算微单位 = 月度预算(分) × 10_000 / 30, 向下取整
pub fn daily_budget_micros(monthly_budget_cents: i64) -> i64 {
    monthly_budget_cents * 10_000 / 30
}

/// 端到端创建一个广告活动:
/// 文案 -> 预算 -> 活动(强制paused) -> 地理定向 -> 广告组 -> 关键词 -> 广告。
/// 每步的资源名喂给下一步; 活动创建成功后立即落库,
/// 之后任何步骤失败都保留这条(paused的)记录供人工检查修复,
/// 已创建的平台资源不回滚。
pub async fn create_campaign(
    engine: &AdsEngine,
    monthly_budget_cents: i64,
) -> Result<i64, AppError> {
    let platform = engine
        .platform
        .as_ref()
        .ok_or(AppError::PlatformNotConfigured)?;

    info!("开始创建广告活动, 月度预算 {}", format_cents(monthly_budget_cents));

    // 1. 文案: 生成失败透明回退, 永远不是硬依赖
    let ad_copy = copywriter::generate_or_fallback(engine.copywriter.as_deref()).await;

    // 2. 预算
    let today = time_util::date_str(&Utc::now());
    let campaign_name = format!("Solar Leads - {}", today);
    let micros = daily_budget_micros(monthly_budget_cents);
    let budget_resource_name = platform
        .create_campaign_budget(&campaign_name, micros)
        .await?;

    // 3. 活动(平台侧强制 PAUSED)
    let campaign_resource_name = platform
        .create_campaign(
            &campaign_name,
            &budget_resource_name,
            engine.engine_cfg.target_cpa_cents * 10_000,
        )
        .await?;
    let external_id = extract_id_from_resource_name(&campaign_resource_name);

    // 平台侧活动已存在, 马上落库; 后续步骤失败也不删
    let entity = CampaignEntity {
        id: None,
        external_id: Some(external_id),
        name: campaign_name.clone(),
        status: CampaignStatus::Paused.as_str().to_string(),
        daily_budget_cents: monthly_budget_cents / 30,
        monthly_budget_cents,
        target_cost_per_lead_cents: engine.engine_cfg.target_cost_per_lead_cents,
        keywords: serde_json::to_string(&engine.template.keywords)
            .unwrap_or_else(|_| "[]".to_string()),
        ad_copy: serde_json::to_string(&ad_copy).unwrap_or_else(|_| "{}".to_string()),
        locations: serde_json::to_string(&engine.template.locations)
            .unwrap_or_else(|_| "[]".to_string()),
        total_spent_cents: 0,
        total_clicks: 0,
        total_impressions: 0,
        total_conversions: 0,
    };
    let local_id = CampaignModel::new()
        .await
        .add(&entity)
        .await
        .map_err(|e| AppError::DbError(e.to_string()))?;

    // 4. 地理定向: 逐个下发, 失败不影响整体
    for location in &engine.template.locations {
        let result = platform
            .add_location_targeting(&campaign_resource_name, &location.geo_target_constant)
            .await;
        apply_step_policy(StepPolicy::ContinueOnFailure, "地理定向", result)?;
    }

    // 5. 广告组
    let ad_group_resource_name = platform
        .create_ad_group(&campaign_resource_name, &format!("{} - Ad Group", campaign_name))
        .await?;

    // 6. 关键词 + 否定词
    platform
        .add_keywords(
            &ad_group_resource_name,
            &engine.template.keywords,
            &engine.template.negative_keywords,
        )
        .await?;

    // 7. 响应式搜索广告
    platform
        .create_responsive_search_ad(
            &ad_group_resource_name,
            &ad_copy,
            &engine.engine_cfg.final_url,
        )
        .await?;

    info!(
        "活动创建完成: {} (日预算 {}, 关键词 {} 个, 文案 {} 标题/{} 描述)",
        campaign_name,
        format_cents(monthly_budget_cents / 30),
        engine.template.keywords.len(),
        ad_copy.headlines.len(),
        ad_copy.descriptions.len()
    );
    Ok(local_id)
}

fn apply_step_policy(
    policy: StepPolicy,
    step: &str,
    result: Result<(), AppError>,
) -> Result<(), AppError> {
    match result {
        Ok(()) => Ok(()),
        Err(e) => match policy {
            StepPolicy::AbortOnFailure => Err(e),
            StepPolicy::ContinueOnFailure => {
                warn!("步骤失败(忽略继续) {}: {}", step, e);
                Ok(())
            }
        },
    }
}

/// 启用/暂停活动。先改平台, 平台成功后才更新本地状态;
/// 平台调用失败时本地记录保持原样, 避免状态漂移。
pub async fn set_campaign_status(
    engine: &AdsEngine,
    campaign: &CampaignEntity,
    status: CampaignStatus,
) -> Result<(), AppError> {
    let platform = engine
        .platform
        .as_ref()
        .ok_or(AppError::PlatformNotConfigured)?;
    let external_id = campaign
        .external_id
        .as_deref()
        .ok_or_else(|| AppError::BizError(format!("活动 {} 缺少平台ID", campaign.name)))?;
    let local_id = campaign
        .id
        .ok_or_else(|| AppError::BizError(format!("活动 {} 缺少本地ID", campaign.name)))?;

    platform.update_campaign_status(external_id, status).await?;

    CampaignModel::new()
        .await
        .update_status(local_id, status)
        .await
        .map_err(|e| AppError::DbError(e.to_string()))?;
    info!("活动 {} 状态已更新为 {}", campaign.name, status);
    Ok(())
}
