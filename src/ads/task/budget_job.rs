use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn, Level};

use crate::ads::format_cents;
use crate::ads::model::budget_approval::BudgetApprovalModel;
use crate::ads::services::budget_service;
use crate::ads::AdsEngine;
use crate::app_config::email;
use crate::time_util;

/// 推荐预算 = 当月预算上浮10%; 没有历史预算时用默认值
pub fn recommended_budget_cents(current: Option<i64>, default_cents: i64) -> i64 {
    match current {
        Some(budget) => (budget as f64 * 1.1).round() as i64,
        None => default_cents,
    }
}

/// 每月预算提案: 生成下月推荐预算并请求人工审批。
/// 只创建 pending 记录, 永远不会自动批准 — 批准是引擎外的人工动作。
/// 下月已有 pending 时跳过, 同月重复执行只会产生一条记录。
pub async fn request_monthly_budget_approval(engine: &AdsEngine) -> Result<()> {
    let span = tracing::span!(Level::INFO, "request_monthly_budget_approval");
    let _enter = span.enter();

    let next_month = time_util::next_month_start(&Utc::now());
    let model = BudgetApprovalModel::new().await;

    if model.has_pending_for_month(&next_month).await? {
        info!("下月预算审批已在等待中, 跳过: {}", next_month);
        return Ok(());
    }

    let current = budget_service::get_current_month_budget().await?;
    let recommended = recommended_budget_cents(
        current,
        engine.engine_cfg.default_monthly_budget_cents,
    );

    // 存储层比较后插入, 并发的提案任务在这里去重
    let inserted = model
        .insert_pending_if_absent(
            &next_month,
            recommended,
            "Auto-generated budget recommendation based on current performance",
        )
        .await?;
    if !inserted {
        info!("并发提案已存在, 跳过通知: {}", next_month);
        return Ok(());
    }

    let month_name = time_util::month_display(&next_month);
    let projected_roi_cents = recommended * 3;
    let daily_cap_cents = recommended / 30;
    let projected_leads = recommended / engine.engine_cfg.target_cost_per_lead_cents.max(1);

    let message = format!(
        "Monthly Ad Budget Approval Required\n\n\
         Month: {}\n\
         Recommended Budget: {}\n\
         Projected ROI: {} (3x return)\n\
         Daily Spend Limit: {}\n\n\
         Based on current performance, this budget should generate approximately {} qualified leads.\n\n\
         Action Required:\n\
         1. Log in to your admin dashboard\n\
         2. Go to Advertising -> Budget Approvals\n\
         3. Review and approve/adjust the budget\n\n\
         The system will automatically create and optimize campaigns once approved.",
        month_name,
        format_cents(recommended),
        format_cents(projected_roi_cents),
        format_cents(daily_cap_cents),
        projected_leads
    );

    let sent = email::send_email(&format!("Budget Approval Needed: {}", month_name), message).await;
    if sent {
        info!("预算审批请求已发送: {}", month_name);
    } else {
        warn!("预算审批请求发送失败: {}", month_name);
    }
    Ok(())
}
