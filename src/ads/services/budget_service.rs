use anyhow::Result;
use chrono::Utc;
use tracing::warn;

use crate::ads::format_cents;
use crate::ads::model::budget_approval::BudgetApprovalModel;
use crate::ads::model::performance::PerformanceModel;
use crate::time_util;

/// 日花费上限 = 月度预算 / 30
pub fn daily_limit_cents(monthly_budget_cents: i64) -> f64 {
    monthly_budget_cents as f64 / 30.0
}

/// 判断当日是否触顶。没有已批准预算时一律判定触顶(fail-closed:
/// 没批准就没有花费授权)。
pub fn daily_limit_reached(monthly_budget_cents: Option<i64>, today_spend_cents: i64) -> bool {
    match monthly_budget_cents {
        None => true,
        Some(budget) => today_spend_cents as f64 >= daily_limit_cents(budget),
    }
}

/// 当月已批准的预算金额(分), 没有则 None
pub async fn get_current_month_budget() -> Result<Option<i64>> {
    let month = time_util::month_start(&Utc::now());
    BudgetApprovalModel::new()
        .await
        .approved_amount_for_month(&month)
        .await
}

/// 每轮优化前的熔断检查: 当日总花费是否已达上限。
/// 必须保持廉价, 不能拖慢小时级循环。
pub async fn is_daily_limit_reached() -> Result<bool> {
    let budget = get_current_month_budget().await?;
    let today = time_util::date_str(&Utc::now());
    let today_spend = PerformanceModel::new().await.cost_since(&today).await?;

    let reached = daily_limit_reached(budget, today_spend);
    if reached {
        match budget {
            Some(budget) => warn!(
                "当日花费已触顶: {} / {}",
                format_cents(today_spend),
                format_cents((daily_limit_cents(budget)) as i64)
            ),
            None => warn!("当月没有已批准的预算, 停止投放"),
        }
    }
    Ok(reached)
}
