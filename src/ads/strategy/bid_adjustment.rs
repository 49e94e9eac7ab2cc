use serde::{Deserialize, Serialize};

use crate::ads::config::OptimizationConfig;
use crate::ads::{format_cents, format_cents_f};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BidAction {
    Increase,
    Decrease,
    Pause,
    Maintain,
}

/// 单次优化对单个活动的出价决策。只在本轮消费, 不落库。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidDecision {
    pub action: BidAction,
    pub adjustment: f64,
    pub reason: String,
}

/// 根据窗口内表现决定出价动作。确定性规则, 按严格优先级求值,
/// 命中即返回:
/// 1. 点击太少 -> 维持(数据不足)
/// 2. 点击足够且线索成本超上限 -> 暂停
/// 3. 线索成本很低 -> 上调
/// 4. 线索成本偏高 -> 下调
/// 5. 其余 -> 维持
/// 第2条的点击门槛防止在早期噪声数据上误杀活动。
pub fn decide(cfg: &OptimizationConfig, cost_per_lead_cents: f64, clicks: i64) -> BidDecision {
    // 数据不足
    if clicks < cfg.min_clicks_for_data {
        return BidDecision {
            action: BidAction::Maintain,
            adjustment: 0.0,
            reason: format!("Insufficient data (< {} clicks)", cfg.min_clicks_for_data),
        };
    }

    // 表现极差, 暂停
    if clicks >= cfg.min_clicks_before_pause
        && cost_per_lead_cents > cfg.max_cost_per_lead_cents as f64
    {
        return BidDecision {
            action: BidAction::Pause,
            adjustment: 0.0,
            reason: format!(
                "Cost per lead ({}) exceeds max ({})",
                format_cents_f(cost_per_lead_cents),
                format_cents(cfg.max_cost_per_lead_cents)
            ),
        };
    }

    // 表现优秀, 上调
    if cost_per_lead_cents > 0.0 && cost_per_lead_cents < cfg.increase_below_cents as f64 {
        return BidDecision {
            action: BidAction::Increase,
            adjustment: cfg.increase_percent,
            reason: format!(
                "Excellent performance: {} per lead",
                format_cents_f(cost_per_lead_cents)
            ),
        };
    }

    // 成本偏高, 下调
    if cost_per_lead_cents > cfg.decrease_above_cents as f64 {
        return BidDecision {
            action: BidAction::Decrease,
            adjustment: cfg.decrease_percent,
            reason: format!(
                "High cost per lead: {}",
                format_cents_f(cost_per_lead_cents)
            ),
        };
    }

    BidDecision {
        action: BidAction::Maintain,
        adjustment: 0.0,
        reason: format!(
            "Cost per lead ({}) is within target range",
            format_cents_f(cost_per_lead_cents)
        ),
    }
}
