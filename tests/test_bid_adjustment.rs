use rust_ads::ads::config::OptimizationConfig;
use rust_ads::ads::strategy::bid_adjustment::{decide, BidAction};

fn cfg() -> OptimizationConfig {
    OptimizationConfig::default()
}

/// 点击不足10次时, 无论线索成本多离谱都维持现状
#[test]
fn test_insufficient_clicks_always_maintain() {
    for clicks in [0, 1, 5, 9] {
        for cpl in [0.0, 500.0, 2600.0, 10_000.0, 1_000_000.0] {
            let decision = decide(&cfg(), cpl, clicks);
            assert_eq!(
                decision.action,
                BidAction::Maintain,
                "clicks={} cpl={}",
                clicks,
                cpl
            );
            assert_eq!(decision.adjustment, 0.0);
            assert!(decision.reason.contains("Insufficient data"));
        }
    }
}

/// 点击>=50且线索成本超过$30时暂停
#[test]
fn test_pause_when_cost_per_lead_exceeds_max() {
    for (clicks, cpl) in [(50, 3001.0), (60, 3100.0), (500, 50_000.0)] {
        let decision = decide(&cfg(), cpl, clicks);
        assert_eq!(decision.action, BidAction::Pause, "clicks={} cpl={}", clicks, cpl);
        assert_eq!(decision.adjustment, 0.0);
    }
}

/// 暂停理由里同时带上实际值和上限
#[test]
fn test_pause_reason_contains_both_values() {
    let decision = decide(&cfg(), 3100.0, 60);
    assert!(decision.reason.contains("$31.00"), "{}", decision.reason);
    assert!(decision.reason.contains("$30.00"), "{}", decision.reason);
}

/// 暂停优先于下调: 两个条件同时满足时必须是暂停
#[test]
fn test_pause_takes_priority_over_decrease() {
    let decision = decide(&cfg(), 3100.0, 60);
    assert_eq!(decision.action, BidAction::Pause);
}

/// 线索成本在(0, $15)区间时上调20%
#[test]
fn test_increase_on_excellent_performance() {
    for (clicks, cpl) in [(10, 1.0), (20, 500.0), (60, 1400.0), (1000, 1499.9)] {
        let decision = decide(&cfg(), cpl, clicks);
        assert_eq!(decision.action, BidAction::Increase, "clicks={} cpl={}", clicks, cpl);
        assert_eq!(decision.adjustment, 0.20);
    }
}

/// 线索成本超过$25(且未被暂停规则命中)时下调15%
#[test]
fn test_decrease_on_high_cost_per_lead() {
    for (clicks, cpl) in [(10, 2501.0), (20, 2600.0), (49, 5000.0), (100, 2800.0)] {
        let decision = decide(&cfg(), cpl, clicks);
        assert_eq!(decision.action, BidAction::Decrease, "clicks={} cpl={}", clicks, cpl);
        assert_eq!(decision.adjustment, 0.15);
    }
}

/// 点击不足50次时即使成本爆表也只是下调, 不暂停
#[test]
fn test_no_pause_below_click_threshold() {
    let decision = decide(&cfg(), 10_000.0, 49);
    assert_eq!(decision.action, BidAction::Decrease);
}

/// 死区和边界值: 阈值本身不触发动作
#[test]
fn test_dead_zone_and_boundaries() {
    // 没有转化(cpl=0)时不能当作表现优秀
    let decision = decide(&cfg(), 0.0, 30);
    assert_eq!(decision.action, BidAction::Maintain);
    assert!(decision.reason.contains("within target range"));

    // 恰好$15: 不上调
    let decision = decide(&cfg(), 1500.0, 30);
    assert_eq!(decision.action, BidAction::Maintain);

    // 恰好$25: 不下调
    let decision = decide(&cfg(), 2500.0, 30);
    assert_eq!(decision.action, BidAction::Maintain);

    // 恰好$30且点击足够: 不暂停(严格大于), 落到下调
    let decision = decide(&cfg(), 3000.0, 100);
    assert_eq!(decision.action, BidAction::Decrease);
}

/// 阈值是配置而不是写死的规律
#[test]
fn test_thresholds_are_configurable() {
    let custom = OptimizationConfig {
        max_cost_per_lead_cents: 1000,
        min_clicks_before_pause: 20,
        ..OptimizationConfig::default()
    };
    let decision = decide(&custom, 1100.0, 20);
    assert_eq!(decision.action, BidAction::Pause);
}
