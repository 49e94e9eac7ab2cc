use rust_ads::ads::services::budget_service::{daily_limit_cents, daily_limit_reached};
use rust_ads::ads::services::campaign_service::daily_budget_micros;
use rust_ads::ads::task::budget_job::recommended_budget_cents;

/// 月度预算$1000 -> floor(1000/30 * 1_000_000) = 33,333,333 微单位
#[test]
fn test_daily_budget_micros() {
    assert_eq!(daily_budget_micros(100_000), 33_333_333);
    assert_eq!(daily_budget_micros(300_000), 100_000_000);
    assert_eq!(daily_budget_micros(0), 0);
}

/// 没有已批准预算时一律触顶(fail-closed), 与表现数据无关
#[test]
fn test_limit_fail_closed_without_budget() {
    assert!(daily_limit_reached(None, 0));
    assert!(daily_limit_reached(None, 1));
    assert!(daily_limit_reached(None, 1_000_000));
}

/// 触顶判定: 当日花费 >= 预算/30
#[test]
fn test_limit_threshold() {
    // $3000月度预算 -> 日上限 $100 = 10000分
    assert_eq!(daily_limit_cents(300_000), 10_000.0);
    assert!(!daily_limit_reached(Some(300_000), 0));
    assert!(!daily_limit_reached(Some(300_000), 9_999));
    assert!(daily_limit_reached(Some(300_000), 10_000));
    assert!(daily_limit_reached(Some(300_000), 10_001));
}

/// 整除不尽的预算: 上限是精确的 budget/30, 不提前取整
#[test]
fn test_limit_threshold_fractional() {
    // 100_000 / 30 = 3333.33...
    assert!(!daily_limit_reached(Some(100_000), 3333));
    assert!(daily_limit_reached(Some(100_000), 3334));
}

/// 推荐预算: 有当月预算时上浮10%并取整, 没有时用默认值
#[test]
fn test_recommended_budget() {
    assert_eq!(recommended_budget_cents(Some(300_000), 300_000), 330_000);
    assert_eq!(recommended_budget_cents(None, 300_000), 300_000);
    // 四舍五入
    assert_eq!(recommended_budget_cents(Some(105), 300_000), 116);
}
