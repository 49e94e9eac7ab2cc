use approx::assert_relative_eq;

use rust_ads::ads::format_cents_f;
use rust_ads::ads::services::performance_service::CampaignPerformance;

/// 分为货币单位的换算场景: 7天 60次点击, 2100分花费, 50个转化
/// -> 单条线索成本 42分 = $0.42
#[test]
fn test_cents_conversion_scenario() {
    let perf = CampaignPerformance::from_totals(1000, 60, 2100, 50);
    assert_relative_eq!(perf.cost_per_lead_cents, 42.0);
    assert_eq!(format_cents_f(perf.cost_per_lead_cents), "$0.42");
}

#[test]
fn test_derived_metrics() {
    let perf = CampaignPerformance::from_totals(1000, 60, 2100, 50);
    assert_relative_eq!(perf.ctr, 6.0);
    assert_relative_eq!(perf.cpc_cents, 35.0);
    assert_relative_eq!(perf.conversion_rate, 50.0 / 60.0 * 100.0);
    assert_eq!(perf.impressions, 1000);
    assert_eq!(perf.cost_cents, 2100);
}

/// 零点击时所有比率为0, 不出现除零
#[test]
fn test_zero_clicks() {
    let perf = CampaignPerformance::from_totals(500, 0, 0, 0);
    assert_eq!(perf.ctr, 0.0);
    assert_eq!(perf.cpc_cents, 0.0);
    assert_eq!(perf.cost_per_lead_cents, 0.0);
    assert_eq!(perf.conversion_rate, 0.0);
}

/// 有点击没转化: 线索成本为0(上层策略把0当"无转化"处理)
#[test]
fn test_no_conversions() {
    let perf = CampaignPerformance::from_totals(1000, 40, 900, 0);
    assert_eq!(perf.cost_per_lead_cents, 0.0);
    assert_relative_eq!(perf.cpc_cents, 22.5);
}

/// 异常数据: 有点击但曝光为0时点击率取0
#[test]
fn test_zero_impressions_guard() {
    let perf = CampaignPerformance::from_totals(0, 10, 100, 1);
    assert_eq!(perf.ctr, 0.0);
}
