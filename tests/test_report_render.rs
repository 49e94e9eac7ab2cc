use rust_ads::ads::model::campaign::CampaignEntity;
use rust_ads::ads::services::performance_service::{render_campaign_report, CampaignPerformance};
use rust_ads::ads::task::report_job::month_end_recommendation;

fn sample_campaign() -> CampaignEntity {
    CampaignEntity {
        id: Some(1),
        external_id: Some("9876543210".to_string()),
        name: "Solar Leads - 2026-08-06".to_string(),
        status: "active".to_string(),
        daily_budget_cents: 10_000,
        monthly_budget_cents: 300_000,
        target_cost_per_lead_cents: 2000,
        keywords: "[]".to_string(),
        ad_copy: "{}".to_string(),
        locations: "[]".to_string(),
        total_spent_cents: 0,
        total_clicks: 0,
        total_impressions: 0,
        total_conversions: 0,
    }
}

#[test]
fn test_report_contains_key_metrics() {
    let perf = CampaignPerformance::from_totals(1000, 60, 2100, 50);
    let report = render_campaign_report(&sample_campaign(), &perf, 30, 6000);

    assert!(report.contains("Campaign: Solar Leads - 2026-08-06"));
    assert!(report.contains("Status: active"));
    assert!(report.contains("Period: Last 30 days"));
    assert!(report.contains("Impressions: 1000"));
    assert!(report.contains("Clicks: 60"));
    assert!(report.contains("CTR: 6.00%"));
    assert!(report.contains("Cost: $21.00"));
    assert!(report.contains("Conversions: 50"));
    assert!(report.contains("Cost per Lead: $0.42"));
    assert!(report.contains("Daily Budget: $100.00"));
    assert!(report.contains("Monthly Budget: $3000.00"));
    assert!(report.contains("Target Cost per Lead: $20.00"));
}

/// 没有转化时线索成本和ROI显示 N/A 而不是0
#[test]
fn test_report_without_conversions() {
    let perf = CampaignPerformance::from_totals(1000, 40, 900, 0);
    let report = render_campaign_report(&sample_campaign(), &perf, 30, 6000);
    assert!(report.contains("Cost per Lead: N/A"));
    assert!(report.contains("ROI: N/A"));
}

/// ROI计算: 50转化 × $60 = $3000 收入, $21 花费
#[test]
fn test_report_roi() {
    let perf = CampaignPerformance::from_totals(1000, 60, 2100, 50);
    let report = render_campaign_report(&sample_campaign(), &perf, 30, 6000);
    // (300000 - 2100) / 2100 * 100 ≈ 14185.71 -> 取整显示
    assert!(report.contains("ROI: 14186%"), "{}", report);
}

/// 月末方向性建议按ROI分档
#[test]
fn test_month_end_recommendation_bands() {
    assert!(month_end_recommendation(250.0).contains("Increase budget by 20%"));
    assert!(month_end_recommendation(150.0).contains("Maintain current budget"));
    assert!(month_end_recommendation(50.0).contains("Reduce budget by 20%"));
    // 边界: 恰好200%不升, 恰好100%不保
    assert!(month_end_recommendation(200.0).contains("Maintain"));
    assert!(month_end_recommendation(100.0).contains("Reduce"));
    assert!(month_end_recommendation(0.0).contains("Reduce"));
}
