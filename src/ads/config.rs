use std::env;

use serde::{Deserialize, Serialize};

fn env_i64(key: &str, default: i64) -> i64 {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_f64(key: &str, default: f64) -> f64 {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// 出价优化阈值配置。全部金额为分。
/// 这些是可配置项, 不是写死的业务规律。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationConfig {
    /// 单条线索成本上限, 超过且点击数足够时暂停
    pub max_cost_per_lead_cents: i64,
    /// 暂停前要求的最少点击数, 避免在噪声数据上误杀
    pub min_clicks_before_pause: i64,
    /// 判定数据不足的最少点击数
    pub min_clicks_for_data: i64,
    /// 线索成本低于该值时上调出价
    pub increase_below_cents: i64,
    /// 线索成本高于该值时下调出价
    pub decrease_above_cents: i64,
    /// 上调幅度
    pub increase_percent: f64,
    /// 下调幅度
    pub decrease_percent: f64,
    /// 优化使用的回看窗口(天)
    pub lookback_days: i64,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            max_cost_per_lead_cents: 3000,
            min_clicks_before_pause: 50,
            min_clicks_for_data: 10,
            increase_below_cents: 1500,
            decrease_above_cents: 2500,
            increase_percent: 0.20,
            decrease_percent: 0.15,
            lookback_days: 7,
        }
    }
}

impl OptimizationConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            max_cost_per_lead_cents: env_i64("ADS_MAX_COST_PER_LEAD_CENTS", d.max_cost_per_lead_cents),
            min_clicks_before_pause: env_i64("ADS_MIN_CLICKS_BEFORE_PAUSE", d.min_clicks_before_pause),
            min_clicks_for_data: env_i64("ADS_MIN_CLICKS_FOR_DATA", d.min_clicks_for_data),
            increase_below_cents: env_i64("ADS_BID_INCREASE_THRESHOLD_CENTS", d.increase_below_cents),
            decrease_above_cents: env_i64("ADS_BID_DECREASE_THRESHOLD_CENTS", d.decrease_above_cents),
            increase_percent: env_f64("ADS_BID_INCREASE_PERCENT", d.increase_percent),
            decrease_percent: env_f64("ADS_BID_DECREASE_PERCENT", d.decrease_percent),
            lookback_days: env_i64("ADS_OPTIMIZE_LOOKBACK_DAYS", d.lookback_days),
        }
    }
}

/// 引擎级配置。金额为分。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 平台侧 target-CPA 出价目标
    pub target_cpa_cents: i64,
    /// 新活动默认的目标线索成本
    pub target_cost_per_lead_cents: i64,
    /// 月报中假定的每条线索平均收入
    pub avg_revenue_per_lead_cents: i64,
    /// 没有历史预算时的默认月度预算
    pub default_monthly_budget_cents: i64,
    /// 报表使用的回看窗口(天)
    pub report_lookback_days: i64,
    /// 广告落地页
    pub final_url: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_cpa_cents: 4000,
            target_cost_per_lead_cents: 2000,
            avg_revenue_per_lead_cents: 6000,
            default_monthly_budget_cents: 300_000,
            report_lookback_days: 30,
            final_url: "https://solar-lead-vwkzbmwb.manus.space/get-quote".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            target_cpa_cents: env_i64("ADS_TARGET_CPA_CENTS", d.target_cpa_cents),
            target_cost_per_lead_cents: env_i64(
                "ADS_TARGET_COST_PER_LEAD_CENTS",
                d.target_cost_per_lead_cents,
            ),
            avg_revenue_per_lead_cents: env_i64(
                "ADS_AVG_REVENUE_PER_LEAD_CENTS",
                d.avg_revenue_per_lead_cents,
            ),
            default_monthly_budget_cents: env_i64(
                "ADS_DEFAULT_MONTHLY_BUDGET_CENTS",
                d.default_monthly_budget_cents,
            ),
            report_lookback_days: env_i64("ADS_REPORT_LOOKBACK_DAYS", d.report_lookback_days),
            final_url: env::var("ADS_FINAL_URL").unwrap_or(d.final_url),
        }
    }
}

/// 关键词匹配类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchType {
    Exact,
    Phrase,
    Broad,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Exact => "EXACT",
            MatchType::Phrase => "PHRASE",
            MatchType::Broad => "BROAD",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keyword {
    pub text: String,
    pub match_type: MatchType,
}

impl Keyword {
    fn new(text: &str, match_type: MatchType) -> Self {
        Self {
            text: text.to_string(),
            match_type,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoTarget {
    pub name: String,
    pub geo_target_constant: String,
}

impl GeoTarget {
    fn new(name: &str, geo_target_constant: &str) -> Self {
        Self {
            name: name.to_string(),
            geo_target_constant: geo_target_constant.to_string(),
        }
    }
}

/// 新建活动的投放模板: 关键词、否定词、地理定向
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignTemplate {
    pub keywords: Vec<Keyword>,
    pub negative_keywords: Vec<String>,
    pub locations: Vec<GeoTarget>,
}

impl Default for CampaignTemplate {
    fn default() -> Self {
        Self {
            keywords: vec![
                // 高意图关键词
                Keyword::new("solar panels brisbane", MatchType::Exact),
                Keyword::new("solar panels sydney", MatchType::Exact),
                Keyword::new("solar panels perth", MatchType::Exact),
                Keyword::new("solar panels adelaide", MatchType::Exact),
                Keyword::new("solar panel installation", MatchType::Phrase),
                Keyword::new("solar panel quotes", MatchType::Phrase),
                Keyword::new("get solar quote", MatchType::Phrase),
                Keyword::new("compare solar quotes", MatchType::Phrase),
                Keyword::new("6.6kw solar system", MatchType::Exact),
                Keyword::new("solar system price", MatchType::Phrase),
                Keyword::new("best solar panels australia", MatchType::Phrase),
                Keyword::new("solar panel cost", MatchType::Phrase),
            ],
            negative_keywords: vec![
                "free".to_string(),
                "diy".to_string(),
                "second hand".to_string(),
                "used".to_string(),
                "cheap".to_string(),
                "job".to_string(),
                "jobs".to_string(),
                "course".to_string(),
                "training".to_string(),
            ],
            locations: vec![
                GeoTarget::new("Queensland", "geoTargetConstants/2036"),
                GeoTarget::new("New South Wales", "geoTargetConstants/2036"),
                GeoTarget::new("Western Australia", "geoTargetConstants/2009"),
                GeoTarget::new("South Australia", "geoTargetConstants/2017"),
            ],
        }
    }
}
