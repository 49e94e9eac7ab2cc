use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::ads::config::Keyword;
use crate::ads::copywriter::AdCopy;
use crate::ads::model::campaign::CampaignStatus;
use crate::ads::platform::AdsPlatformClient;
use crate::error::AppError;

/// 平台对响应式广告的上限
pub const MAX_AD_HEADLINES: usize = 15;
pub const MAX_AD_DESCRIPTIONS: usize = 4;

/// 从资源名提取数字ID。
/// 例: "customers/123/campaigns/987" -> "987"
pub fn extract_id_from_resource_name(resource_name: &str) -> String {
    resource_name
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// 按平台上限截断广告文案
pub fn bounded_ad_copy(ad_copy: &AdCopy) -> (Vec<String>, Vec<String>) {
    let headlines = ad_copy
        .headlines
        .iter()
        .take(MAX_AD_HEADLINES)
        .cloned()
        .collect();
    let descriptions = ad_copy
        .descriptions
        .iter()
        .take(MAX_AD_DESCRIPTIONS)
        .cloned()
        .collect();
    (headlines, descriptions)
}

/// 单个活动单日的平台侧数据
#[derive(Debug, Clone, Deserialize)]
pub struct DailyStats {
    #[serde(default)]
    pub impressions: i64,
    #[serde(default)]
    pub clicks: i64,
    #[serde(default)]
    pub cost_micros: i64,
    #[serde(default)]
    pub conversions: i64,
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    #[serde(default)]
    rows: Vec<DailyStats>,
}

impl AdsPlatformClient {
    /// 创建活动预算, 返回预算资源名
    pub async fn create_campaign_budget(
        &self,
        campaign_name: &str,
        daily_budget_micros: i64,
    ) -> Result<String, AppError> {
        let operation = json!({
            "campaign_budget_operation": {
                "create": {
                    "name": format!("{} Budget", campaign_name),
                    "amount_micros": daily_budget_micros,
                    "delivery_method": "STANDARD",
                }
            }
        });
        let names = self.mutate("create_campaign_budget", vec![operation]).await?;
        let resource_name = first_resource_name("create_campaign_budget", names)?;
        info!("预算已创建: {}", resource_name);
        Ok(resource_name)
    }

    /// 创建搜索活动。状态强制为 PAUSED: 任何活动上线都必须经过
    /// 单独的显式启用动作。
    pub async fn create_campaign(
        &self,
        name: &str,
        budget_resource_name: &str,
        target_cpa_micros: i64,
    ) -> Result<String, AppError> {
        let operation = json!({
            "campaign_operation": {
                "create": {
                    "name": name,
                    "advertising_channel_type": "SEARCH",
                    "status": "PAUSED",
                    "campaign_budget": budget_resource_name,
                    "network_settings": {
                        "target_google_search": true,
                        "target_search_network": true,
                        "target_content_network": false,
                        "target_partner_search_network": false,
                    },
                    "bidding_strategy_type": "TARGET_CPA",
                    "target_cpa": {
                        "target_cpa_micros": target_cpa_micros,
                    },
                }
            }
        });
        let names = self.mutate("create_campaign", vec![operation]).await?;
        let resource_name = first_resource_name("create_campaign", names)?;
        info!("活动已创建(paused): {}", resource_name);
        Ok(resource_name)
    }

    /// 给活动追加单个地理定向
    pub async fn add_location_targeting(
        &self,
        campaign_resource_name: &str,
        geo_target_constant: &str,
    ) -> Result<(), AppError> {
        let operation = json!({
            "campaign_criterion_operation": {
                "create": {
                    "campaign": campaign_resource_name,
                    "location": {
                        "geo_target_constant": geo_target_constant,
                    },
                }
            }
        });
        self.mutate("add_location_targeting", vec![operation]).await?;
        debug!("地理定向已添加: {}", geo_target_constant);
        Ok(())
    }

    /// 在活动下创建广告组
    pub async fn create_ad_group(
        &self,
        campaign_resource_name: &str,
        name: &str,
    ) -> Result<String, AppError> {
        let operation = json!({
            "ad_group_operation": {
                "create": {
                    "name": name,
                    "campaign": campaign_resource_name,
                    "status": "ENABLED",
                    "type": "SEARCH_STANDARD",
                }
            }
        });
        let names = self.mutate("create_ad_group", vec![operation]).await?;
        let resource_name = first_resource_name("create_ad_group", names)?;
        info!("广告组已创建: {}", resource_name);
        Ok(resource_name)
    }

    /// 批量添加关键词, 否定词一并下发
    pub async fn add_keywords(
        &self,
        ad_group_resource_name: &str,
        keywords: &[Keyword],
        negative_keywords: &[String],
    ) -> Result<(), AppError> {
        let mut operations: Vec<serde_json::Value> = keywords
            .iter()
            .map(|keyword| {
                json!({
                    "ad_group_criterion_operation": {
                        "create": {
                            "ad_group": ad_group_resource_name,
                            "status": "ENABLED",
                            "keyword": {
                                "text": keyword.text.as_str(),
                                "match_type": keyword.match_type.as_str(),
                            },
                        }
                    }
                })
            })
            .collect();
        operations.extend(negative_keywords.iter().map(|text| {
            json!({
                "ad_group_criterion_operation": {
                    "create": {
                        "ad_group": ad_group_resource_name,
                        "negative": true,
                        "keyword": {
                            "text": text,
                            "match_type": "BROAD",
                        },
                    }
                }
            })
        }));
        self.mutate("add_keywords", operations).await?;
        info!(
            "关键词已添加: {}个, 否定词{}个",
            keywords.len(),
            negative_keywords.len()
        );
        Ok(())
    }

    /// 创建响应式搜索广告, 标题/描述截断到平台上限
    pub async fn create_responsive_search_ad(
        &self,
        ad_group_resource_name: &str,
        ad_copy: &AdCopy,
        final_url: &str,
    ) -> Result<(), AppError> {
        let (headlines, descriptions) = bounded_ad_copy(ad_copy);
        let operation = json!({
            "ad_group_ad_operation": {
                "create": {
                    "ad_group": ad_group_resource_name,
                    "status": "ENABLED",
                    "ad": {
                        "final_urls": [final_url],
                        "responsive_search_ad": {
                            "headlines": headlines.iter().map(|t| json!({"text": t})).collect::<Vec<_>>(),
                            "descriptions": descriptions.iter().map(|t| json!({"text": t})).collect::<Vec<_>>(),
                        },
                    },
                }
            }
        });
        self.mutate("create_responsive_search_ad", vec![operation]).await?;
        info!("响应式搜索广告已创建");
        Ok(())
    }

    /// 仅更新活动状态(update_mask 只含 status, 不碰预算和关键词)
    pub async fn update_campaign_status(
        &self,
        campaign_external_id: &str,
        status: CampaignStatus,
    ) -> Result<(), AppError> {
        let platform_status = match status {
            CampaignStatus::Active => "ENABLED",
            CampaignStatus::Paused => "PAUSED",
            CampaignStatus::Ended => "REMOVED",
        };
        let resource_name = format!(
            "customers/{}/campaigns/{}",
            self.customer_id(),
            campaign_external_id
        );
        let operation = json!({
            "campaign_operation": {
                "update": {
                    "resource_name": resource_name,
                    "status": platform_status,
                },
                "update_mask": "status",
            }
        });
        self.mutate("update_campaign_status", vec![operation]).await?;
        info!("活动状态已更新: {} -> {}", campaign_external_id, platform_status);
        Ok(())
    }

    /// 拉取单个活动某天的表现数据, 无行时返回 None
    pub async fn fetch_daily_stats(
        &self,
        campaign_external_id: &str,
        date: &str,
    ) -> Result<Option<DailyStats>, AppError> {
        let path = format!(
            "/v16/customers/{}/performance:search",
            self.customer_id()
        );
        let body = json!({
            "campaign_id": campaign_external_id,
            "start_date": date,
            "end_date": date,
        });
        let res: StatsResponse = self.post_json("fetch_daily_stats", &path, &body).await?;
        Ok(res.rows.into_iter().next())
    }
}

fn first_resource_name(op: &str, names: Vec<String>) -> Result<String, AppError> {
    names
        .into_iter()
        .next()
        .ok_or_else(|| AppError::PlatformRejected {
            op: op.to_string(),
            msg: "响应中缺少资源名".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_id_from_resource_name() {
        assert_eq!(
            extract_id_from_resource_name("customers/1234567890/campaigns/9876543210"),
            "9876543210"
        );
        assert_eq!(extract_id_from_resource_name("abc"), "abc");
    }

    #[test]
    fn test_bounded_ad_copy() {
        let copy = AdCopy {
            headlines: (0..20).map(|i| format!("h{}", i)).collect(),
            descriptions: (0..6).map(|i| format!("d{}", i)).collect(),
        };
        let (headlines, descriptions) = bounded_ad_copy(&copy);
        assert_eq!(headlines.len(), MAX_AD_HEADLINES);
        assert_eq!(descriptions.len(), MAX_AD_DESCRIPTIONS);
        assert_eq!(headlines[0], "h0");
        assert_eq!(descriptions[3], "d3");
    }
}
