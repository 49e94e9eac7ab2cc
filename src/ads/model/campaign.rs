extern crate rbatis;

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use rbatis::{crud, RBatis};
use serde_json::json;
use tracing::debug;

use crate::app_config::db;

/// 活动状态。ended 为终态, 引擎不会自动迁移到它。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Active,
    Paused,
    Ended,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Active => "active",
            CampaignStatus::Paused => "paused",
            CampaignStatus::Ended => "ended",
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CampaignStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(CampaignStatus::Active),
            "paused" => Ok(CampaignStatus::Paused),
            "ended" => Ok(CampaignStatus::Ended),
            other => Err(anyhow!("未知活动状态: {}", other)),
        }
    }
}

/// 广告活动。keywords/ad_copy/locations 存 JSON 文本。
/// external_id 为平台侧活动ID, 平台创建成功之前为空。
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CampaignEntity {
    pub id: Option<i64>,
    pub external_id: Option<String>,
    pub name: String,
    pub status: String,
    pub daily_budget_cents: i64,
    pub monthly_budget_cents: i64,
    pub target_cost_per_lead_cents: i64,
    pub keywords: String,
    pub ad_copy: String,
    pub locations: String,
    pub total_spent_cents: i64,
    pub total_clicks: i64,
    pub total_impressions: i64,
    pub total_conversions: i64,
}
crud!(CampaignEntity {}, "ad_campaign");

const SELECT_COLUMNS: &str = "id, external_id, name, status, daily_budget_cents, \
    monthly_budget_cents, target_cost_per_lead_cents, keywords, ad_copy, locations, \
    total_spent_cents, total_clicks, total_impressions, total_conversions";

pub struct CampaignModel {
    db: &'static RBatis,
}

impl CampaignModel {
    pub async fn new() -> CampaignModel {
        Self {
            db: db::get_db_client(),
        }
    }

    pub async fn init_table(&self) -> Result<()> {
        let sql = r#"
            CREATE TABLE IF NOT EXISTS `ad_campaign` (
                `id` BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
                `external_id` VARCHAR(255) NULL,
                `name` VARCHAR(255) NOT NULL,
                `status` VARCHAR(16) NOT NULL DEFAULT 'paused',
                `daily_budget_cents` BIGINT NOT NULL,
                `monthly_budget_cents` BIGINT NOT NULL,
                `target_cost_per_lead_cents` BIGINT NOT NULL,
                `keywords` TEXT NOT NULL,
                `ad_copy` TEXT NOT NULL,
                `locations` TEXT NOT NULL,
                `total_spent_cents` BIGINT NOT NULL DEFAULT 0,
                `total_clicks` BIGINT NOT NULL DEFAULT 0,
                `total_impressions` BIGINT NOT NULL DEFAULT 0,
                `total_conversions` BIGINT NOT NULL DEFAULT 0,
                `created_at` DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                `updated_at` DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
                KEY `idx_status` (`status`)
            ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
        "#;
        self.db.exec(sql, vec![]).await?;
        Ok(())
    }

    pub async fn add(&self, campaign: &CampaignEntity) -> Result<i64> {
        let data = CampaignEntity::insert(self.db, campaign).await?;
        debug!("insert_campaign_result = {}", json!(&data.rows_affected));
        Ok(data.last_insert_id.as_i64().unwrap_or(0))
    }

    pub async fn list_by_status(&self, status: CampaignStatus) -> Result<Vec<CampaignEntity>> {
        let sql = format!(
            "SELECT {} FROM ad_campaign WHERE status = ?",
            SELECT_COLUMNS
        );
        let rows: Vec<CampaignEntity> = self
            .db
            .query_decode(&sql, vec![status.as_str().to_string().into()])
            .await?;
        Ok(rows)
    }

    pub async fn list_all(&self) -> Result<Vec<CampaignEntity>> {
        let sql = format!("SELECT {} FROM ad_campaign", SELECT_COLUMNS);
        let rows: Vec<CampaignEntity> = self.db.query_decode(&sql, vec![]).await?;
        Ok(rows)
    }

    pub async fn update_status(&self, id: i64, status: CampaignStatus) -> Result<u64> {
        let sql = "UPDATE ad_campaign SET status = ? WHERE id = ?";
        let res = self
            .db
            .exec(sql, vec![status.as_str().to_string().into(), id.into()])
            .await?;
        Ok(res.rows_affected)
    }

    /// 累加运行汇总(拉取到新的日报行时调用)
    pub async fn bump_totals(
        &self,
        id: i64,
        impressions: i64,
        clicks: i64,
        cost_cents: i64,
        conversions: i64,
    ) -> Result<u64> {
        let sql = "UPDATE ad_campaign SET \
                   total_impressions = total_impressions + ?, \
                   total_clicks = total_clicks + ?, \
                   total_spent_cents = total_spent_cents + ?, \
                   total_conversions = total_conversions + ? \
                   WHERE id = ?";
        let res = self
            .db
            .exec(
                sql,
                vec![
                    impressions.into(),
                    clicks.into(),
                    cost_cents.into(),
                    conversions.into(),
                    id.into(),
                ],
            )
            .await?;
        Ok(res.rows_affected)
    }
}
