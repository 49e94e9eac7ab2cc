extern crate rbatis;

use anyhow::Result;
use rbatis::{crud, RBatis};
use tracing::debug;

use crate::app_config::db;

/// 每日广告表现, (campaign_id, date) 唯一, 只追加。
/// 派生指标(ctr/cpc/线索成本)读取时再算, 不落库。
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct PerformanceEntity {
    pub id: Option<i64>,
    pub campaign_id: i64,
    pub date: String,
    pub impressions: i64,
    pub clicks: i64,
    pub cost_cents: i64,
    pub conversions: i64,
}
crud!(PerformanceEntity {}, "ad_performance");

/// 窗口内的原始汇总
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct PerfTotals {
    pub row_count: u64,
    pub impressions: i64,
    pub clicks: i64,
    pub cost_cents: i64,
    pub conversions: i64,
}

pub struct PerformanceModel {
    db: &'static RBatis,
}

impl PerformanceModel {
    pub async fn new() -> PerformanceModel {
        Self {
            db: db::get_db_client(),
        }
    }

    pub async fn init_table(&self) -> Result<()> {
        let sql = r#"
            CREATE TABLE IF NOT EXISTS `ad_performance` (
                `id` BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
                `campaign_id` BIGINT NOT NULL,
                `date` VARCHAR(10) NOT NULL,
                `impressions` BIGINT NOT NULL DEFAULT 0,
                `clicks` BIGINT NOT NULL DEFAULT 0,
                `cost_cents` BIGINT NOT NULL DEFAULT 0,
                `conversions` BIGINT NOT NULL DEFAULT 0,
                `created_at` DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                UNIQUE KEY `uk_campaign_date` (`campaign_id`, `date`),
                KEY `idx_date` (`date`)
            ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
        "#;
        self.db.exec(sql, vec![]).await?;
        Ok(())
    }

    /// 从 from_date(含)起, 单个活动的原始汇总
    pub async fn sum_since(&self, campaign_id: i64, from_date: &str) -> Result<PerfTotals> {
        let sql = "SELECT COUNT(1) AS row_count, \
                   IFNULL(SUM(impressions), 0) AS impressions, \
                   IFNULL(SUM(clicks), 0) AS clicks, \
                   IFNULL(SUM(cost_cents), 0) AS cost_cents, \
                   IFNULL(SUM(conversions), 0) AS conversions \
                   FROM ad_performance WHERE campaign_id = ? AND date >= ?";
        let totals: PerfTotals = self
            .db
            .query_decode(sql, vec![campaign_id.into(), from_date.to_string().into()])
            .await?;
        Ok(totals)
    }

    /// 从 from_date(含)起, 全部活动的总花费(分)
    pub async fn cost_since(&self, from_date: &str) -> Result<i64> {
        let sql = "SELECT IFNULL(SUM(cost_cents), 0) FROM ad_performance WHERE date >= ?";
        let total: i64 = self
            .db
            .query_decode(sql, vec![from_date.to_string().into()])
            .await?;
        Ok(total)
    }

    /// 写入某天的日报行。重复拉取同一天时覆盖更新。
    /// 返回 true 表示首次写入(调用方以此决定是否累加活动汇总)。
    pub async fn upsert_daily(&self, row: &PerformanceEntity) -> Result<bool> {
        let sql = "INSERT INTO ad_performance (campaign_id, date, impressions, clicks, cost_cents, conversions) \
                   VALUES (?, ?, ?, ?, ?, ?) \
                   ON DUPLICATE KEY UPDATE \
                   impressions = VALUES(impressions), \
                   clicks = VALUES(clicks), \
                   cost_cents = VALUES(cost_cents), \
                   conversions = VALUES(conversions)";
        let res = self
            .db
            .exec(
                sql,
                vec![
                    row.campaign_id.into(),
                    row.date.to_string().into(),
                    row.impressions.into(),
                    row.clicks.into(),
                    row.cost_cents.into(),
                    row.conversions.into(),
                ],
            )
            .await?;
        debug!(
            "upsert_daily campaign_id={} date={} rows={}",
            row.campaign_id, row.date, res.rows_affected
        );
        // MySQL: 新插入 rows_affected=1, 覆盖更新=2, 无变化=0
        Ok(res.rows_affected == 1)
    }
}
