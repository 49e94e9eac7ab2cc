extern crate rbatis;

use anyhow::Result;
use rbatis::{crud, RBatis};
use tracing::debug;

use crate::app_config::db;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REJECTED: &str = "rejected";

/// 月度预算审批。month 为当月第一天(YYYY-MM-DD), 每月最多一条 approved。
/// 记录只做状态流转, 从不删除。
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct BudgetApprovalEntity {
    pub id: Option<i64>,
    pub month: String,
    pub amount_cents: i64,
    pub status: String,
    pub approved_by: Option<i64>,
    pub notes: Option<String>,
}
crud!(BudgetApprovalEntity {}, "ad_budget_approval");

pub struct BudgetApprovalModel {
    db: &'static RBatis,
}

impl BudgetApprovalModel {
    pub async fn new() -> BudgetApprovalModel {
        Self {
            db: db::get_db_client(),
        }
    }

    pub async fn init_table(&self) -> Result<()> {
        let sql = r#"
            CREATE TABLE IF NOT EXISTS `ad_budget_approval` (
                `id` BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
                `month` VARCHAR(10) NOT NULL,
                `amount_cents` BIGINT NOT NULL,
                `status` VARCHAR(16) NOT NULL DEFAULT 'pending',
                `approved_by` BIGINT NULL,
                `approved_at` DATETIME NULL,
                `notes` TEXT NULL,
                `created_at` DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                KEY `idx_month_status` (`month`, `status`)
            ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
        "#;
        self.db.exec(sql, vec![]).await?;
        Ok(())
    }

    /// 指定月份已批准的预算金额(分)
    pub async fn approved_amount_for_month(&self, month: &str) -> Result<Option<i64>> {
        let sql = "SELECT id, month, amount_cents, status, approved_by, notes \
                   FROM ad_budget_approval WHERE status = ? AND month = ? LIMIT 1";
        let rows: Vec<BudgetApprovalEntity> = self
            .db
            .query_decode(sql, vec![STATUS_APPROVED.to_string().into(), month.to_string().into()])
            .await?;
        Ok(rows.into_iter().next().map(|r| r.amount_cents))
    }

    /// 指定月份是否已有待审批记录
    pub async fn has_pending_for_month(&self, month: &str) -> Result<bool> {
        let sql = "SELECT COUNT(1) FROM ad_budget_approval WHERE month = ? AND status = ?";
        let count: u64 = self
            .db
            .query_decode(sql, vec![month.to_string().into(), STATUS_PENDING.to_string().into()])
            .await?;
        Ok(count > 0)
    }

    /// 比较后插入: 同月已有 pending 时不插入, 返回是否真的写入了。
    /// 并发的提案任务靠这条语句在存储层去重。
    pub async fn insert_pending_if_absent(
        &self,
        month: &str,
        amount_cents: i64,
        notes: &str,
    ) -> Result<bool> {
        let sql = "INSERT INTO ad_budget_approval (month, amount_cents, status, notes) \
                   SELECT ?, ?, 'pending', ? FROM DUAL \
                   WHERE NOT EXISTS (SELECT 1 FROM ad_budget_approval WHERE month = ? AND status = 'pending')";
        let params: Vec<rbs::Value> = vec![
            month.to_string().into(),
            amount_cents.into(),
            notes.to_string().into(),
            month.to_string().into(),
        ];
        let res = self.db.exec(sql, params).await?;
        debug!("insert_pending_if_absent month={} rows={}", month, res.rows_affected);
        Ok(res.rows_affected > 0)
    }
}
