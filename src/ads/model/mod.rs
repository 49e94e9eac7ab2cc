pub mod budget_approval;
pub mod campaign;
pub mod performance;

use anyhow::Result;

/// 启动时建表, 幂等
pub async fn init_tables() -> Result<()> {
    budget_approval::BudgetApprovalModel::new().await.init_table().await?;
    campaign::CampaignModel::new().await.init_table().await?;
    performance::PerformanceModel::new().await.init_table().await?;
    Ok(())
}
