use std::sync::Arc;

use tracing::{info, warn};

use crate::ads::config::{CampaignTemplate, EngineConfig, OptimizationConfig};
use crate::ads::copywriter::CopywriterClient;
use crate::ads::platform::AdsPlatformClient;
use crate::error::AppError;

pub mod config;
pub mod copywriter;
pub mod model;
pub mod platform;
pub mod services;
pub mod strategy;
pub mod task;

/// 引擎上下文: 进程启动时构建一次, 按引用传给所有组件。
/// 平台/文案客户端缺少配置时为 None, 相关操作整体降级为无操作。
pub struct AdsEngine {
    pub platform: Option<Arc<AdsPlatformClient>>,
    pub copywriter: Option<Arc<CopywriterClient>>,
    pub optimization: OptimizationConfig,
    pub engine_cfg: EngineConfig,
    pub template: CampaignTemplate,
}

impl AdsEngine {
    pub fn from_env() -> Self {
        let platform = match AdsPlatformClient::from_env() {
            Ok(client) => Some(Arc::new(client)),
            Err(AppError::PlatformNotConfigured) => {
                warn!("广告平台未配置, 相关操作将跳过");
                None
            }
            Err(e) => {
                warn!("广告平台客户端初始化失败: {}", e);
                None
            }
        };
        let copywriter = match CopywriterClient::from_env() {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                warn!("文案生成服务未配置, 将使用兜底文案: {}", e);
                None
            }
        };

        let engine = Self {
            platform,
            copywriter,
            optimization: OptimizationConfig::from_env(),
            engine_cfg: EngineConfig::from_env(),
            template: CampaignTemplate::default(),
        };
        info!(
            "广告引擎已构建: platform_configured={}, copywriter_configured={}",
            engine.platform.is_some(),
            engine.copywriter.is_some()
        );
        engine
    }
}

/// 金额统一用最小货币单位(分)存储, 只在展示时转为元
pub fn format_cents(cents: i64) -> String {
    format!("${:.2}", cents as f64 / 100.0)
}

pub fn format_cents_f(cents: f64) -> String {
    format!("${:.2}", cents / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(300_000), "$3000.00");
        assert_eq!(format_cents(42), "$0.42");
        assert_eq!(format_cents_f(2500.0), "$25.00");
    }
}
