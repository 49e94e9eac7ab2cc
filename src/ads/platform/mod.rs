use std::env;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio_retry::strategy::FixedInterval;
use tokio_retry::Retry;
use tracing::debug;

use crate::error::AppError;

pub mod campaigns;

const REQUEST_TIMEOUT_SECS: u64 = 15;
const RETRY_ATTEMPTS: usize = 2;
const RETRY_DELAY_MS: u64 = 500;

/// 平台凭证, 全部来自环境变量
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    pub base_url: String,
    pub developer_token: String,
    pub access_token: String,
    pub customer_id: String,
}

impl PlatformConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let developer_token = env::var("ADS_PLATFORM_DEVELOPER_TOKEN");
        let access_token = env::var("ADS_PLATFORM_ACCESS_TOKEN");
        let customer_id = env::var("ADS_PLATFORM_CUSTOMER_ID");
        match (developer_token, access_token, customer_id) {
            (Ok(developer_token), Ok(access_token), Ok(customer_id)) => Ok(Self {
                base_url: env::var("ADS_PLATFORM_BASE_URL")
                    .unwrap_or_else(|_| "https://ads.googleapis.com".to_string()),
                developer_token,
                access_token,
                customer_id,
            }),
            _ => Err(AppError::PlatformNotConfigured),
        }
    }
}

/// mutate 响应: 逐操作的资源名, 外加可选的部分失败错误。
/// 平台层面的拒绝必须与传输层失败区分开。
#[derive(Debug, Deserialize)]
pub struct MutateResponse {
    #[serde(default)]
    pub results: Vec<MutateResult>,
    pub partial_failure_error: Option<PlatformStatus>,
}

#[derive(Debug, Deserialize)]
pub struct MutateResult {
    pub resource_name: String,
}

#[derive(Debug, Deserialize)]
pub struct PlatformStatus {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct PlatformErrorBody {
    error: PlatformStatus,
}

/// 广告平台客户端。进程启动时构建一次, 按引用传入各组件,
/// 不做任何惰性全局初始化。
pub struct AdsPlatformClient {
    client: Client,
    cfg: PlatformConfig,
}

impl AdsPlatformClient {
    pub fn from_env() -> Result<Self, AppError> {
        let cfg = PlatformConfig::from_env()?;
        Self::new(cfg)
    }

    pub fn new(cfg: PlatformConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Unknown(format!("构建HTTP客户端失败: {}", e)))?;
        Ok(Self { client, cfg })
    }

    pub fn customer_id(&self) -> &str {
        &self.cfg.customer_id
    }

    /// 发送请求并解析响应。只在传输层失败时重试;
    /// 平台返回的业务错误原样上抛, 不重试。
    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        op: &str,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, AppError> {
        let url = format!("{}{}", self.cfg.base_url, path);
        let payload = body.to_string();

        let strategy = FixedInterval::from_millis(RETRY_DELAY_MS).take(RETRY_ATTEMPTS);
        let response = Retry::spawn(strategy, || async {
            self.client
                .post(&url)
                .header("Authorization", format!("Bearer {}", self.cfg.access_token))
                .header("developer-token", &self.cfg.developer_token)
                .header("Content-Type", "application/json")
                .body(payload.clone())
                .send()
                .await
        })
        .await
        .map_err(|e| AppError::PlatformTransport {
            op: op.to_string(),
            msg: e.to_string(),
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::PlatformTransport {
                op: op.to_string(),
                msg: e.to_string(),
            })?;
        debug!("platform op={} status={} body={}", op, status, text);

        if status.is_success() {
            serde_json::from_str::<T>(&text).map_err(|e| AppError::PlatformTransport {
                op: op.to_string(),
                msg: format!("解析响应失败: {}", e),
            })
        } else {
            let msg = serde_json::from_str::<PlatformErrorBody>(&text)
                .map(|b| b.error.message)
                .unwrap_or(text);
            Err(AppError::PlatformRejected {
                op: op.to_string(),
                msg,
            })
        }
    }

    /// 批量资源变更。部分失败按平台拒绝处理上抛。
    pub(crate) async fn mutate(
        &self,
        op: &str,
        operations: Vec<serde_json::Value>,
    ) -> Result<Vec<String>, AppError> {
        let path = format!("/v16/customers/{}/googleAds:mutate", self.cfg.customer_id);
        let body = serde_json::json!({
            "mutate_operations": operations,
            "partial_failure": false,
        });
        let res: MutateResponse = self.post_json(op, &path, &body).await?;
        if let Some(err) = res.partial_failure_error {
            return Err(AppError::PlatformRejected {
                op: op.to_string(),
                msg: format!("partial failure ({}): {}", err.code, err.message),
            });
        }
        Ok(res.results.into_iter().map(|r| r.resource_name).collect())
    }
}
