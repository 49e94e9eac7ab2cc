use std::env;
use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::error::AppError;

/// 文案的结构化输出约定: 数量固定, 长度有上限
pub const HEADLINE_COUNT: usize = 10;
pub const DESCRIPTION_COUNT: usize = 4;
pub const MAX_HEADLINE_LEN: usize = 30;
pub const MAX_DESCRIPTION_LEN: usize = 90;

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdCopy {
    pub headlines: Vec<String>,
    pub descriptions: Vec<String>,
}

/// 校验结构化输出: 条数必须精确, 长度不能超限
pub fn validate_ad_copy(ad_copy: &AdCopy) -> Result<()> {
    if ad_copy.headlines.len() != HEADLINE_COUNT {
        return Err(anyhow!(
            "标题数量错误: {} != {}",
            ad_copy.headlines.len(),
            HEADLINE_COUNT
        ));
    }
    if ad_copy.descriptions.len() != DESCRIPTION_COUNT {
        return Err(anyhow!(
            "描述数量错误: {} != {}",
            ad_copy.descriptions.len(),
            DESCRIPTION_COUNT
        ));
    }
    if let Some(h) = ad_copy.headlines.iter().find(|h| h.is_empty() || h.chars().count() > MAX_HEADLINE_LEN) {
        return Err(anyhow!("标题长度超限: {:?}", h));
    }
    if let Some(d) = ad_copy
        .descriptions
        .iter()
        .find(|d| d.is_empty() || d.chars().count() > MAX_DESCRIPTION_LEN)
    {
        return Err(anyhow!("描述长度超限: {:?}", d));
    }
    Ok(())
}

/// 精选的兜底文案。生成服务不可用时整个创建流程依赖它,
/// 所以内容必须始终满足 validate_ad_copy。
pub fn fallback_ad_copy() -> AdCopy {
    AdCopy {
        headlines: vec![
            "Get Free Solar Quotes Today".to_string(),
            "Compare Top Solar Installers".to_string(),
            "Save $1000s On Power Bills".to_string(),
            "CEC Accredited Installers".to_string(),
            "Solar Panels From $3,990".to_string(),
            "Australia's #1 Solar Platform".to_string(),
            "100% Free Quote Service".to_string(),
            "Get 3 Quotes In 24 Hours".to_string(),
            "Premium Solar Systems".to_string(),
            "Solar Specialists Near You".to_string(),
        ],
        descriptions: vec![
            "Get matched with verified solar installers. Compare quotes and save thousands.".to_string(),
            "Three competitive quotes from CEC accredited installers in 24 hours. No obligation.".to_string(),
            "Save up to 80% on electricity bills with premium solar systems from top installers.".to_string(),
            "Australia's first autonomous solar platform. Quotes from verified installers near you.".to_string(),
        ],
    }
}

fn build_copy_prompt() -> String {
    format!(
        "Generate search ads copy for a solar panel lead generation service in Australia.\n\n\
         Business: SolarlyAU - connects homeowners with verified solar installers\n\
         Value proposition: Free quotes, CEC accredited installers, save on electricity bills\n\
         Target audience: Australian homeowners in QLD, NSW, WA, SA\n\n\
         Generate:\n\
         1. {} compelling headlines (max {} characters each)\n\
         2. {} descriptions (max {} characters each)\n\n\
         Focus on: savings, free service, verified installers, quick quotes\n\
         Tone: Professional, trustworthy, benefit-focused\n\n\
         Return ONLY valid JSON in this exact format:\n\
         {{\"headlines\": [\"headline1\", ...], \"descriptions\": [\"desc1\", ...]}}",
        HEADLINE_COUNT, MAX_HEADLINE_LEN, DESCRIPTION_COUNT, MAX_DESCRIPTION_LEN
    )
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// 文案生成服务客户端(OpenAI 兼容的 chat completions 接口)
pub struct CopywriterClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl CopywriterClient {
    pub fn from_env() -> Result<Self, AppError> {
        let api_key = env::var("COPYWRITER_API_KEY")
            .map_err(|_| AppError::CopywriterError("COPYWRITER_API_KEY 未配置".to_string()))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::CopywriterError(format!("构建HTTP客户端失败: {}", e)))?;
        Ok(Self {
            client,
            api_key,
            base_url: env::var("COPYWRITER_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com".to_string()),
            model: env::var("COPYWRITER_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
        })
    }

    /// 请求结构化文案。任何失败(超时/格式错误/数量不符)都上抛,
    /// 由调用方用兜底文案恢复。
    pub async fn generate_ad_copy(&self) -> Result<AdCopy> {
        let body = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": "You are an expert search ads copywriter. Return only valid JSON.",
                },
                {
                    "role": "user",
                    "content": build_copy_prompt(),
                },
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "ad_copy",
                    "strict": true,
                    "schema": {
                        "type": "object",
                        "properties": {
                            "headlines": {
                                "type": "array",
                                "items": {"type": "string"},
                                "minItems": HEADLINE_COUNT,
                                "maxItems": HEADLINE_COUNT,
                            },
                            "descriptions": {
                                "type": "array",
                                "items": {"type": "string"},
                                "minItems": DESCRIPTION_COUNT,
                                "maxItems": DESCRIPTION_COUNT,
                            },
                        },
                        "required": ["headlines", "descriptions"],
                        "additionalProperties": false,
                    },
                },
            },
        });

        let url = format!("{}/v1/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(anyhow!("文案服务返回 {}: {}", status, text));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow!("响应中没有内容"))?;

        let ad_copy: AdCopy = serde_json::from_str(&content)?;
        validate_ad_copy(&ad_copy)?;
        debug!("AI文案: {:?}", ad_copy);
        Ok(ad_copy)
    }
}

/// 生成文案, 失败时透明回退到兜底文案。
/// 这条调用永远不是活动创建流程的硬依赖。
pub async fn generate_or_fallback(client: Option<&CopywriterClient>) -> AdCopy {
    match client {
        Some(client) => match client.generate_ad_copy().await {
            Ok(ad_copy) => {
                info!("AI文案生成成功");
                ad_copy
            }
            Err(e) => {
                warn!("文案生成失败, 使用兜底文案: {}", e);
                fallback_ad_copy()
            }
        },
        None => {
            debug!("文案服务未配置, 使用兜底文案");
            fallback_ad_copy()
        }
    }
}
