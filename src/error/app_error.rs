use thiserror::Error;

/// 应用错误
#[derive(Error, Debug)]
pub enum AppError {
    /// 业务错误
    #[error("业务错误: {0}")]
    BizError(String),

    /// 数据库错误
    #[error("数据库错误: {0}")]
    DbError(String),

    /// 广告平台未配置, 调用方应当作无操作处理
    #[error("广告平台未配置")]
    PlatformNotConfigured,

    /// 广告平台在业务层面拒绝了操作(校验失败/部分失败等)
    #[error("广告平台拒绝 [{op}]: {msg}")]
    PlatformRejected { op: String, msg: String },

    /// 传输层失败(网络/超时), 与平台拒绝区分开
    #[error("广告平台请求失败 [{op}]: {msg}")]
    PlatformTransport { op: String, msg: String },

    /// 文案生成失败, 调用方必须使用兜底文案恢复
    #[error("文案生成失败: {0}")]
    CopywriterError(String),

    /// 未知错误
    #[error("未知错误: {0}")]
    Unknown(String),
}

impl From<rbatis::Error> for AppError {
    fn from(err: rbatis::Error) -> Self {
        AppError::DbError(err.to_string())
    }
}
