use std::env;
use std::time::Duration;

use lettre::message::header;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{error, info, warn};

/// 邮件通知是否已配置
pub fn is_email_configured() -> bool {
    env::var("EMAIL_TO").is_ok()
        && env::var("EMAIL_SEND_USERNAME").is_ok()
        && env::var("EMAIL_SEND_PASSWORD").is_ok()
}

/// 给系统负责人发送通知邮件, 返回是否送达。
/// 发送失败只记录日志, 绝不让调度任务崩溃。
pub async fn send_email(title: &str, body: String) -> bool {
    if !is_email_configured() {
        warn!("邮件通知未配置, 丢弃通知: {}", title);
        return false;
    }

    // SMTP 服务器地址和端口
    let smtp_server = env::var("EMAIL_SMTP_SERVER").unwrap_or_else(|_| "smtp.gmail.com".to_string());
    let smtp_port: u16 = env::var("EMAIL_SMTP_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(587);

    // 发件人和收件人
    let from = env::var("EMAIL_FROM").unwrap_or_else(|_| {
        env::var("EMAIL_SEND_USERNAME").unwrap_or_default()
    });
    let to = match env::var("EMAIL_TO") {
        Ok(v) => v,
        Err(_) => return false,
    };

    // 发件人邮箱的凭证
    let username = env::var("EMAIL_SEND_USERNAME").unwrap_or_default();
    let password = env::var("EMAIL_SEND_PASSWORD").unwrap_or_default();

    // 创建邮件内容
    let email = match Message::builder()
        .from(match from.parse() {
            Ok(v) => v,
            Err(e) => {
                error!("发件人地址无效 {}: {}", from, e);
                return false;
            }
        })
        .to(match to.parse() {
            Ok(v) => v,
            Err(e) => {
                error!("收件人地址无效 {}: {}", to, e);
                return false;
            }
        })
        .subject(title)
        .header(header::ContentType::TEXT_PLAIN)
        .body(body)
    {
        Ok(m) => m,
        Err(e) => {
            error!("构建邮件失败: {}", e);
            return false;
        }
    };

    let creds = Credentials::new(username, password);

    let mailer = match SmtpTransport::starttls_relay(&smtp_server) {
        Ok(builder) => builder
            .port(smtp_port)
            .credentials(creds)
            // 外部调用必须有界超时, 不能拖死调度循环
            .timeout(Some(Duration::from_secs(20)))
            .build(),
        Err(e) => {
            error!("构建SMTP客户端失败: {}", e);
            return false;
        }
    };

    // SMTP 发送是同步阻塞的, 放到阻塞线程池里执行
    let title_owned = title.to_string();
    let result = tokio::task::spawn_blocking(move || mailer.send(&email)).await;

    match result {
        Ok(Ok(_)) => {
            info!("通知邮件已发送: {}", title_owned);
            true
        }
        Ok(Err(e)) => {
            error!("通知邮件发送失败 {}: {:?}", title_owned, e);
            false
        }
        Err(e) => {
            error!("通知邮件任务异常 {}: {:?}", title_owned, e);
            false
        }
    }
}
