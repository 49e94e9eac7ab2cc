use std::env;

use anyhow::Result;
use redis::aio::MultiplexedConnection;
use redis::Client;

/// Whether a Redis endpoint is configured; task locks degrade to
/// single-leader mode when it is not.
pub fn is_redis_configured() -> bool {
    env::var("REDIS_HOST").is_ok()
}

/// Get a Redis multiplexed async connection using REDIS_HOST from env
pub async fn get_redis_connection() -> Result<MultiplexedConnection> {
    let url = env::var("REDIS_HOST").unwrap_or_else(|_| "redis://127.0.0.1/".to_string());
    let client = Client::open(url)?;
    let conn = client.get_multiplexed_async_connection().await?;
    Ok(conn)
}

/// Helper to build the advisory lock key for a scheduled task
pub fn task_lock_key(task_name: &str) -> String {
    format!("ads_task_lock:{}", task_name)
}
