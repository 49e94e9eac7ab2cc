use std::env;

use anyhow::{anyhow, Result};
use once_cell::sync::OnceCell;
use rbatis::RBatis;
use rbdc_mysql::MysqlDriver;

static DB_CLIENT: OnceCell<RBatis> = OnceCell::new();

/// 初始化数据库连接, 连接串来自 DB_HOST
pub async fn init_db() -> Result<&'static RBatis> {
    if let Some(rb) = DB_CLIENT.get() {
        return Ok(rb);
    }

    let url = env::var("DB_HOST").map_err(|_| anyhow!("DB_HOST config is none"))?;
    let rb = RBatis::new();
    rb.link(MysqlDriver {}, &url)
        .await
        .map_err(|e| anyhow!("Failed to connect db: {}", e))?;
    //这里建议 需要调整数据库的最大连接数
    if let Ok(pool) = rb.get_pool() {
        pool.set_max_open_conns(30).await;
    }

    let _ = DB_CLIENT.set(rb);
    Ok(DB_CLIENT.get().expect("DB_CLIENT is not initialized"))
}

pub fn get_db_client() -> &'static RBatis {
    DB_CLIENT.get().expect("DB_CLIENT is not initialized")
}
