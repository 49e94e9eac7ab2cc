use anyhow::Result;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::app_config::redis::{get_redis_connection, is_redis_configured, task_lock_key};

/// 跨实例的任务互斥锁。定时任务运行前按任务名抢锁,
/// 跑完无条件释放; 进程崩溃时靠TTL过期兜底。
/// Redis 未配置时降级为单实例假设(只告警, 不阻塞)。
pub struct TaskLock {
    key: String,
    token: String,
    backed: bool,
}

pub enum AcquireOutcome {
    /// 抢到锁(或降级模式下直接放行)
    Acquired(TaskLock),
    /// 锁被其他实例持有, 本轮跳过
    Held,
}

impl TaskLock {
    pub async fn acquire(task_name: &str, ttl_secs: u64) -> AcquireOutcome {
        let key = task_lock_key(task_name);
        let token = Uuid::new_v4().to_string();

        if !is_redis_configured() {
            warn!("Redis 未配置, 任务锁降级为单实例模式: {}", task_name);
            return AcquireOutcome::Acquired(TaskLock {
                key,
                token,
                backed: false,
            });
        }

        match Self::try_set_nx(&key, &token, ttl_secs).await {
            Ok(true) => {
                debug!("任务锁已获取: {}", key);
                AcquireOutcome::Acquired(TaskLock {
                    key,
                    token,
                    backed: true,
                })
            }
            Ok(false) => AcquireOutcome::Held,
            Err(e) => {
                // 锁服务故障不能让调度彻底停摆, 降级继续
                warn!("获取任务锁失败, 降级继续执行 {}: {}", key, e);
                AcquireOutcome::Acquired(TaskLock {
                    key,
                    token,
                    backed: false,
                })
            }
        }
    }

    async fn try_set_nx(key: &str, token: &str, ttl_secs: u64) -> Result<bool> {
        let mut conn = get_redis_connection().await?;
        let res: redis::Value = redis::cmd("SET")
            .arg(key)
            .arg(token)
            .arg("NX")
            .arg("EX")
            .arg(ttl_secs)
            .query_async(&mut conn)
            .await?;
        Ok(!matches!(res, redis::Value::Nil))
    }

    /// 释放锁。只删除仍由自己持有的key(token比对),
    /// 避免误删一把已经过期又被别人抢走的锁。
    pub async fn release(self) {
        if !self.backed {
            return;
        }
        let script = r#"
            if redis.call('GET', KEYS[1]) == ARGV[1] then
                return redis.call('DEL', KEYS[1])
            else
                return 0
            end
        "#;
        match get_redis_connection().await {
            Ok(mut conn) => {
                let res: Result<i64, redis::RedisError> = redis::Script::new(script)
                    .key(&self.key)
                    .arg(&self.token)
                    .invoke_async(&mut conn)
                    .await;
                match res {
                    Ok(_) => debug!("任务锁已释放: {}", self.key),
                    Err(e) => warn!("释放任务锁失败(将靠TTL过期) {}: {}", self.key, e),
                }
            }
            Err(e) => warn!("释放任务锁失败(将靠TTL过期) {}: {}", self.key, e),
        }
    }
}
