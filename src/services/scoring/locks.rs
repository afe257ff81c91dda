//! 按 ID 划分的互斥锁
//!
//! - 科目锁：同一科目的重新分配、重缩放与提交写入互斥执行，不同科目之间互不影响。
//! - 学生锁：学生总分是跨科目的汇总值，所有写总分的路径都在学生锁内完成读改写。
//!
//! 需要同时持有两种锁时，总是先取科目锁再取学生锁。

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Default)]
pub struct KeyedLocks {
    locks: DashMap<i64, Arc<Mutex<()>>>,
}

pub type SubjectLocks = KeyedLocks;
pub type StudentLocks = KeyedLocks;

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取锁，持有返回的守卫期间其他同 ID 操作等待
    pub async fn acquire(&self, id: i64) -> OwnedMutexGuard<()> {
        // 先克隆 Arc 再等待，避免持有 DashMap 分片锁跨越 await
        let lock = self.locks.entry(id).or_default().clone();
        lock.lock_owned().await
    }

    /// 移除无人持有也无人等待的锁，返回是否移除
    pub fn forget(&self, id: i64) -> bool {
        self.locks
            .remove_if(&id, |_, lock| Arc::strong_count(lock) == 1)
            .is_some()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.locks.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    #[cfg(test)]
    fn is_locked(&self, id: i64) -> bool {
        self.locks
            .get(&id)
            .is_some_and(|lock| lock.try_lock().is_err())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_id_is_exclusive() {
        let locks = Arc::new(SubjectLocks::new());
        let guard = locks.acquire(1).await;
        assert!(locks.is_locked(1));

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(1).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        waiter.await.unwrap();
        assert!(!locks.is_locked(1));
    }

    #[tokio::test]
    async fn test_different_ids_do_not_block() {
        let locks = SubjectLocks::new();
        let _first = locks.acquire(1).await;
        let second = tokio::time::timeout(Duration::from_millis(50), locks.acquire(2)).await;
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn test_forget_only_removes_idle_locks() {
        let locks = StudentLocks::new();
        let guard = locks.acquire(7).await;
        assert!(!locks.forget(7));
        assert_eq!(locks.len(), 1);

        drop(guard);
        assert!(locks.forget(7));
        assert!(locks.is_empty());
        assert!(!locks.forget(7));
    }
}
