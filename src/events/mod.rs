//! 账本变更广播
//!
//! 交易和预算的每次写入都会发布一个 [`LedgerEvent`]，
//! 订阅方（预算实时视图、SSE 连接）据此重新计算。

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;

/// 事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEventKind {
    TransactionAdded,
    TransactionUpdated,
    TransactionDeleted,
    BudgetChanged,
}

/// 某个用户的数据发生了变化
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    pub user_id: String,
    pub kind: LedgerEventKind,
}

impl LedgerEvent {
    pub fn new(user_id: impl Into<String>, kind: LedgerEventKind) -> Self {
        Self {
            user_id: user_id.into(),
            kind,
        }
    }
}

/// 基于 broadcast 的进程内变更流
///
/// 没有订阅者时发布直接丢弃；订阅者落后超过容量时会收到 `Lagged`。
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<LedgerEvent>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn publish(&self, event: LedgerEvent) {
        match self.sender.send(event) {
            Ok(receivers) => trace!("Ledger event delivered to {} receivers", receivers),
            Err(broadcast::error::SendError(event)) => {
                trace!("No subscribers for ledger event {:?}", event.kind)
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(crate::config::EventsConfig::default().channel_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers_is_fine() {
        let feed = ChangeFeed::new(4);
        feed.publish(LedgerEvent::new("u1", LedgerEventKind::BudgetChanged));
        assert_eq!(feed.receiver_count(), 0);
    }

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let feed = ChangeFeed::new(4);
        let mut a = feed.subscribe();
        let mut b = feed.subscribe();

        feed.publish(LedgerEvent::new("u1", LedgerEventKind::TransactionAdded));

        assert_eq!(a.recv().await.unwrap().kind, LedgerEventKind::TransactionAdded);
        assert_eq!(b.recv().await.unwrap().user_id, "u1");
    }

    #[tokio::test]
    async fn test_slow_subscriber_lags() {
        let feed = ChangeFeed::new(2);
        let mut rx = feed.subscribe();
        for _ in 0..5 {
            feed.publish(LedgerEvent::new("u1", LedgerEventKind::TransactionUpdated));
        }
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(_))
        ));
    }

    #[test]
    fn test_event_json() {
        let event = LedgerEvent::new("u1", LedgerEventKind::TransactionDeleted);
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"user_id":"u1","kind":"transaction_deleted"}"#);
    }
}
