//! Durable order record
//!
//! 订单记录 - 一次结账尝试及其支付状态的持久化表示。
//! 记录只通过协调器的事务路径变更，历史只追加、从不截断。

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::PaymentStatus;

/// 客户信息快照 (随网关会话提交)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

/// 状态历史条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEntry {
    pub status: PaymentStatus,
    /// 触发此条目的事件标识 ("initiate" 表示本地创建)
    pub source_event_id: String,
    /// 观察时间 (Unix 毫秒)
    pub observed_at: i64,
    /// 重复投递标记 (审计用；状态未变更)
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub duplicate: bool,
}

/// Order record — one checkout attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    /// 全局唯一，创建时分配，不可变
    pub order_id: String,
    /// 项目目录引用 (只读查找键)
    pub project_id: String,
    /// 金额 (最小货币单位)，创建后不可变
    pub gross_amount: u64,
    pub status: PaymentStatus,
    /// 只追加的状态历史
    pub status_history: Vec<StatusEntry>,
    /// 最近一次已应用回调的事件标识
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_event_id: Option<String>,
    /// 网关会话令牌 (会话创建成功后补写)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    pub customer: CustomerDetails,
    pub created_at: i64,
    pub updated_at: i64,
}

/// History source marker for the local creation entry
const SOURCE_INITIATE: &str = "initiate";

impl OrderRecord {
    /// 创建新订单记录，状态为 Created
    ///
    /// order_id 在此一次性分配；必须在任何网关会话请求之前持久化。
    pub fn new(project_id: String, gross_amount: u64, customer: CustomerDetails) -> Self {
        let now = Utc::now().timestamp_millis();
        let order_id = format!("ORDER-{}", Uuid::new_v4());
        Self {
            order_id,
            project_id,
            gross_amount,
            status: PaymentStatus::Created,
            status_history: vec![StatusEntry {
                status: PaymentStatus::Created,
                source_event_id: SOURCE_INITIATE.to_string(),
                observed_at: now,
                duplicate: false,
            }],
            last_event_id: None,
            session_token: None,
            customer,
            created_at: now,
            updated_at: now,
        }
    }

    /// 事件是否已应用过 (去重检查覆盖整个历史，而非仅最近事件，
    /// 以抵御乱序重投)
    pub fn has_applied(&self, event_id: &str) -> bool {
        self.last_event_id.as_deref() == Some(event_id)
            || self
                .status_history
                .iter()
                .any(|e| !e.duplicate && e.source_event_id == event_id)
    }

    /// 应用一次状态转移：更新状态、追加历史、记录事件标识
    pub fn apply_transition(&mut self, next: PaymentStatus, event_id: &str) {
        let now = Utc::now().timestamp_millis();
        self.status = next;
        self.status_history.push(StatusEntry {
            status: next,
            source_event_id: event_id.to_string(),
            observed_at: now,
            duplicate: false,
        });
        self.last_event_id = Some(event_id.to_string());
        self.updated_at = now;
    }

    /// 记录一次重复投递 (状态不变，仅审计)
    pub fn record_duplicate(&mut self, event_id: &str) {
        let now = Utc::now().timestamp_millis();
        self.status_history.push(StatusEntry {
            status: self.status,
            source_event_id: event_id.to_string(),
            observed_at: now,
            duplicate: true,
        });
        self.updated_at = now;
    }

    /// 非重复历史条目数
    pub fn applied_len(&self) -> usize {
        self.status_history.iter().filter(|e| !e.duplicate).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> CustomerDetails {
        CustomerDetails {
            first_name: "Budi".to_string(),
            last_name: "Santoso".to_string(),
            email: "budi.santoso@example.com".to_string(),
            phone: "08123456789".to_string(),
        }
    }

    #[test]
    fn new_record_starts_created_with_one_history_entry() {
        let record = OrderRecord::new("2".to_string(), 2_500_000, customer());
        assert!(record.order_id.starts_with("ORDER-"));
        assert_eq!(record.status, PaymentStatus::Created);
        assert_eq!(record.status_history.len(), 1);
        assert!(record.last_event_id.is_none());
    }

    #[test]
    fn order_ids_are_unique() {
        let a = OrderRecord::new("1".to_string(), 100, customer());
        let b = OrderRecord::new("1".to_string(), 100, customer());
        assert_ne!(a.order_id, b.order_id);
    }

    #[test]
    fn transition_appends_history_and_tracks_event() {
        let mut record = OrderRecord::new("2".to_string(), 2_500_000, customer());
        record.apply_transition(PaymentStatus::Success, "e1");
        assert_eq!(record.status, PaymentStatus::Success);
        assert_eq!(record.status_history.len(), 2);
        assert_eq!(record.last_event_id.as_deref(), Some("e1"));
        assert!(record.has_applied("e1"));
    }

    #[test]
    fn duplicate_marker_does_not_count_as_applied() {
        let mut record = OrderRecord::new("2".to_string(), 2_500_000, customer());
        record.apply_transition(PaymentStatus::Pending, "e1");
        record.record_duplicate("e1");
        assert_eq!(record.status, PaymentStatus::Pending);
        assert_eq!(record.applied_len(), 2); // created + pending
        assert_eq!(record.status_history.len(), 3);
    }

    #[test]
    fn has_applied_sees_events_older_than_the_last_one() {
        let mut record = OrderRecord::new("2".to_string(), 2_500_000, customer());
        record.apply_transition(PaymentStatus::Pending, "e1");
        record.apply_transition(PaymentStatus::Success, "e2");
        assert!(record.has_applied("e1"));
        assert!(record.has_applied("e2"));
        assert!(!record.has_applied("e3"));
    }
}
