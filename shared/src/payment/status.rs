//! Order payment status
//!
//! 订单支付状态 - 封闭枚举，消除对网关状态字符串的直接分支

use serde::{Deserialize, Serialize};

/// 支付状态
///
/// 状态只能通过协调器的转移表变更；`Success`/`Failure`/`Expired`/`Cancelled`
/// 为终态，进入终态后任何后续回调都不再改变状态。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// 已创建 (网关会话请求前的本地记录)
    Created,
    /// 等待付款
    Pending,
    /// 风控人工审核中
    Challenge,
    /// 支付成功
    Success,
    /// 支付失败 (网关拒绝)
    Failure,
    /// 已过期
    Expired,
    /// 已取消
    Cancelled,
}

impl PaymentStatus {
    /// 是否终态
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PaymentStatus::Success
                | PaymentStatus::Failure
                | PaymentStatus::Expired
                | PaymentStatus::Cancelled
        )
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentStatus::Created => "created",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Challenge => "challenge",
            PaymentStatus::Success => "success",
            PaymentStatus::Failure => "failure",
            PaymentStatus::Expired => "expired",
            PaymentStatus::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}
