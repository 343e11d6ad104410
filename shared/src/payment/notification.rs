//! Gateway callback wire format
//!
//! 网关异步回调 (webhook) 的数据结构。回调投递语义为至少一次、可能乱序，
//! 因此每条通知必须携带可去重的事件标识。

use serde::{Deserialize, Serialize};

/// 网关回调中的交易信号
///
/// Unknown signal strings deserialize to [`TransactionSignal::Other`] so a
/// gateway rollout of new signal types cannot make the callback endpoint
/// reject (and therefore endlessly retry) the delivery.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionSignal {
    /// 卡支付扣款完成 (需结合 fraud_status 判定)
    Capture,
    /// 非卡渠道到账
    Settlement,
    /// 等待用户完成支付
    Pending,
    /// 用户/商户取消
    Cancel,
    /// 网关拒绝
    Deny,
    /// 支付超时过期
    Expire,
    /// 未识别的信号
    #[serde(other)]
    Other,
}

impl std::fmt::Display for TransactionSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TransactionSignal::Capture => "capture",
            TransactionSignal::Settlement => "settlement",
            TransactionSignal::Pending => "pending",
            TransactionSignal::Cancel => "cancel",
            TransactionSignal::Deny => "deny",
            TransactionSignal::Expire => "expire",
            TransactionSignal::Other => "other",
        };
        write!(f, "{s}")
    }
}

/// 风控结果
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FraudStatus {
    /// 风控通过
    Accept,
    /// 转人工审核
    Challenge,
    /// 风控拒绝
    Deny,
    /// 未识别的结果
    #[serde(other)]
    Other,
}

impl std::fmt::Display for FraudStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FraudStatus::Accept => "accept",
            FraudStatus::Challenge => "challenge",
            FraudStatus::Deny => "deny",
            FraudStatus::Other => "other",
        };
        write!(f, "{s}")
    }
}

/// 网关回调载荷
///
/// `gross_amount` arrives as a decimal string (`"2500000.00"`); the signature
/// covers the raw string, so it is kept verbatim and only converted to minor
/// units at comparison time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayNotification {
    pub order_id: String,
    /// 网关侧交易 ID
    pub transaction_id: String,
    /// 显式事件 ID (部分网关提供；缺失时由 transaction_id + 信号派生)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    /// 网关状态码 (参与签名)
    pub status_code: String,
    /// 金额字符串 (参与签名)
    pub gross_amount: String,
    /// SHA-512 签名
    pub signature_key: String,
    pub transaction_status: TransactionSignal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fraud_status: Option<FraudStatus>,
}

impl GatewayNotification {
    /// 事件标识 - 去重的键
    ///
    /// 同一 transaction_id 会随状态推进产生多条通知 (例如 capture/challenge
    /// 之后再来 capture/accept)，因此派生标识必须包含信号与风控结果。
    pub fn event_identity(&self) -> String {
        if let Some(id) = &self.event_id {
            return id.clone();
        }
        match self.fraud_status {
            Some(f) => format!("{}:{}:{}", self.transaction_id, self.transaction_status, f),
            None => format!("{}:{}", self.transaction_id, self.transaction_status),
        }
    }

    /// 金额字符串转最小货币单位
    ///
    /// 只接受整数金额，可带全零的小数部分 (`"2500000"` 或 `"2500000.00"`)。
    /// 其他形式一律返回 None，由调用方作为金额不符拒绝。
    pub fn amount_minor(&self) -> Option<u64> {
        parse_gross_amount(&self.gross_amount)
    }
}

/// Parse a gateway amount string into minor units
pub fn parse_gross_amount(raw: &str) -> Option<u64> {
    let (whole, frac) = match raw.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (raw, None),
    };
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if let Some(f) = frac
        && (f.is_empty() || !f.bytes().all(|b| b == b'0'))
    {
        return None;
    }
    whole.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(status: TransactionSignal, fraud: Option<FraudStatus>) -> GatewayNotification {
        GatewayNotification {
            order_id: "ORDER-1".to_string(),
            transaction_id: "txn-1".to_string(),
            event_id: None,
            status_code: "200".to_string(),
            gross_amount: "2500000.00".to_string(),
            signature_key: String::new(),
            transaction_status: status,
            fraud_status: fraud,
        }
    }

    #[test]
    fn amount_parsing_accepts_integer_forms_only() {
        assert_eq!(parse_gross_amount("2500000.00"), Some(2_500_000));
        assert_eq!(parse_gross_amount("2500000"), Some(2_500_000));
        assert_eq!(parse_gross_amount("0"), Some(0));
        assert_eq!(parse_gross_amount("2500000.50"), None);
        assert_eq!(parse_gross_amount("2500000."), None);
        assert_eq!(parse_gross_amount(".00"), None);
        assert_eq!(parse_gross_amount("25a0"), None);
        assert_eq!(parse_gross_amount("-1"), None);
        assert_eq!(parse_gross_amount(""), None);
    }

    #[test]
    fn derived_event_identity_distinguishes_fraud_outcomes() {
        let challenge = notification(
            TransactionSignal::Capture,
            Some(FraudStatus::Challenge),
        );
        let accept = notification(TransactionSignal::Capture, Some(FraudStatus::Accept));
        assert_ne!(challenge.event_identity(), accept.event_identity());
    }

    #[test]
    fn explicit_event_id_wins_over_derivation() {
        let mut n = notification(TransactionSignal::Settlement, None);
        n.event_id = Some("e1".to_string());
        assert_eq!(n.event_identity(), "e1");
    }

    #[test]
    fn unknown_signal_strings_deserialize_to_other() {
        let json = r#"{
            "order_id": "ORDER-1",
            "transaction_id": "txn-1",
            "status_code": "200",
            "gross_amount": "100",
            "signature_key": "",
            "transaction_status": "refund"
        }"#;
        let n: GatewayNotification = serde_json::from_str(json).unwrap();
        assert_eq!(n.transaction_status, TransactionSignal::Other);
    }
}
