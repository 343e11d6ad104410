//! Payment lifecycle coordinator
//!
//! 结账发起与回调对账的唯一入口。订单记录只通过这里的事务路径变更。
//!
//! # initiate
//!
//! 1. 校验金额与项目
//! 2. 生成 order_id 并持久化 created 记录 —— 先于任何网关调用，
//!    这样网关调用后崩溃也留有可追溯记录
//! 3. 请求网关会话 (有界超时)，失败时订单保持 created，调用方可重试
//! 4. 回填会话令牌并返回
//!
//! # apply_notification
//!
//! 签名校验 → 金额校验 → 幂等去重 → 终态保护 → 转移表 → 原子提交。
//! 签名通过后的一切内部拒绝都向网关确认 (非 2xx 会触发网关重投)。

use std::sync::Arc;

use shared::models::Project;
use shared::payment::{CustomerDetails, GatewayNotification, OrderRecord, PaymentStatus};

use crate::catalog::ProjectCatalog;
use crate::gateway::{ItemDetails, PaymentGateway, SessionRequest};
use crate::security_log;

use super::error::PaymentError;
use super::machine::{self, Transition};
use super::signature;
use super::storage::{OrderStore, StorageError};

/// 结账会话 (initiate 的返回值)
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub order_id: String,
    pub token: String,
    pub redirect_url: String,
}

/// 回调处理结果
///
/// 除 [`PaymentError`] 的签名/解析失败外，所有结果都应向网关确认。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// 应用了一次状态转移
    Applied {
        order_id: String,
        status: PaymentStatus,
    },
    /// 重复投递：状态未变，历史追加审计条目
    Duplicate { order_id: String, event_id: String },
    /// 终态保护：迟到/乱序回调被拒绝
    Stale {
        order_id: String,
        status: PaymentStatus,
    },
    /// 转移表中无此组合，忽略
    Unmapped { order_id: String },
    /// 本地无此订单 (例如网关侧测试交易)
    UnknownOrder { order_id: String },
}

/// Transaction lifecycle coordinator
pub struct PaymentCoordinator {
    store: OrderStore,
    gateway: Arc<dyn PaymentGateway>,
    catalog: Arc<ProjectCatalog>,
    server_key: String,
}

impl PaymentCoordinator {
    pub fn new(
        store: OrderStore,
        gateway: Arc<dyn PaymentGateway>,
        catalog: Arc<ProjectCatalog>,
        server_key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            gateway,
            catalog,
            server_key: server_key.into(),
        }
    }

    /// 发起结账
    pub async fn initiate(
        &self,
        project_id: &str,
        gross_amount: u64,
        customer: CustomerDetails,
    ) -> Result<CheckoutSession, PaymentError> {
        if gross_amount == 0 {
            return Err(PaymentError::Validation(
                "gross_amount must be positive".to_string(),
            ));
        }

        let project = self
            .catalog
            .find_by_id(project_id)
            .ok_or_else(|| PaymentError::ProjectNotFound(project_id.to_string()))?;

        // 金额与目录预算不强校验，仅留痕
        if project.budget != gross_amount {
            tracing::warn!(
                project_id = %project_id,
                budget = project.budget,
                gross_amount,
                "Checkout amount differs from catalog budget"
            );
        }

        let record = OrderRecord::new(project_id.to_string(), gross_amount, customer.clone());
        let order_id = record.order_id.clone();

        // 持久化 created 记录，先于网关调用
        let txn = self.store.begin_write()?;
        self.store.store_new(&txn, &record)?;
        txn.commit().map_err(StorageError::from)?;

        let request = SessionRequest {
            order_id: order_id.clone(),
            gross_amount,
            item: item_for_project(&project, gross_amount),
            customer,
        };

        let session = self.gateway.create_session(&request).await.map_err(|e| {
            // 订单保持 created，order_id 尚未在网关侧成为重复键，可安全重试
            tracing::warn!(order_id = %order_id, error = %e, "Gateway session request failed");
            PaymentError::GatewaySession(e.to_string())
        })?;

        // 回填会话令牌
        let txn = self.store.begin_write()?;
        if let Some(mut stored) = self.store.load_order(&txn, &order_id)? {
            stored.session_token = Some(session.token.clone());
            self.store.store_order(&txn, &stored)?;
            txn.commit().map_err(StorageError::from)?;
        }

        tracing::info!(order_id = %order_id, project_id = %project_id, "Checkout session created");

        Ok(CheckoutSession {
            order_id,
            token: session.token,
            redirect_url: session.redirect_url,
        })
    }

    /// 应用一条网关回调
    ///
    /// 整个 lookup-compute-commit 在单个写事务内完成；
    /// 未提交即返回的路径不产生任何可见变更。
    pub async fn apply_notification(&self, raw: &[u8]) -> Result<CallbackOutcome, PaymentError> {
        let notification: GatewayNotification = serde_json::from_slice(raw)
            .map_err(|e| PaymentError::MalformedCallback(e.to_string()))?;

        if !signature::verify(&notification, &self.server_key) {
            security_log!(
                "WARN",
                "callback_signature_invalid",
                order_id = notification.order_id.clone(),
                transaction_id = notification.transaction_id.clone()
            );
            return Err(PaymentError::UnauthorizedCallback(notification.order_id));
        }

        let event_id = notification.event_identity();

        let txn = self.store.begin_write()?;
        let mut record = match self.store.load_order(&txn, &notification.order_id)? {
            Some(r) => r,
            None => {
                tracing::warn!(
                    order_id = %notification.order_id,
                    "Callback for unknown order, acknowledging without state change"
                );
                return Ok(CallbackOutcome::UnknownOrder {
                    order_id: notification.order_id,
                });
            }
        };

        // 金额校验先于一切状态变更
        match notification.amount_minor() {
            Some(amount) if amount == record.gross_amount => {}
            _ => {
                security_log!(
                    "ERROR",
                    "callback_amount_mismatch",
                    order_id = record.order_id.clone(),
                    expected = record.gross_amount,
                    reported = notification.gross_amount.clone()
                );
                return Err(PaymentError::AmountMismatch {
                    order_id: record.order_id,
                    expected: record.gross_amount,
                    reported: notification.gross_amount,
                });
            }
        }

        // 幂等去重：同一事件最多提交一次转移
        if record.has_applied(&event_id) {
            record.record_duplicate(&event_id);
            self.store.store_order(&txn, &record)?;
            txn.commit().map_err(StorageError::from)?;
            tracing::info!(
                order_id = %record.order_id,
                event_id = %event_id,
                "Duplicate callback delivery, recorded for audit"
            );
            return Ok(CallbackOutcome::Duplicate {
                order_id: record.order_id,
                event_id,
            });
        }

        match machine::next_status(
            record.status,
            notification.transaction_status,
            notification.fraud_status,
        ) {
            Transition::Terminal => {
                tracing::warn!(
                    order_id = %record.order_id,
                    status = %record.status,
                    signal = %notification.transaction_status,
                    "Stale callback on terminal order rejected"
                );
                Ok(CallbackOutcome::Stale {
                    order_id: record.order_id,
                    status: record.status,
                })
            }
            Transition::Unmapped => {
                tracing::warn!(
                    order_id = %record.order_id,
                    status = %record.status,
                    signal = %notification.transaction_status,
                    "No transition for callback signal, ignoring"
                );
                Ok(CallbackOutcome::Unmapped {
                    order_id: record.order_id,
                })
            }
            Transition::Next(next) => {
                record.apply_transition(next, &event_id);
                self.store.store_order(&txn, &record)?;
                txn.commit().map_err(StorageError::from)?;
                tracing::info!(
                    order_id = %record.order_id,
                    event_id = %event_id,
                    status = %next,
                    "Callback applied"
                );
                Ok(CallbackOutcome::Applied {
                    order_id: record.order_id,
                    status: next,
                })
            }
        }
    }

    /// 查询订单记录
    pub fn order(&self, order_id: &str) -> Result<Option<OrderRecord>, PaymentError> {
        Ok(self.store.get(order_id)?)
    }

    /// 已存储订单数 (健康检查)
    pub fn order_count(&self) -> Result<u64, PaymentError> {
        Ok(self.store.order_count()?)
    }
}

/// 从目录项目构造商品明细
fn item_for_project(project: &Project, gross_amount: u64) -> ItemDetails {
    ItemDetails {
        id: project.id.clone(),
        price: gross_amount,
        quantity: 1,
        name: project.title.clone(),
    }
}
