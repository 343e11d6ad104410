//! 状态转移表
//!
//! 支付状态机的唯一事实来源。纯函数，无副作用；协调器负责原子提交。
//!
//! | 当前状态 | 信号 | 下一状态 |
//! |----------|------|----------|
//! | created/pending | capture + accept | success |
//! | created/pending | capture + challenge | challenge |
//! | created/pending | settlement | success |
//! | created/pending | pending | pending |
//! | created/pending/challenge | cancel | cancelled |
//! | created/pending/challenge | deny | failure |
//! | created/pending/challenge | expire | expired |
//! | challenge | capture + accept (人工复核通过) | success |
//! | 终态 | 任意 | 拒绝，不转移 |

use shared::payment::{FraudStatus, PaymentStatus, TransactionSignal as Signal};

/// 转移计算结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// 应用转移到下一状态
    Next(PaymentStatus),
    /// 当前为终态，乱序/迟到回调一律拒绝
    Terminal,
    /// 转移表无此 (状态, 信号) 组合，忽略
    Unmapped,
}

/// 计算下一状态
pub fn next_status(
    current: PaymentStatus,
    signal: Signal,
    fraud: Option<FraudStatus>,
) -> Transition {
    use PaymentStatus::{Cancelled, Challenge, Created, Expired, Failure, Pending, Success};

    // 终态保护优先于一切信号
    if current.is_terminal() {
        return Transition::Terminal;
    }

    match (current, signal) {
        (Created | Pending, Signal::Capture) => match fraud {
            Some(FraudStatus::Accept) => Transition::Next(Success),
            Some(FraudStatus::Challenge) => Transition::Next(Challenge),
            _ => Transition::Unmapped,
        },
        // 人工复核通过
        (Challenge, Signal::Capture) => match fraud {
            Some(FraudStatus::Accept) => Transition::Next(Success),
            _ => Transition::Unmapped,
        },
        (Created | Pending, Signal::Settlement) => Transition::Next(Success),
        (Created | Pending, Signal::Pending) => Transition::Next(Pending),
        // cancel/deny/expire 按信号名 1:1 映射到终态
        (Created | Pending | Challenge, Signal::Cancel) => Transition::Next(Cancelled),
        (Created | Pending | Challenge, Signal::Deny) => Transition::Next(Failure),
        (Created | Pending | Challenge, Signal::Expire) => Transition::Next(Expired),
        _ => Transition::Unmapped,
    }
}
