//! 传输层/协议模块
//!
//! 包含简化可靠传输（滑动窗口 + 累计 ACK + 超时/快速重传）的收发两端。

pub mod receiver;
pub mod sender;

pub use receiver::Receiver;
pub use sender::{FAST_RETRANSMIT_DUP_ACKS, Sender, TimerState};
