//! 统计信息
//!
//! 定义信道统计数据结构。

use serde::Serialize;

/// 信道统计信息
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub admitted_data: u64,
    pub admitted_acks: u64,
    pub dropped_data: u64,
    pub dropped_acks: u64,
    pub delivered_data: u64,
    pub delivered_acks: u64,
    /// 被操作者手动移除的在途包
    pub killed: u64,
}
