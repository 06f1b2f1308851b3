//! 标识符类型
//!
//! 定义数据包身份与投递端点。

use serde::{Deserialize, Serialize};

/// 数据包标识符
///
/// 由 [`Channel`](super::Channel) 在构造数据包时分配，每个包唯一。
/// 同一序号的两次重传是两个不同的包。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PacketId(pub u64);

/// 投递端点：信道中的包到达后交给哪一方处理
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Sender,
    Receiver,
}
