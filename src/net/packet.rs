//! 数据包类型
//!
//! 定义数据段 / ACK 段及其相关操作。

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::id::PacketId;

/// 应用层数据（不透明，按包整体传递，不做字节流重组）
pub type Payload = Arc<str>;

/// 包的类别（数据 / ACK）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacketKind {
    Data,
    Ack,
}

/// 传输层段内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// 数据段：`seq` 为包序号（按包计数，不是字节）
    Data { seq: u64, payload: Payload },
    /// 累计 ACK：`ack` 为接收方期望的下一个序号
    Ack { ack: u64 },
}

/// 网络数据包
///
/// 构造后不可变。身份由 `id` 决定，而不是内容：内容相同的两次重传是不同的包。
#[derive(Debug, Clone)]
pub struct Packet {
    pub id: PacketId,
    pub segment: Segment,
}

impl Packet {
    pub fn kind(&self) -> PacketKind {
        match self.segment {
            Segment::Data { .. } => PacketKind::Data,
            Segment::Ack { .. } => PacketKind::Ack,
        }
    }

    pub fn is_ack(&self) -> bool {
        matches!(self.segment, Segment::Ack { .. })
    }

    /// 数据段序号（ACK 返回 None）
    pub fn seq(&self) -> Option<u64> {
        match self.segment {
            Segment::Data { seq, .. } => Some(seq),
            Segment::Ack { .. } => None,
        }
    }

    /// 累计确认号（数据段返回 None）
    pub fn ack(&self) -> Option<u64> {
        match self.segment {
            Segment::Ack { ack } => Some(ack),
            Segment::Data { .. } => None,
        }
    }

    pub fn payload(&self) -> Option<&Payload> {
        match &self.segment {
            Segment::Data { payload, .. } => Some(payload),
            Segment::Ack { .. } => None,
        }
    }

    /// 展示用编号：数据段取 seq，ACK 取 ack
    pub fn number(&self) -> u64 {
        match self.segment {
            Segment::Data { seq, .. } => seq,
            Segment::Ack { ack } => ack,
        }
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.segment {
            Segment::Data { seq, .. } => write!(f, "[DATA: {seq}]"),
            Segment::Ack { ack } => write!(f, "[ACK: {ack}]"),
        }
    }
}
