use serde::{Deserialize, Serialize};

use crate::net::{Endpoint, PacketKind};

/// 可视化事件类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VizEventKind {
    /// 会话参数（建议作为 t=0 的第一条事件）
    Meta {
        window_size: u64,
        total_packets: u64,
        timeout_ticks: u64,
        delay_ticks: u64,
        loss_data: Vec<u64>,
        loss_ack: Vec<u64>,
    },
    /// 发送方发出数据段（首次发送或重传）
    SendData {
        seq: u64,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        retrans: Option<VizRetransReason>,
    },
    /// 接收方发出累计 ACK
    SendAck { ack: u64 },
    /// 信道按丢包配置丢弃（每个编号只丢一次）
    Drop { number: u64 },
    /// 在途包到达目的端
    Arrive { to: Endpoint },
    /// 操作者手动移除在途包
    Kill { number: u64 },
    /// 接收方按序接收
    Accept { seq: u64 },
    /// 接收方从乱序缓冲中取出并交付
    Unbuffer { seq: u64 },
    /// 接收方缓存乱序包
    Buffer { seq: u64 },
    /// 接收方忽略已交付的重复包（或已在缓冲中的乱序包）
    IgnoreDup { seq: u64 },
    /// 发送方收到推进窗口的新 ACK
    NewAck { ack: u64, base: u64 },
    /// 发送方收到重复 ACK
    DupAck { ack: u64, count: u32 },
    /// 重传定时器超时
    Timeout { base: u64 },
    /// 3 个重复 ACK 触发快速重传
    FastRetransmit { base: u64 },
    /// 所有数据都已被累计确认
    Done,
}

/// 重传原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VizRetransReason {
    Timeout,
    FastRetransmit,
}

/// 一个可回放的事件（JSON）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VizEvent {
    /// 仿真时间（tick，和 `Tick.0` 同口径）
    pub t: u64,
    pub pkt_id: Option<u64>,
    pub pkt_kind: Option<PacketKind>,
    #[serde(flatten)]
    pub kind: VizEventKind,
}

/// 一个简单的事件收集器（存内存，仿真结束写 JSON 文件）
#[derive(Debug, Default)]
pub struct VizLogger {
    pub events: Vec<VizEvent>,
}

impl VizLogger {
    pub fn push(&mut self, ev: VizEvent) {
        self.events.push(ev);
    }

    /// 按事件类型过滤（测试与回放筛选用）
    pub fn iter_kind<'a>(
        &'a self,
        pred: impl Fn(&VizEventKind) -> bool + 'a,
    ) -> impl Iterator<Item = &'a VizEvent> + 'a {
        self.events.iter().filter(move |ev| pred(&ev.kind))
    }
}
