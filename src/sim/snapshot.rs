//! 展示用只读快照
//!
//! 前端（或 CLI）每个 tick 读取一次，用于绘制窗口、缓冲区与在途包进度。

use serde::Serialize;

use crate::net::{Channel, Endpoint, InFlight, PacketKind, Stats};
use crate::proto::{Receiver, Sender, TimerState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SenderView {
    pub base: u64,
    pub next_seq: u64,
    pub window_size: u64,
    pub total_packets: u64,
    pub window_full: bool,
    pub timer: TimerState,
    pub timeout_ticks: u64,
    pub dup_acks: u32,
    pub retransmissions: u64,
    pub fast_retransmits: u64,
    pub timeouts: u64,
}

impl From<&Sender> for SenderView {
    fn from(s: &Sender) -> Self {
        Self {
            base: s.base(),
            next_seq: s.next_seq(),
            window_size: s.window_size(),
            total_packets: s.total_packets(),
            window_full: s.is_window_full(),
            timer: s.timer(),
            timeout_ticks: s.timeout_ticks(),
            dup_acks: s.dup_acks(),
            retransmissions: s.retransmissions(),
            fast_retransmits: s.fast_retransmits(),
            timeouts: s.timeouts(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiverView {
    pub expected_seq: u64,
    pub buffered: Vec<u64>,
    pub delivered: Vec<String>,
}

impl From<&Receiver> for ReceiverView {
    fn from(r: &Receiver) -> Self {
        Self {
            expected_seq: r.expected_seq(),
            buffered: r.buffered_seqs(),
            delivered: r.delivered().iter().map(|p| p.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InFlightView {
    pub pkt_id: u64,
    pub kind: PacketKind,
    pub number: u64,
    pub to: Endpoint,
    pub remaining: u64,
    pub total: u64,
    pub progress: f64,
}

impl From<&InFlight> for InFlightView {
    fn from(rec: &InFlight) -> Self {
        Self {
            pkt_id: rec.packet.id.0,
            kind: rec.packet.kind(),
            number: rec.packet.number(),
            to: rec.to,
            remaining: rec.remaining,
            total: rec.total,
            progress: rec.progress(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub t: u64,
    pub complete: bool,
    pub sender: SenderView,
    pub receiver: ReceiverView,
    pub in_flight: Vec<InFlightView>,
    pub stats: Stats,
}

impl SessionSnapshot {
    pub fn capture(channel: &Channel, sender: &Sender, receiver: &Receiver) -> Self {
        Self {
            t: channel.now().0,
            complete: sender.is_done(),
            sender: SenderView::from(sender),
            receiver: ReceiverView::from(receiver),
            in_flight: channel.in_flight().iter().map(InFlightView::from).collect(),
            stats: channel.stats.clone(),
        }
    }
}
