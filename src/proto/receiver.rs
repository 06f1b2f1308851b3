//! 接收方：按序交付 + 乱序缓冲 + 累计 ACK
//!
//! 每收到一个数据段（无论按序、乱序还是重复）都回一个 ACK，
//! 其确认号总是处理之后的 `expected_seq`。

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::net::{Channel, Endpoint, Packet, PacketSink, Payload, Segment};
use crate::viz::VizEventKind;

#[derive(Debug, Clone, Default)]
pub struct Receiver {
    expected_seq: u64,
    delivered: Vec<Payload>,
    /// 只保存 seq > expected_seq 的包；同一 seq 先到者保留
    buffer: BTreeMap<u64, Packet>,
}

impl Receiver {
    pub fn new() -> Self {
        Self::default()
    }

    /// 下一个需要按序交付的序号
    pub fn expected_seq(&self) -> u64 {
        self.expected_seq
    }

    /// 已按序交付给应用层的载荷
    pub fn delivered(&self) -> &[Payload] {
        &self.delivered
    }

    /// 乱序缓冲中的序号（升序）
    pub fn buffered_seqs(&self) -> Vec<u64> {
        self.buffer.keys().copied().collect()
    }

    pub fn buffered(&self, seq: u64) -> Option<&Packet> {
        self.buffer.get(&seq)
    }

    fn on_data(&mut self, pkt: Packet, seq: u64, payload: Payload, channel: &mut Channel) {
        if seq == self.expected_seq {
            debug!(seq, "按序接收");
            channel.viz_recv(Some(&pkt), VizEventKind::Accept { seq });
            self.delivered.push(payload);
            self.expected_seq += 1;

            // 缓冲区里若有后续连续的包，一并交付
            while let Some(next) = self.buffer.remove(&self.expected_seq) {
                trace!(seq = self.expected_seq, "从乱序缓冲交付");
                channel.viz_recv(Some(&next), VizEventKind::Unbuffer { seq: self.expected_seq });
                if let Some(p) = next.payload() {
                    self.delivered.push(p.clone());
                }
                self.expected_seq += 1;
            }
        } else if seq > self.expected_seq {
            if self.buffer.contains_key(&seq) {
                trace!(seq, "乱序包已在缓冲中，忽略");
                channel.viz_recv(Some(&pkt), VizEventKind::IgnoreDup { seq });
            } else {
                debug!(seq, expected = self.expected_seq, "缓存乱序包（有空洞）");
                channel.viz_recv(Some(&pkt), VizEventKind::Buffer { seq });
                self.buffer.insert(seq, pkt);
            }
        } else {
            trace!(seq, "重复包，忽略");
            channel.viz_recv(Some(&pkt), VizEventKind::IgnoreDup { seq });
        }

        // 无论哪种情况都回累计 ACK
        let ack = channel.make_ack(self.expected_seq);
        debug!(ack = self.expected_seq, "发送 ACK");
        channel.viz_send_ack(&ack);
        channel.admit(ack, Endpoint::Sender);
    }
}

impl PacketSink for Receiver {
    fn on_packet(&mut self, pkt: Packet, channel: &mut Channel) {
        // 接收方不处理 ACK
        let Segment::Data { seq, ref payload } = pkt.segment else {
            return;
        };
        let payload = payload.clone();
        self.on_data(pkt, seq, payload, channel);
    }
}
