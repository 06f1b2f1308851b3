//! Visualization hooks for the channel.
//!
//! Sender and receiver record their protocol events through the channel they are
//! handed, so one logger sees the whole session in tick order.

use crate::viz::{VizEvent, VizEventKind, VizRetransReason};

use super::{Channel, Endpoint, Packet};

impl Channel {
    fn viz_push(&mut self, pkt: Option<&Packet>, kind: VizEventKind) {
        let t = self.now().0;
        if let Some(v) = &mut self.viz {
            v.push(VizEvent {
                t,
                pkt_id: pkt.map(|p| p.id.0),
                pkt_kind: pkt.map(Packet::kind),
                kind,
            });
        }
    }

    pub fn emit_viz_meta(
        &mut self,
        window_size: u64,
        total_packets: u64,
        timeout_ticks: u64,
    ) {
        if self.viz.is_none() {
            return;
        }
        let kind = VizEventKind::Meta {
            window_size,
            total_packets,
            timeout_ticks,
            delay_ticks: self.delay(),
            loss_data: self.pending_data_losses().iter().copied().collect(),
            loss_ack: self.pending_ack_losses().iter().copied().collect(),
        };
        self.viz_push(None, kind);
    }

    pub(crate) fn viz_drop(&mut self, pkt: &Packet) {
        self.viz_push(Some(pkt), VizEventKind::Drop { number: pkt.number() });
    }

    pub(crate) fn viz_arrive(&mut self, pkt: &Packet, to: Endpoint) {
        self.viz_push(Some(pkt), VizEventKind::Arrive { to });
    }

    pub(crate) fn viz_kill(&mut self, pkt: &Packet) {
        self.viz_push(Some(pkt), VizEventKind::Kill { number: pkt.number() });
    }

    pub(crate) fn viz_send_data(&mut self, pkt: &Packet, retrans: Option<VizRetransReason>) {
        self.viz_push(
            Some(pkt),
            VizEventKind::SendData {
                seq: pkt.number(),
                retrans,
            },
        );
    }

    pub(crate) fn viz_send_ack(&mut self, pkt: &Packet) {
        self.viz_push(Some(pkt), VizEventKind::SendAck { ack: pkt.number() });
    }

    /// 接收方对数据段的处理结果（accept / unbuffer / buffer / ignore_dup）
    pub(crate) fn viz_recv(&mut self, pkt: Option<&Packet>, kind: VizEventKind) {
        self.viz_push(pkt, kind);
    }

    pub(crate) fn viz_new_ack(&mut self, pkt: &Packet, base: u64) {
        self.viz_push(
            Some(pkt),
            VizEventKind::NewAck {
                ack: pkt.number(),
                base,
            },
        );
    }

    pub(crate) fn viz_dup_ack(&mut self, pkt: &Packet, count: u32) {
        self.viz_push(
            Some(pkt),
            VizEventKind::DupAck {
                ack: pkt.number(),
                count,
            },
        );
    }

    pub(crate) fn viz_timeout(&mut self, base: u64) {
        self.viz_push(None, VizEventKind::Timeout { base });
    }

    pub(crate) fn viz_fast_retransmit(&mut self, base: u64) {
        self.viz_push(None, VizEventKind::FastRetransmit { base });
    }

    pub(crate) fn viz_done(&mut self) {
        self.viz_push(None, VizEventKind::Done);
    }
}
