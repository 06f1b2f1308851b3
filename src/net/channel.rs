//! 信道
//!
//! 模拟固定传播时延与确定性丢包：
//! - 入信道时按丢包配置决定是否丢弃（每个编号只丢一次）
//! - 每个 tick 所有在途包剩余时延减一，到期的包按入队顺序交给目的端

use std::collections::BTreeSet;

use tracing::{debug, trace, warn};

use super::id::{Endpoint, PacketId};
use super::packet::{Packet, PacketKind, Payload, Segment};
use super::stats::Stats;
use crate::sim::{ConfigError, Tick};
use crate::viz::VizLogger;

/// 一条在途记录，由信道独占。
#[derive(Debug, Clone)]
pub struct InFlight {
    pub packet: Packet,
    pub remaining: u64,
    pub to: Endpoint,
    /// 只用于展示进度，协议逻辑不读取
    pub total: u64,
}

impl InFlight {
    /// 归一化传输进度 `1 - remaining / total`
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        1.0 - (self.remaining as f64 / self.total as f64)
    }
}

/// 投递目标集合：信道把到达的包交给某个端点处理。
///
/// 由编排方实现（例如 [`Peers`](crate::sim::Peers)），信道本身不持有收发双方的引用。
pub trait Endpoints {
    fn deliver(&mut self, to: Endpoint, pkt: Packet, channel: &mut Channel);
}

/// 端点收包接口：发送方与接收方各自实现。
pub trait PacketSink {
    fn on_packet(&mut self, pkt: Packet, channel: &mut Channel);
}

/// 带时延与丢包注入的双向信道
#[derive(Debug)]
pub struct Channel {
    now: Tick,
    delay: u64,
    loss_data: BTreeSet<u64>,
    loss_ack: BTreeSet<u64>,
    in_flight: Vec<InFlight>,
    next_pkt_id: u64,
    pub stats: Stats,
    pub viz: Option<VizLogger>,
}

impl Channel {
    /// 创建信道；`delay` 必须至少为 1 个 tick。
    pub fn new(
        loss_data: impl IntoIterator<Item = u64>,
        loss_ack: impl IntoIterator<Item = u64>,
        delay: u64,
    ) -> Result<Self, ConfigError> {
        if delay == 0 {
            return Err(ConfigError::InvalidDelay(delay));
        }
        Ok(Self {
            now: Tick::ZERO,
            delay,
            loss_data: loss_data.into_iter().collect(),
            loss_ack: loss_ack.into_iter().collect(),
            in_flight: Vec::new(),
            next_pkt_id: 0,
            stats: Stats::default(),
            viz: None,
        })
    }

    /// 当前信道时间
    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn delay(&self) -> u64 {
        self.delay
    }

    fn alloc_id(&mut self) -> PacketId {
        let id = PacketId(self.next_pkt_id);
        self.next_pkt_id = self.next_pkt_id.wrapping_add(1);
        id
    }

    /// 构造数据段（分配新的包身份）
    pub fn make_data(&mut self, seq: u64, payload: Payload) -> Packet {
        Packet {
            id: self.alloc_id(),
            segment: Segment::Data { seq, payload },
        }
    }

    /// 构造累计 ACK（分配新的包身份）
    pub fn make_ack(&mut self, ack: u64) -> Packet {
        Packet {
            id: self.alloc_id(),
            segment: Segment::Ack { ack },
        }
    }

    /// 包进入信道：命中丢包配置则丢弃并消耗该编号，否则以固定时延排入在途队列。
    #[tracing::instrument(skip(self, pkt, to), fields(pkt_id = pkt.id.0, pkt = %pkt, to = ?to))]
    pub fn admit(&mut self, pkt: Packet, to: Endpoint) {
        let dropped = match &pkt.segment {
            Segment::Data { seq, .. } => self.loss_data.remove(seq),
            Segment::Ack { ack } => self.loss_ack.remove(ack),
        };
        if dropped {
            warn!(now = self.now.0, "❌ 按配置丢弃 {}", pkt);
            match pkt.kind() {
                PacketKind::Data => self.stats.dropped_data += 1,
                PacketKind::Ack => self.stats.dropped_acks += 1,
            }
            self.viz_drop(&pkt);
            return;
        }

        match pkt.kind() {
            PacketKind::Data => self.stats.admitted_data += 1,
            PacketKind::Ack => self.stats.admitted_acks += 1,
        }
        trace!(delay = self.delay, in_flight = self.in_flight.len(), "包进入信道");
        self.in_flight.push(InFlight {
            packet: pkt,
            remaining: self.delay,
            to,
            total: self.delay,
        });
    }

    /// 推进一个 tick：所有在途包剩余时延减一，到期的包按入队顺序交付。
    ///
    /// 交付回调中新进入信道的包从下一个 tick 才开始计时。
    pub fn advance_one_tick(&mut self, peers: &mut dyn Endpoints) {
        self.now = self.now.next();

        for rec in &mut self.in_flight {
            rec.remaining = rec.remaining.saturating_sub(1);
        }
        let (arrived, still): (Vec<_>, Vec<_>) = std::mem::take(&mut self.in_flight)
            .into_iter()
            .partition(|rec| rec.remaining == 0);
        self.in_flight = still;

        if !arrived.is_empty() {
            debug!(
                now = self.now.0,
                arrived = arrived.len(),
                in_flight = self.in_flight.len(),
                "📨 在途包到达"
            );
        }

        for InFlight { packet, to, .. } in arrived {
            match packet.kind() {
                PacketKind::Data => self.stats.delivered_data += 1,
                PacketKind::Ack => self.stats.delivered_acks += 1,
            }
            self.viz_arrive(&packet, to);
            peers.deliver(to, packet, self);
        }
    }

    /// 手动移除一个在途包（按身份匹配）。返回是否找到。
    ///
    /// 对协议而言等价于该包在信道中静默丢失。
    pub fn remove_in_flight(&mut self, target: PacketId) -> bool {
        let Some(pos) = self.in_flight.iter().position(|rec| rec.packet.id == target) else {
            debug!(pkt_id = target.0, "要移除的包不在信道中");
            return false;
        };
        let rec = self.in_flight.remove(pos);
        warn!(now = self.now.0, "✂️  手动移除 {}", rec.packet);
        self.stats.killed += 1;
        self.viz_kill(&rec.packet);
        true
    }

    /// 查找第一个类别与编号匹配的在途包
    pub fn find_in_flight(&self, kind: PacketKind, number: u64) -> Option<PacketId> {
        self.in_flight
            .iter()
            .find(|rec| rec.packet.kind() == kind && rec.packet.number() == number)
            .map(|rec| rec.packet.id)
    }

    /// 在途记录（按入队顺序）
    pub fn in_flight(&self) -> &[InFlight] {
        &self.in_flight
    }

    /// 尚未触发的数据段丢包编号
    pub fn pending_data_losses(&self) -> &BTreeSet<u64> {
        &self.loss_data
    }

    /// 尚未触发的 ACK 丢包编号
    pub fn pending_ack_losses(&self) -> &BTreeSet<u64> {
        &self.loss_ack
    }
}
