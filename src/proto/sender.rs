//! 发送方：滑动窗口 + 单一重传定时器
//!
//! 功能：
//! - 窗口准入：`next_seq < base + window_size` 且 `next_seq < total_packets` 时才能发新包
//! - 累计 ACK：`ack > base` 推进窗口；`ack == base` 计为重复 ACK
//! - 3 个重复 ACK 触发快速重传；定时器超时触发超时重传
//! - 两种重传都只重发最早未确认的一个包（Go-Back-N 式恢复）
//!
//! 注意：快速重传后不清零重复 ACK 计数（与超时路径重启定时器不同），
//! 计数继续增长，只有恰好等于 3 的那一次会重传。

use tracing::{debug, info, trace, warn};

use crate::net::{Channel, Endpoint, Packet, PacketSink, Payload, Segment};
use crate::sim::ConfigError;
use crate::viz::VizRetransReason;

/// 触发快速重传所需的重复 ACK 数
pub const FAST_RETRANSMIT_DUP_ACKS: u32 = 3;

/// 单一逻辑定时器（覆盖整个窗口，不是每包一个）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct TimerState {
    pub running: bool,
    pub elapsed: u64,
}

#[derive(Debug, Clone)]
pub struct Sender {
    window_size: u64,
    timeout_ticks: u64,
    total_packets: u64,

    base: u64,
    next_seq: u64,
    timer: TimerState,
    dup_acks: u32,

    // stats
    retransmissions: u64,
    fast_retransmits: u64,
    timeouts: u64,
}

impl Sender {
    pub fn new(window_size: u64, timeout_ticks: u64, total_packets: u64) -> Result<Self, ConfigError> {
        if window_size == 0 {
            return Err(ConfigError::InvalidWindowSize(window_size));
        }
        if timeout_ticks == 0 {
            return Err(ConfigError::InvalidTimeout(timeout_ticks));
        }
        if total_packets == 0 {
            return Err(ConfigError::InvalidTotalPackets(total_packets));
        }
        Ok(Self {
            window_size,
            timeout_ticks,
            total_packets,
            base: 0,
            next_seq: 0,
            timer: TimerState::default(),
            dup_acks: 0,
            retransmissions: 0,
            fast_retransmits: 0,
            timeouts: 0,
        })
    }

    /// 第 `seq` 个数据单元的载荷
    pub fn payload_for(seq: u64) -> Payload {
        Payload::from(format!("Msg{seq}"))
    }

    pub fn base(&self) -> u64 {
        self.base
    }

    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    pub fn window_size(&self) -> u64 {
        self.window_size
    }

    pub fn timeout_ticks(&self) -> u64 {
        self.timeout_ticks
    }

    pub fn total_packets(&self) -> u64 {
        self.total_packets
    }

    pub fn timer(&self) -> TimerState {
        self.timer
    }

    pub fn dup_acks(&self) -> u32 {
        self.dup_acks
    }

    pub fn retransmissions(&self) -> u64 {
        self.retransmissions
    }

    pub fn fast_retransmits(&self) -> u64 {
        self.fast_retransmits
    }

    pub fn timeouts(&self) -> u64 {
        self.timeouts
    }

    /// 窗口内还有空位且还有未发送的数据
    pub fn can_send_more(&self) -> bool {
        self.next_seq < self.base.saturating_add(self.window_size) && self.next_seq < self.total_packets
    }

    /// 窗口已满或数据已全部发出（前端据此禁用“发送”）
    pub fn is_window_full(&self) -> bool {
        !self.can_send_more()
    }

    /// 所有数据都已被累计确认
    pub fn is_done(&self) -> bool {
        self.base == self.total_packets
    }

    fn start_timer(&mut self) {
        self.timer = TimerState {
            running: true,
            elapsed: 0,
        };
    }

    fn stop_timer(&mut self) {
        self.timer.running = false;
    }

    /// 若窗口允许，发送下一个新数据段。
    #[tracing::instrument(skip(self, channel), fields(base = self.base, next_seq = self.next_seq))]
    pub fn try_send_next(&mut self, channel: &mut Channel) -> bool {
        if !self.can_send_more() {
            trace!("窗口已满或无更多数据");
            return false;
        }

        let seq = self.next_seq;
        let pkt = channel.make_data(seq, Self::payload_for(seq));
        debug!(pkt_id = pkt.id.0, "发送数据段 {}", seq);
        channel.viz_send_data(&pkt, None);
        channel.admit(pkt, Endpoint::Receiver);

        // 窗口内第一个未确认包：启动定时器
        if self.base == self.next_seq {
            self.start_timer();
        }
        self.next_seq += 1;
        true
    }

    /// 推进定时器一个 tick；超时则重传 base 并立即重启定时器。
    pub fn advance_timer_one_tick(&mut self, channel: &mut Channel) {
        if !self.timer.running {
            return;
        }
        self.timer.elapsed = self.timer.elapsed.saturating_add(1);
        if self.timer.elapsed >= self.timeout_ticks {
            warn!(now = channel.now().0, base = self.base, "⏰ 超时，重传 base");
            self.timeouts += 1;
            channel.viz_timeout(self.base);
            self.retransmit_base(channel, VizRetransReason::Timeout);
            self.start_timer();
        }
    }

    /// 只重传最早未确认的一个包
    fn retransmit_base(&mut self, channel: &mut Channel, reason: VizRetransReason) {
        if self.base >= self.total_packets {
            return;
        }
        let pkt = channel.make_data(self.base, Self::payload_for(self.base));
        debug!(pkt_id = pkt.id.0, ?reason, "重传数据段 {}", self.base);
        self.retransmissions += 1;
        channel.viz_send_data(&pkt, Some(reason));
        channel.admit(pkt, Endpoint::Receiver);
    }

    fn on_ack(&mut self, pkt: &Packet, ack: u64, channel: &mut Channel) {
        if ack > self.base {
            // 新 ACK：推进窗口
            self.base = ack;
            self.stop_timer();
            self.dup_acks = 0;
            debug!(ack, base = self.base, next_seq = self.next_seq, "✅ 新 ACK");
            channel.viz_new_ack(pkt, self.base);

            if self.base < self.next_seq {
                self.start_timer();
            }
            if self.is_done() {
                info!(now = channel.now().0, total = self.total_packets, "全部数据已确认");
            }
        } else if ack == self.base {
            self.dup_acks = self.dup_acks.saturating_add(1);
            debug!(ack, count = self.dup_acks, "重复 ACK");
            channel.viz_dup_ack(pkt, self.dup_acks);

            if self.dup_acks == FAST_RETRANSMIT_DUP_ACKS {
                warn!(now = channel.now().0, base = self.base, "⚡ 快速重传");
                self.fast_retransmits += 1;
                channel.viz_fast_retransmit(self.base);
                self.retransmit_base(channel, VizRetransReason::FastRetransmit);
            }
        } else {
            trace!(ack, base = self.base, "过期 ACK，忽略");
        }
    }
}

impl PacketSink for Sender {
    fn on_packet(&mut self, pkt: Packet, channel: &mut Channel) {
        // 发送方只处理 ACK
        let Segment::Ack { ack } = pkt.segment else {
            return;
        };
        self.on_ack(&pkt, ack, channel);
    }
}
