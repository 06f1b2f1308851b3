//! 会话编排
//!
//! `Session` 独占信道与收发双方并负责接线；外部驱动只需要：
//! - 每个时间步调用一次 [`Session::tick`]（先信道交付，再推进发送方定时器）
//! - 按需调用 [`Session::try_send_next`] / [`Session::kill`]
//! - 通过 [`Session::snapshot`] 读取展示状态

use tracing::{debug, info};

use super::config::SessionConfig;
use super::error::ConfigError;
use super::scenario::{Action, ScriptedAction};
use super::snapshot::SessionSnapshot;
use super::time::Tick;
use crate::net::{Channel, Endpoint, Endpoints, Packet, PacketId, PacketKind, PacketSink};
use crate::proto::{Receiver, Sender};
use crate::viz::VizLogger;

/// 收发双方：信道按端点标识把包交给其中之一。
#[derive(Debug, Clone)]
pub struct Peers {
    pub sender: Sender,
    pub receiver: Receiver,
}

impl Endpoints for Peers {
    fn deliver(&mut self, to: Endpoint, pkt: Packet, channel: &mut Channel) {
        match to {
            Endpoint::Sender => self.sender.on_packet(pkt, channel),
            Endpoint::Receiver => self.receiver.on_packet(pkt, channel),
        }
    }
}

/// 无界面驱动循环的参数
#[derive(Debug, Clone)]
pub struct RunOpts {
    /// 最多推进的 tick 数（绝对时间）
    pub max_ticks: u64,
    /// 每个 tick 前都尽量填满窗口
    pub auto_send: bool,
}

impl Default for RunOpts {
    fn default() -> Self {
        Self {
            max_ticks: 100_000,
            auto_send: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub completed: bool,
    pub ticks: u64,
    pub finished_at: Option<Tick>,
    /// 因窗口已满或找不到目标而未生效的脚本动作数
    pub skipped_actions: usize,
}

#[derive(Debug)]
pub struct Session {
    cfg: SessionConfig,
    channel: Channel,
    peers: Peers,
    finished_at: Option<Tick>,
}

impl Session {
    pub fn new(cfg: &SessionConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let channel = Channel::new(
            cfg.loss_data.iter().copied(),
            cfg.loss_ack.iter().copied(),
            cfg.delay_ticks,
        )?;
        let sender = Sender::new(cfg.window_size, cfg.timeout_ticks, cfg.total_packets)?;
        info!(
            window_size = cfg.window_size,
            total_packets = cfg.total_packets,
            timeout_ticks = cfg.timeout_ticks,
            delay_ticks = cfg.delay_ticks,
            loss_data = ?cfg.loss_data,
            loss_ack = ?cfg.loss_ack,
            "▶️  会话已创建"
        );
        Ok(Self {
            cfg: cfg.clone(),
            channel,
            peers: Peers {
                sender,
                receiver: Receiver::new(),
            },
            finished_at: None,
        })
    }

    /// 启用结构化事件记录，并写入 t=0 的 meta 事件
    pub fn enable_viz(&mut self) {
        self.channel.viz = Some(VizLogger::default());
        self.channel.emit_viz_meta(
            self.cfg.window_size,
            self.cfg.total_packets,
            self.cfg.timeout_ticks,
        );
    }

    pub fn take_viz(&mut self) -> Option<VizLogger> {
        self.channel.viz.take()
    }

    pub fn now(&self) -> Tick {
        self.channel.now()
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    pub fn sender(&self) -> &Sender {
        &self.peers.sender
    }

    pub fn receiver(&self) -> &Receiver {
        &self.peers.receiver
    }

    pub fn is_complete(&self) -> bool {
        self.peers.sender.is_done()
    }

    /// 完成时刻（第一次观察到 `base == total_packets` 的 tick）
    pub fn finished_at(&self) -> Option<Tick> {
        self.finished_at
    }

    pub fn try_send_next(&mut self) -> bool {
        self.peers.sender.try_send_next(&mut self.channel)
    }

    /// 推进一个时间步：先交付到期的包，再推进发送方定时器。
    pub fn tick(&mut self) -> Tick {
        self.channel.advance_one_tick(&mut self.peers);
        self.peers.sender.advance_timer_one_tick(&mut self.channel);

        if self.finished_at.is_none() && self.is_complete() {
            let now = self.channel.now();
            self.finished_at = Some(now);
            self.channel.viz_done();
            info!(now = now.0, "✅ 传输完成");
        }
        self.channel.now()
    }

    pub fn kill(&mut self, id: PacketId) -> bool {
        self.channel.remove_in_flight(id)
    }

    /// 移除第一个类别与编号匹配的在途包
    pub fn kill_matching(&mut self, kind: PacketKind, number: u64) -> bool {
        match self.channel.find_in_flight(kind, number) {
            Some(id) => self.kill(id),
            None => false,
        }
    }

    /// 执行一个操作者动作，返回是否生效
    pub fn apply(&mut self, action: &Action) -> bool {
        match *action {
            Action::Send => self.try_send_next(),
            Action::Kill { kind, number } => self.kill_matching(kind, number),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(&self.channel, &self.peers.sender, &self.peers.receiver)
    }

    /// 无界面驱动：按 tick 执行脚本动作、（可选）自动发送，然后推进时间，
    /// 直到完成或到达 `max_ticks`。每个 tick 之后回调 `on_tick`。
    pub fn run(
        &mut self,
        opts: &RunOpts,
        actions: &[ScriptedAction],
        mut on_tick: impl FnMut(&Session),
    ) -> RunReport {
        let mut pending: Vec<&ScriptedAction> = actions.iter().collect();
        pending.sort_by_key(|a| a.at);
        let mut next = 0;
        let mut skipped = 0;

        while !self.is_complete() && self.now().0 < opts.max_ticks {
            let now = self.now().0;
            while let Some(sa) = pending.get(next).filter(|sa| sa.at <= now) {
                if !self.apply(&sa.action) {
                    debug!(at = sa.at, action = ?sa.action, "脚本动作未生效");
                    skipped += 1;
                }
                next += 1;
            }
            if opts.auto_send {
                while self.try_send_next() {}
            }
            self.tick();
            on_tick(&*self);
        }

        RunReport {
            completed: self.is_complete(),
            ticks: self.now().0,
            finished_at: self.finished_at,
            skipped_actions: skipped,
        }
    }
}
