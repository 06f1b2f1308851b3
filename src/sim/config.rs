//! 会话配置
//!
//! 协议参数与丢包配置；校验失败在构造期直接报错，不留到运行期。

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

pub const DEFAULT_WINDOW_SIZE: u64 = 4;
pub const DEFAULT_TOTAL_PACKETS: u64 = 10;
pub const DEFAULT_TIMEOUT_TICKS: u64 = 120;
pub const DEFAULT_DELAY_TICKS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// 滑动窗口大小（包个数，固定不变）
    pub window_size: u64,
    /// 需要传输的数据单元总数
    pub total_packets: u64,
    /// 重传超时（tick）
    pub timeout_ticks: u64,
    /// 单向传播时延（tick），两个方向相同
    pub delay_ticks: u64,
    /// 要丢弃一次的数据段序号
    pub loss_data: BTreeSet<u64>,
    /// 要丢弃一次的 ACK 确认号
    pub loss_ack: BTreeSet<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            total_packets: DEFAULT_TOTAL_PACKETS,
            timeout_ticks: DEFAULT_TIMEOUT_TICKS,
            delay_ticks: DEFAULT_DELAY_TICKS,
            loss_data: BTreeSet::new(),
            loss_ack: BTreeSet::new(),
        }
    }
}

impl SessionConfig {
    /// 所有数值参数都必须至少为 1
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::InvalidWindowSize(self.window_size));
        }
        if self.total_packets == 0 {
            return Err(ConfigError::InvalidTotalPackets(self.total_packets));
        }
        if self.timeout_ticks == 0 {
            return Err(ConfigError::InvalidTimeout(self.timeout_ticks));
        }
        if self.delay_ticks == 0 {
            return Err(ConfigError::InvalidDelay(self.delay_ticks));
        }
        Ok(())
    }
}
