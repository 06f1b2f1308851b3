//! 仿真时间类型
//!
//! 离散时间步（tick）。所有延迟与超时都以 tick 计，不涉及真实时钟。

use serde::{Deserialize, Serialize};

/// 仿真时间（tick 数）。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// 下一个时间步
    pub fn next(self) -> Tick {
        Tick(self.0.saturating_add(1))
    }
}

impl std::fmt::Display for Tick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t={}", self.0)
    }
}
