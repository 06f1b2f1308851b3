//! 仿真核心模块
//!
//! 此模块包含离散时间仿真的外围组件：时间、配置、场景脚本、会话编排与快照。

// 子模块声明
mod config;
mod error;
mod scenario;
mod session;
mod snapshot;
mod time;

// 重新导出公共接口
pub use config::{
    DEFAULT_DELAY_TICKS, DEFAULT_TIMEOUT_TICKS, DEFAULT_TOTAL_PACKETS, DEFAULT_WINDOW_SIZE,
    SessionConfig,
};
pub use error::{ConfigError, ScenarioError};
pub use scenario::{Action, Scenario, ScriptedAction};
pub use session::{Peers, RunOpts, RunReport, Session};
pub use snapshot::{InFlightView, ReceiverView, SenderView, SessionSnapshot};
pub use time::Tick;
