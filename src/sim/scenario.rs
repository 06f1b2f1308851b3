//! 脚本化场景
//!
//! 用 JSON 描述一次会话：配置 + 按 tick 调度的操作者动作（发送 / 移除在途包）。
//!
//! ```json
//! {
//!   "config": { "window_size": 4, "total_packets": 5, "delay_ticks": 3, "loss_data": [0] },
//!   "auto_send": false,
//!   "actions": [
//!     { "at": 0, "action": "send" },
//!     { "at": 1, "action": "kill", "kind": "data", "number": 0 }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::config::SessionConfig;
use super::error::ScenarioError;
use crate::net::PacketKind;

/// 操作者动作
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// 若窗口允许，发送下一个新包
    Send,
    /// 移除第一个类别与编号匹配的在途包
    Kill { kind: PacketKind, number: u64 },
}

/// 在某个 tick 执行的动作（在该 tick 的信道推进之前执行）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedAction {
    pub at: u64,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: SessionConfig,
    /// 每个 tick 前都尽量填满窗口
    #[serde(default = "default_auto_send")]
    pub auto_send: bool,
    #[serde(default)]
    pub max_ticks: Option<u64>,
    #[serde(default)]
    pub actions: Vec<ScriptedAction>,
}

fn default_auto_send() -> bool {
    true
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            config: SessionConfig::default(),
            auto_send: default_auto_send(),
            max_ticks: None,
            actions: Vec::new(),
        }
    }
}

impl Scenario {
    /// 解析并校验场景
    pub fn from_json_str(raw: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_json::from_str(raw)?;
        scenario.config.validate()?;
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let raw = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }
}
