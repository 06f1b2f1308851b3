//! 错误类型
//!
//! 协议稳态操作没有错误；这里只覆盖构造期的参数校验与场景文件加载。

use std::path::PathBuf;

/// 构造参数不合法
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("window size must be at least 1, got {0}")]
    InvalidWindowSize(u64),

    #[error("total packets must be at least 1, got {0}")]
    InvalidTotalPackets(u64),

    #[error("timeout interval must be at least 1 tick, got {0}")]
    InvalidTimeout(u64),

    #[error("propagation delay must be at least 1 tick, got {0}")]
    InvalidDelay(u64),
}

/// 场景文件加载失败
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("read scenario {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse scenario: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid scenario config: {0}")]
    Config(#[from] ConfigError),
}
