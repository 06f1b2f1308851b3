//! 可视化事件记录（用于离线回放 / 事件日志）
//!
//! 设计目标：
//! - **结构化**：用 JSON 事件而不是解析文本日志
//! - **轻量**：事件只存内存，由驱动方决定何时落盘
//! - **可回放**：按 tick 顺序记录每次发送、丢包、到达与重传

mod types;

pub use types::{VizEvent, VizEventKind, VizLogger, VizRetransReason};
