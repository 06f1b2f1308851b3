//! 网络模拟模块
//!
//! 此模块包含信道模拟的核心组件：数据包、包身份、在途队列与统计。

// 子模块声明
mod channel;
mod channel_viz;
mod id;
mod packet;
mod stats;

// 重新导出公共接口
pub use channel::{Channel, Endpoints, InFlight, PacketSink};
pub use id::{Endpoint, PacketId};
pub use packet::{Packet, PacketKind, Payload, Segment};
pub use stats::Stats;
