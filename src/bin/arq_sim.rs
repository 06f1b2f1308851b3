//! 滑动窗口 ARQ 仿真（无界面驱动）
//!
//! 按 tick 推进一次会话：自动填满窗口（或按场景脚本发送 / 移除在途包），
//! 直到全部数据被确认或到达 tick 上限。

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use arqsim_rs::sim::{
    DEFAULT_DELAY_TICKS, DEFAULT_TIMEOUT_TICKS, DEFAULT_TOTAL_PACKETS, DEFAULT_WINDOW_SIZE,
    RunOpts, Scenario, Session, SessionConfig,
};
use clap::Parser;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "arq-sim", about = "滑动窗口 ARQ 仿真：累计 ACK + 超时/快速重传，信道固定时延与确定性丢包")]
struct Args {
    /// 窗口大小（包个数）
    #[arg(long, default_value_t = DEFAULT_WINDOW_SIZE, conflicts_with = "scenario")]
    window: u64,

    /// 要发送的数据单元总数
    #[arg(long, default_value_t = DEFAULT_TOTAL_PACKETS, conflicts_with = "scenario")]
    total: u64,

    /// 重传超时（tick）
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_TICKS, conflicts_with = "scenario")]
    timeout: u64,

    /// 单向传播时延（tick）
    #[arg(long, default_value_t = DEFAULT_DELAY_TICKS, conflicts_with = "scenario")]
    delay: u64,

    /// 丢弃一次该序号的数据段（可重复）
    #[arg(long = "loss-data", conflicts_with = "scenario")]
    loss_data: Vec<u64>,

    /// 丢弃一次该确认号的 ACK（可重复）
    #[arg(long = "loss-ack", conflicts_with = "scenario")]
    loss_ack: Vec<u64>,

    /// 场景 JSON 文件；与上面的协议参数互斥
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// 不自动填满窗口（只执行场景脚本中的 send 动作）
    #[arg(long, default_value_t = false)]
    no_auto_send: bool,

    /// 最多运行多少个 tick；显式给出时优先于场景文件中的 max_ticks
    #[arg(long)]
    max_ticks: Option<u64>,

    /// 每隔 N 个 tick 向 stdout 打印一行 JSON 快照；0 表示不打印
    #[arg(long, default_value_t = 0)]
    snapshot_every: u64,

    /// 输出可视化 JSON 事件文件；不填则不生成
    #[arg(long)]
    viz_json: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();

    let scenario = match &args.scenario {
        Some(path) => match Scenario::load(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(2);
            }
        },
        None => Scenario {
            config: SessionConfig {
                window_size: args.window,
                total_packets: args.total,
                timeout_ticks: args.timeout,
                delay_ticks: args.delay,
                loss_data: args.loss_data.iter().copied().collect(),
                loss_ack: args.loss_ack.iter().copied().collect(),
            },
            ..Scenario::default()
        },
    };

    let mut session = match Session::new(&scenario.config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: invalid config: {e}");
            return ExitCode::from(2);
        }
    };
    if args.viz_json.is_some() {
        session.enable_viz();
    }

    let opts = RunOpts {
        max_ticks: args
            .max_ticks
            .or(scenario.max_ticks)
            .unwrap_or(RunOpts::default().max_ticks),
        auto_send: scenario.auto_send && !args.no_auto_send,
    };
    info!(?opts, actions = scenario.actions.len(), "开始运行仿真");

    let every = args.snapshot_every;
    let report = session.run(&opts, &scenario.actions, |s| {
        if every > 0 && s.now().0 % every == 0 {
            match serde_json::to_string(&s.snapshot()) {
                Ok(line) => println!("{line}"),
                Err(e) => eprintln!("serialize snapshot: {e}"),
            }
        }
    });

    if let Some(path) = args.viz_json {
        if let Some(v) = session.take_viz() {
            let written = serde_json::to_string_pretty(&v.events)
                .map_err(|e| e.to_string())
                .and_then(|json| fs::write(&path, json).map_err(|e| e.to_string()));
            match written {
                Ok(()) => eprintln!("wrote viz events to {}", path.display()),
                Err(e) => {
                    eprintln!("error: write viz json {}: {e}", path.display());
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    let snap = session.snapshot();
    println!(
        "done={} ticks={} finished_at={:?}\n  sender: base={} next_seq={} retransmissions={} fast_retransmits={} timeouts={}\n  receiver: expected={} buffered={:?} delivered={:?}\n  channel: dropped_data={} dropped_acks={} killed={} in_flight={}",
        report.completed,
        report.ticks,
        report.finished_at.map(|t| t.0),
        snap.sender.base,
        snap.sender.next_seq,
        snap.sender.retransmissions,
        snap.sender.fast_retransmits,
        snap.sender.timeouts,
        snap.receiver.expected_seq,
        snap.receiver.buffered,
        snap.receiver.delivered,
        snap.stats.dropped_data,
        snap.stats.dropped_acks,
        snap.stats.killed,
        snap.in_flight.len(),
    );

    ExitCode::SUCCESS
}
