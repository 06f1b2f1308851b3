//! 在一组确定性的丢包配置上扫描，检查每个 tick 都成立的不变量。

use std::collections::BTreeSet;

use crate::sim::{RunOpts, Session, SessionConfig};

fn loss_patterns(total: u64) -> Vec<BTreeSet<u64>> {
    let mut out = vec![BTreeSet::new()];
    for n in 0..total {
        out.push([n].into_iter().collect());
    }
    out.push((0..total).step_by(2).collect());
    out.push((0..total).collect());
    out
}

#[test]
fn window_bound_monotonicity_and_in_order_delivery_hold_everywhere() {
    let mut sessions = 0usize;
    for window in 1..=4u64 {
        for total in 1..=5u64 {
            for delay in 1..=3u64 {
                for loss_data in loss_patterns(total) {
                    for loss_ack in loss_patterns(total + 1) {
                        let cfg = SessionConfig {
                            window_size: window,
                            total_packets: total,
                            timeout_ticks: 2 * delay + 3,
                            delay_ticks: delay,
                            loss_data: loss_data.clone(),
                            loss_ack,
                        };
                        check_session(&cfg);
                        sessions += 1;
                    }
                }
            }
        }
    }
    assert!(sessions > 1_000);
}

fn check_session(cfg: &SessionConfig) {
    let mut s = Session::new(cfg).expect("session");
    let mut last_base = 0u64;
    let mut last_next = 0u64;
    let mut violations: Vec<String> = Vec::new();

    let report = s.run(
        &RunOpts {
            max_ticks: 10_000,
            auto_send: true,
        },
        &[],
        |s| {
            let snd = s.sender();
            let rcv = s.receiver();
            if snd.next_seq() - snd.base() > snd.window_size() {
                violations.push(format!("window bound at t={}", s.now().0));
            }
            if snd.next_seq() > snd.total_packets() {
                violations.push(format!("next_seq beyond total at t={}", s.now().0));
            }
            if snd.base() < last_base || snd.next_seq() < last_next {
                violations.push(format!("monotonicity at t={}", s.now().0));
            }
            last_base = snd.base();
            last_next = snd.next_seq();

            let expected = rcv.expected_seq();
            let in_order = rcv.delivered().len() as u64 == expected
                && rcv
                    .delivered()
                    .iter()
                    .enumerate()
                    .all(|(i, p)| &**p == format!("Msg{i}"));
            if !in_order {
                violations.push(format!("delivery order at t={}", s.now().0));
            }
            if rcv.buffered_seqs().iter().any(|&k| k <= expected) {
                violations.push(format!("stale buffer key at t={}", s.now().0));
            }
            if snd.timer().running != (snd.base() < snd.next_seq()) {
                violations.push(format!("timer state at t={}", s.now().0));
            }
        },
    );

    assert!(violations.is_empty(), "{cfg:?}: {violations:?}");
    assert!(report.completed, "{cfg:?} did not complete");
    assert_eq!(s.receiver().expected_seq(), cfg.total_packets);
    // 每个序号至少发送一次，数据段丢包配置必然全部消耗
    assert!(s.channel().pending_data_losses().is_empty());
}
