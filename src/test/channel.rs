use crate::net::{Channel, Endpoint, Endpoints, Packet, PacketId, PacketKind, Segment};
use crate::sim::{ConfigError, Tick};

/// 记录每次交付：(端点, 包 id, 交付时刻)
#[derive(Default)]
struct Recorder {
    got: Vec<(Endpoint, PacketId, Tick)>,
}

impl Endpoints for Recorder {
    fn deliver(&mut self, to: Endpoint, pkt: Packet, channel: &mut Channel) {
        self.got.push((to, pkt.id, channel.now()));
    }
}

/// 收到数据段就回一个 ACK（不做任何协议逻辑）
#[derive(Default)]
struct Echo {
    got: Vec<(u64, Tick)>,
}

impl Endpoints for Echo {
    fn deliver(&mut self, _to: Endpoint, pkt: Packet, channel: &mut Channel) {
        self.got.push((pkt.number(), channel.now()));
        if let Segment::Data { seq, .. } = pkt.segment {
            let ack = channel.make_ack(seq + 1);
            channel.admit(ack, Endpoint::Sender);
        }
    }
}

const NONE: [u64; 0] = [];

fn data(ch: &mut Channel, seq: u64) -> Packet {
    ch.make_data(seq, format!("Msg{seq}").into())
}

#[test]
fn zero_delay_is_rejected() {
    let err = Channel::new(NONE, NONE, 0).expect_err("delay 0 must fail");
    assert_eq!(err, ConfigError::InvalidDelay(0));
}

#[test]
fn data_loss_is_consumed_exactly_once() {
    let mut ch = Channel::new([2], NONE, 1).expect("channel");

    let first = data(&mut ch, 2);
    ch.admit(first, Endpoint::Receiver);
    assert!(ch.in_flight().is_empty(), "first seq=2 must be dropped");
    assert_eq!(ch.stats.dropped_data, 1);
    assert!(ch.pending_data_losses().is_empty());

    let retrans = data(&mut ch, 2);
    ch.admit(retrans, Endpoint::Receiver);
    assert_eq!(ch.in_flight().len(), 1, "retransmission must get through");
    assert_eq!(ch.stats.dropped_data, 1);
    assert_eq!(ch.stats.admitted_data, 1);
}

#[test]
fn ack_loss_set_only_matches_acks() {
    let mut ch = Channel::new(NONE, [3], 1).expect("channel");

    let d = data(&mut ch, 3);
    ch.admit(d, Endpoint::Receiver);
    assert_eq!(ch.in_flight().len(), 1, "data seq=3 is not in the data loss set");

    let a = ch.make_ack(3);
    ch.admit(a, Endpoint::Sender);
    assert_eq!(ch.in_flight().len(), 1, "ack=3 must be dropped");
    assert_eq!(ch.stats.dropped_acks, 1);

    let a = ch.make_ack(3);
    ch.admit(a, Endpoint::Sender);
    assert_eq!(ch.in_flight().len(), 2);
}

#[test]
fn packets_arrive_after_exactly_delay_ticks_in_insertion_order() {
    let mut ch = Channel::new(NONE, NONE, 3).expect("channel");
    let a = data(&mut ch, 0);
    let b = ch.make_ack(7);
    let (a_id, b_id) = (a.id, b.id);
    ch.admit(a, Endpoint::Receiver);
    ch.admit(b, Endpoint::Sender);

    let mut rec = Recorder::default();
    ch.advance_one_tick(&mut rec);
    ch.advance_one_tick(&mut rec);
    assert!(rec.got.is_empty());
    assert_eq!(ch.in_flight()[0].remaining, 1);

    ch.advance_one_tick(&mut rec);
    assert_eq!(
        rec.got,
        vec![
            (Endpoint::Receiver, a_id, Tick(3)),
            (Endpoint::Sender, b_id, Tick(3)),
        ]
    );
    assert!(ch.in_flight().is_empty());
    assert_eq!(ch.stats.delivered_data, 1);
    assert_eq!(ch.stats.delivered_acks, 1);
}

#[test]
fn packets_admitted_during_delivery_wait_the_full_delay() {
    let mut ch = Channel::new(NONE, NONE, 2).expect("channel");
    let d = data(&mut ch, 0);
    ch.admit(d, Endpoint::Receiver);

    let mut echo = Echo::default();
    ch.advance_one_tick(&mut echo);
    ch.advance_one_tick(&mut echo);
    assert_eq!(echo.got, vec![(0, Tick(2))]);
    assert_eq!(ch.in_flight().len(), 1);
    assert_eq!(ch.in_flight()[0].remaining, 2, "ack must not age in the tick it was admitted");

    ch.advance_one_tick(&mut echo);
    assert_eq!(echo.got.len(), 1);
    ch.advance_one_tick(&mut echo);
    assert_eq!(echo.got, vec![(0, Tick(2)), (1, Tick(4))]);
}

#[test]
fn remove_in_flight_matches_identity_not_content() {
    let mut ch = Channel::new(NONE, NONE, 5).expect("channel");
    let original = data(&mut ch, 1);
    let retrans = data(&mut ch, 1);
    let (orig_id, retrans_id) = (original.id, retrans.id);
    assert_ne!(orig_id, retrans_id);
    ch.admit(original, Endpoint::Receiver);
    ch.admit(retrans, Endpoint::Receiver);

    assert!(ch.remove_in_flight(retrans_id));
    assert_eq!(ch.in_flight().len(), 1);
    assert_eq!(ch.in_flight()[0].packet.id, orig_id);

    assert!(!ch.remove_in_flight(retrans_id), "already removed");
    assert_eq!(ch.stats.killed, 1);
}

#[test]
fn find_in_flight_returns_first_match_by_kind_and_number() {
    let mut ch = Channel::new(NONE, NONE, 5).expect("channel");
    let d = data(&mut ch, 1);
    let a = ch.make_ack(1);
    let a_id = a.id;
    ch.admit(d, Endpoint::Receiver);
    ch.admit(a, Endpoint::Sender);

    assert_eq!(ch.find_in_flight(PacketKind::Ack, 1), Some(a_id));
    assert_eq!(ch.find_in_flight(PacketKind::Data, 2), None);
}

#[test]
fn in_flight_progress_tracks_remaining_delay() {
    let mut ch = Channel::new(NONE, NONE, 4).expect("channel");
    let d = data(&mut ch, 0);
    ch.admit(d, Endpoint::Receiver);
    assert_eq!(ch.in_flight()[0].progress(), 0.0);

    let mut rec = Recorder::default();
    ch.advance_one_tick(&mut rec);
    assert_eq!(ch.in_flight()[0].progress(), 0.25);
    ch.advance_one_tick(&mut rec);
    assert_eq!(ch.in_flight()[0].progress(), 0.5);
    assert_eq!(ch.in_flight()[0].total, 4);
}
