use crate::net::{Channel, Endpoint, PacketSink};
use crate::proto::Receiver;

const NONE: [u64; 0] = [];

fn channel() -> Channel {
    Channel::new(NONE, NONE, 1).expect("channel")
}

fn deliver(r: &mut Receiver, ch: &mut Channel, seq: u64) {
    let pkt = ch.make_data(seq, format!("Msg{seq}").into());
    r.on_packet(pkt, ch);
}

/// 接收方发出的 ACK 确认号（按入队顺序）
fn acks(ch: &Channel) -> Vec<u64> {
    ch.in_flight()
        .iter()
        .filter(|rec| rec.to == Endpoint::Sender)
        .filter_map(|rec| rec.packet.ack())
        .collect()
}

fn delivered(r: &Receiver) -> Vec<String> {
    r.delivered().iter().map(|p| p.to_string()).collect()
}

#[test]
fn in_order_packet_is_delivered_and_acked() {
    let mut ch = channel();
    let mut r = Receiver::new();

    deliver(&mut r, &mut ch, 0);
    assert_eq!(r.expected_seq(), 1);
    assert_eq!(delivered(&r), vec!["Msg0"]);
    assert_eq!(acks(&ch), vec![1]);
}

#[test]
fn out_of_order_packets_are_buffered_then_drained() {
    let mut ch = channel();
    let mut r = Receiver::new();

    deliver(&mut r, &mut ch, 2);
    deliver(&mut r, &mut ch, 3);
    assert_eq!(r.expected_seq(), 0);
    assert_eq!(r.buffered_seqs(), vec![2, 3]);
    assert!(r.delivered().is_empty());

    deliver(&mut r, &mut ch, 0);
    assert_eq!(r.expected_seq(), 1);
    assert_eq!(r.buffered_seqs(), vec![2, 3]);

    deliver(&mut r, &mut ch, 1);
    assert_eq!(r.expected_seq(), 4);
    assert!(r.buffered_seqs().is_empty());
    assert_eq!(delivered(&r), vec!["Msg0", "Msg1", "Msg2", "Msg3"]);

    assert_eq!(acks(&ch), vec![0, 0, 1, 4]);
}

#[test]
fn first_buffered_copy_wins() {
    let mut ch = channel();
    let mut r = Receiver::new();

    let first = ch.make_data(2, "first".into());
    let first_id = first.id;
    r.on_packet(first, &mut ch);
    let second = ch.make_data(2, "second".into());
    r.on_packet(second, &mut ch);

    let kept = r.buffered(2).expect("seq 2 buffered");
    assert_eq!(kept.id, first_id);
    assert_eq!(kept.payload().map(|p| &**p), Some("first"));
    assert_eq!(acks(&ch), vec![0, 0]);
}

#[test]
fn duplicate_of_delivered_data_only_reacks() {
    let mut ch = channel();
    let mut r = Receiver::new();

    deliver(&mut r, &mut ch, 0);
    deliver(&mut r, &mut ch, 0);
    assert_eq!(r.expected_seq(), 1);
    assert_eq!(delivered(&r), vec!["Msg0"]);
    assert_eq!(acks(&ch), vec![1, 1]);
}

#[test]
fn acks_are_ignored_by_receiver() {
    let mut ch = channel();
    let mut r = Receiver::new();

    let pkt = ch.make_ack(3);
    r.on_packet(pkt, &mut ch);
    assert_eq!(r.expected_seq(), 0);
    assert!(ch.in_flight().is_empty(), "no ack for an ack");
}

#[test]
fn every_ack_equals_expected_seq_after_processing() {
    let mut ch = channel();
    let mut r = Receiver::new();

    for seq in [3, 1, 0, 5, 2, 2, 4, 1, 6] {
        deliver(&mut r, &mut ch, seq);
        let last = *acks(&ch).last().expect("one ack per data packet");
        assert_eq!(last, r.expected_seq(), "after seq={seq}");
        assert!(r.buffered_seqs().iter().all(|&k| k > r.expected_seq()));
    }
    assert_eq!(r.expected_seq(), 7);
    let want: Vec<String> = (0..7).map(|i| format!("Msg{i}")).collect();
    assert_eq!(delivered(&r), want);
}
