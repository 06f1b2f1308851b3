use crate::sim::Tick;

#[test]
fn tick_advances_and_saturates() {
    assert_eq!(Tick::ZERO.next(), Tick(1));
    assert_eq!(Tick(u64::MAX).next(), Tick(u64::MAX));
    assert_eq!(Tick(u64::MAX - 1).next(), Tick(u64::MAX));
}

#[test]
fn tick_display() {
    assert_eq!(Tick(12).to_string(), "t=12");
}
