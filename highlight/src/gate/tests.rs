use super::*;

const THROTTLE: Duration = Duration::from_millis(250);
const DEBOUNCE: Duration = Duration::from_millis(120);

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn gate() -> FlushGate {
    FlushGate::new(THROTTLE, DEBOUNCE)
}

#[test]
fn test_idle_gate_never_fires() {
    let mut gate = gate();
    let t0 = Instant::now();
    assert!(!gate.is_armed());
    assert!(!gate.poll(t0 + ms(10_000)));
    assert_eq!(gate.next_deadline(), None);
}

#[test]
fn test_first_arm_fires_on_leading_edge() {
    let mut gate = gate();
    let t0 = Instant::now();
    gate.arm(t0);
    assert_eq!(gate.next_deadline(), Some(t0));
    assert!(gate.poll(t0));
    assert_eq!(gate.last_fire(), Some(t0));
}

#[test]
fn test_trailing_fire_waits_for_throttle() {
    let mut gate = gate();
    let t0 = Instant::now();
    gate.arm(t0);
    assert!(gate.poll(t0));

    // Debounce deadline survives the leading fire, pushed out to the interval.
    assert!(gate.is_armed());
    assert_eq!(gate.next_deadline(), Some(t0 + THROTTLE));
    assert!(!gate.poll(t0 + ms(120)));
    assert!(!gate.poll(t0 + ms(249)));
    assert!(gate.poll(t0 + ms(250)));
    assert!(!gate.is_armed());
}

#[test]
fn test_rearm_within_throttle_waits_for_interval() {
    let mut gate = gate();
    let t0 = Instant::now();
    gate.arm(t0);
    assert!(gate.poll(t0));

    gate.arm(t0 + ms(100));
    assert_eq!(gate.next_deadline(), Some(t0 + ms(250)));
    assert!(!gate.poll(t0 + ms(249)));
    assert!(gate.poll(t0 + ms(250)));
    assert!(!gate.is_armed());
}

#[test]
fn test_quiet_period_after_interval_uses_debounce() {
    let mut gate = gate();
    let t0 = Instant::now();
    gate.arm(t0);
    assert!(gate.poll(t0));
    assert!(gate.poll(t0 + ms(250)));

    // Long after the last fire the throttle no longer holds anything back.
    gate.arm(t0 + ms(1_000));
    assert!(gate.poll(t0 + ms(1_000)));
    assert_eq!(gate.next_deadline(), Some(t0 + ms(1_250)));
}

#[test]
fn test_short_burst_fires_once_per_interval() {
    let mut gate = gate();
    let t0 = Instant::now();
    let mut fires = Vec::new();

    for i in 0..600u64 {
        let now = t0 + ms(i);
        if i <= 50 && i % 10 == 0 {
            gate.arm(now);
        }
        if gate.poll(now) {
            fires.push(i);
        }
    }

    assert_eq!(fires, [0, 250]);
}

#[test]
fn test_cancel_clears_deadlines() {
    let mut gate = gate();
    let t0 = Instant::now();
    gate.arm(t0);
    gate.cancel();
    assert!(!gate.is_armed());
    assert!(!gate.poll(t0 + ms(1_000)));
}

#[test]
fn test_burst_is_throttled_then_debounced() {
    let mut gate = gate();
    let t0 = Instant::now();
    let step = ms(10);
    let burst_len = 100;
    let mut fires = Vec::new();

    // One notification every 10ms for a second, polling at the same cadence.
    for i in 0..burst_len {
        let now = t0 + step * i;
        gate.arm(now);
        if gate.poll(now) {
            fires.push(now);
        }
    }
    let last_arm = t0 + step * (burst_len - 1);

    // Keep polling well past the burst.
    for i in burst_len..burst_len + 100 {
        let now = t0 + step * i;
        if gate.poll(now) {
            fires.push(now);
        }
    }

    for pair in fires.windows(2) {
        assert!(pair[1] - pair[0] >= THROTTLE, "fires too close");
    }
    assert!(fires.len() as u32 <= (step * burst_len).as_millis() as u32 / 250 + 2);
    let trailing = fires.last().unwrap();
    assert!(*trailing >= last_arm + DEBOUNCE);
    assert!(*trailing <= last_arm + THROTTLE + step);
    assert!(!gate.is_armed());
}
