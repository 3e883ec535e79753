// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_clock_can_be_advanced() {
    let clock = FakeClock::new();
    let t1 = clock.now();
    clock.advance(Duration::from_secs(60));
    let t2 = clock.now();
    assert_eq!(t2.duration_since(t1).unwrap(), Duration::from_secs(60));
}

#[test]
fn fake_clock_is_cloneable_and_shared() {
    let clock1 = FakeClock::new();
    let clock2 = clock1.clone();
    let t1 = clock1.now();
    clock2.advance(Duration::from_secs(30));
    let t2 = clock1.now();
    assert_eq!(t2.duration_since(t1).unwrap(), Duration::from_secs(30));
}

#[test]
fn until_is_zero_for_past_times() {
    let clock = FakeClock::new();
    let past = clock.now() - Duration::from_secs(5);
    assert_eq!(clock.until(past), Duration::ZERO);
    let future = clock.now() + Duration::from_secs(5);
    assert_eq!(clock.until(future), Duration::from_secs(5));
}

#[test]
fn set_moves_the_clock_to_an_exact_time() {
    let clock = FakeClock::new();
    clock.set(SystemTime::UNIX_EPOCH);
    assert_eq!(clock.now(), SystemTime::UNIX_EPOCH);
}
