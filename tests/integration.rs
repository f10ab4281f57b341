// Integration tests (native) for the `birthday-card` crate.
// These tests avoid wasm-specific functionality and exercise the interaction
// rules so they can run under `cargo test` on the host.

use birthday_card::{CardConfig, InteractionState, Phase};

fn fresh() -> InteractionState {
    InteractionState::from_config(&CardConfig::default())
}

#[test]
fn lighting_and_popping_everything_shows_confetti_without_celebrating() {
    let mut s = fresh();
    for i in 0..5 {
        assert!(s.light_candle(i));
    }
    assert!(!s.confetti_visible());
    for i in 0..5 {
        assert!(s.pop_balloon(i));
    }
    assert_eq!(s.candles_lit(), 5);
    assert_eq!(s.balloons_popped(), 5);
    assert!(s.confetti_visible());
    assert!(!s.celebrating());
    assert_eq!(s.phase(), Phase::Idle);
}

#[test]
fn out_of_order_candle_is_ignored() {
    let mut s = fresh();
    assert!(!s.light_candle(1));
    assert_eq!(s.candles_lit(), 0);
}

#[test]
fn out_of_order_balloons_are_ignored() {
    let mut s = fresh();
    for i in 1..10 {
        assert!(!s.pop_balloon(i));
    }
    assert_eq!(s.balloons_popped(), 0);
    assert!(s.pop_balloon(0));
    assert!(!s.pop_balloon(0));
    assert_eq!(s.balloons_popped(), 1);
}

#[test]
fn celebrate_from_zero_runs_candles_to_total() {
    let mut s = fresh();
    assert!(s.celebrate());
    assert!(s.celebrating());
    assert!(s.confetti_visible());
    assert_eq!(s.candles_lit(), 0);

    let mut ticks = 0;
    while s.celebration_tick() {
        ticks += 1;
    }
    // the final tick reports "stop" after lighting the last candle
    assert_eq!(ticks + 1, 5);
    assert_eq!(s.candles_lit(), 5);
    assert!(!s.celebration_tick());
    assert_eq!(s.candles_lit(), 5);
    assert_eq!(s.phase(), Phase::Complete);
    assert!(s.celebrating());
}

#[test]
fn second_celebrate_changes_nothing() {
    let mut s = fresh();
    assert!(s.celebrate());
    s.celebration_tick();
    let lit = s.candles_lit();
    assert!(!s.celebrate());
    assert_eq!(s.candles_lit(), lit);
    assert!(s.celebrating());
}

#[test]
fn clicks_interleave_with_celebration_ticks() {
    let mut s = fresh();
    s.light_candle(0);
    s.celebrate();
    assert!(s.celebration_tick());
    assert_eq!(s.candles_lit(), 2);
    // manual click on the next candle still counts while celebrating
    assert!(s.light_candle(2));
    assert!(s.pop_balloon(0));
    assert!(s.celebration_tick());
    assert!(!s.celebration_tick());
    assert_eq!(s.candles_lit(), 5);
    assert_eq!(s.balloons_popped(), 1);
}

#[test]
fn confetti_never_turns_off() {
    let mut s = fresh();
    let mut seen = false;
    for i in 0..5 {
        s.light_candle(i);
        s.pop_balloon(i);
        let now = s.confetti_visible();
        assert!(!(seen && !now));
        seen |= now;
    }
    assert!(seen);
    s.celebrate();
    assert!(s.confetti_visible());
}

#[test]
fn celebrating_renders_next_candle_lit() {
    let cfg = CardConfig::default();
    let mut s = InteractionState::from_config(&cfg);
    s.light_candle(0);
    let manual: Vec<bool> = s.view(&cfg).candles.iter().map(|c| c.active).collect();
    assert_eq!(manual, [true, false, false, false, false]);
    s.celebrate();
    let view = s.view(&cfg);
    let celebrating: Vec<bool> = view.candles.iter().map(|c| c.active).collect();
    assert_eq!(celebrating, [true, true, false, false, false]);
    assert!(!view.celebrate_enabled);
}

#[test]
fn nothing_is_mounted_on_the_host() {
    assert!(!birthday_card::is_mounted());
    assert!(!birthday_card::unmount_card());
}
