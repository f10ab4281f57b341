//! Motion curves for the card. Everything is a pure function of elapsed
//! milliseconds so the frame loop just samples them.

pub const INTRO_MS: f64 = 500.0;
pub const CANDLE_BOB_MS: f64 = 500.0;
pub const CANDLE_BOB_KEYFRAMES: [f64; 3] = [0.0, -5.0, 0.0];
pub const BALLOON_POP_MS: f64 = 300.0;
pub const CARD_HOVER_SCALE: f64 = 1.05;
pub const ICON_HOVER_SCALE: f64 = 1.1;

fn progress(elapsed_ms: f64, duration_ms: f64) -> f64 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    (elapsed_ms / duration_ms).clamp(0.0, 1.0)
}

/// Quadratic ease-out.
pub fn ease_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Evenly spaced keyframes, linearly interpolated. `t` in [0, 1].
pub fn keyframes(values: &[f64], t: f64) -> f64 {
    match values {
        [] => 0.0,
        [only] => *only,
        _ => {
            let segments = (values.len() - 1) as f64;
            let pos = t.clamp(0.0, 1.0) * segments;
            let i = (pos.floor() as usize).min(values.len() - 2);
            let local = pos - i as f64;
            values[i] + (values[i + 1] - values[i]) * local
        }
    }
}

/// Card entrance: `(scale, opacity)`, scale 0.9 -> 1 and opacity 0 -> 1.
pub fn card_intro(elapsed_ms: f64) -> (f64, f64) {
    let e = ease_out(progress(elapsed_ms, INTRO_MS));
    (0.9 + 0.1 * e, e)
}

/// Vertical offset in px of a lit candle; loops forever.
pub fn candle_bob(elapsed_ms: f64) -> f64 {
    let phase = elapsed_ms.max(0.0).rem_euclid(CANDLE_BOB_MS) / CANDLE_BOB_MS;
    keyframes(&CANDLE_BOB_KEYFRAMES, phase)
}

/// Balloon scale; `None` while it is still floating.
pub fn balloon_scale(since_pop_ms: Option<f64>) -> f64 {
    match since_pop_ms {
        None => 1.0,
        Some(e) => 1.0 - ease_out(progress(e, BALLOON_POP_MS)),
    }
}

/// Extra scale applied while the pointer is over an element.
pub fn hover_scale(hovered: bool, factor: f64) -> f64 {
    if hovered { factor } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn intro_endpoints() {
        let (s, o) = card_intro(0.0);
        assert!(close(s, 0.9) && close(o, 0.0));
        let (s, o) = card_intro(INTRO_MS);
        assert!(close(s, 1.0) && close(o, 1.0));
        let (s, _) = card_intro(10_000.0);
        assert!(close(s, 1.0));
    }

    #[test]
    fn candle_bob_peaks_mid_cycle_and_repeats() {
        assert!(close(candle_bob(0.0), 0.0));
        assert!(close(candle_bob(250.0), -5.0));
        assert!(close(candle_bob(125.0), -2.5));
        assert!(close(candle_bob(750.0), -5.0));
    }

    #[test]
    fn balloon_shrinks_to_nothing() {
        assert!(close(balloon_scale(None), 1.0));
        assert!(close(balloon_scale(Some(0.0)), 1.0));
        assert!(balloon_scale(Some(150.0)) < 1.0);
        assert!(close(balloon_scale(Some(BALLOON_POP_MS)), 0.0));
    }

    #[test]
    fn hover_only_scales_when_hovered() {
        assert!(close(hover_scale(false, CARD_HOVER_SCALE), 1.0));
        assert!(close(hover_scale(true, CARD_HOVER_SCALE), 1.05));
        assert!(close(hover_scale(true, ICON_HOVER_SCALE), 1.1));
    }

    #[test]
    fn keyframes_degenerate_inputs() {
        assert!(close(keyframes(&[], 0.5), 0.0));
        assert!(close(keyframes(&[3.0], 0.7), 3.0));
        assert!(close(keyframes(&[0.0, 10.0], 1.0), 10.0));
    }
}
