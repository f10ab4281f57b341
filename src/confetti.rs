//! One-shot confetti burst drawn on a full-viewport canvas.
//!
//! Pieces are emitted along the top edge, ramping up to the requested count
//! over [`EMIT_MS`]. They fall, drift and spin; once a piece leaves the
//! viewport it is dropped, not recycled. The burst is finished when every
//! piece has been emitted and has left.

use web_sys::CanvasRenderingContext2d;

pub const EMIT_MS: f64 = 5_000.0;
/// px per frame^2, where a frame is 1/60 s.
pub const GRAVITY: f64 = 0.1;
pub const MAX_VX: f64 = 4.0;
pub const MAX_VY: f64 = 10.0;
const FRAME_MS: f64 = 1000.0 / 60.0;
// A hidden tab resumes with a huge delta; don't teleport everything off-screen.
const MAX_STEP_MS: f64 = 100.0;
const EDGE_MARGIN: f64 = 20.0;

fn range(rng: &mut fastrand::Rng, lo: f64, hi: f64) -> f64 {
    lo + (hi - lo) * rng.f64()
}

#[derive(Clone, Debug)]
pub struct Piece {
    pub x: f64,
    pub y: f64,
    vx: f64,
    vy: f64,
    pub w: f64,
    pub h: f64,
    pub angle: f64,
    spin: f64,
    pub color: usize,
}

pub struct ConfettiBurst {
    width: f64,
    height: f64,
    count: u32,
    colors: Vec<String>,
    rng: fastrand::Rng,
    pieces: Vec<Piece>,
    emitted: u32,
    elapsed_ms: f64,
}

impl ConfettiBurst {
    pub fn new(width: f64, height: f64, count: u32, colors: Vec<String>, seed: u64) -> Self {
        Self {
            width,
            height,
            count,
            colors,
            rng: fastrand::Rng::with_seed(seed),
            pieces: Vec::new(),
            emitted: 0,
            elapsed_ms: 0.0,
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn emitted(&self) -> u32 {
        self.emitted
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn is_finished(&self) -> bool {
        self.emitted >= self.count && self.pieces.is_empty()
    }

    /// How many pieces should exist by now given the emission ramp.
    fn emit_target(&self) -> u32 {
        let t = (self.elapsed_ms / EMIT_MS).clamp(0.0, 1.0);
        ((self.count as f64 * t).round() as u32).min(self.count)
    }

    fn spawn(&mut self) -> Piece {
        let rng = &mut self.rng;
        Piece {
            x: range(rng, 0.0, self.width.max(0.0)),
            y: 0.0,
            vx: range(rng, -MAX_VX, MAX_VX),
            vy: range(rng, 0.0, MAX_VY),
            w: range(rng, 5.0, 20.0),
            h: range(rng, 5.0, 10.0),
            angle: range(rng, 0.0, std::f64::consts::TAU),
            spin: range(rng, -0.2, 0.2),
            color: if self.colors.is_empty() {
                0
            } else {
                rng.usize(..self.colors.len())
            },
        }
    }

    /// Advance the simulation by `dt_ms`.
    pub fn step(&mut self, dt_ms: f64) {
        if self.is_finished() {
            return;
        }
        let dt_ms = dt_ms.clamp(0.0, MAX_STEP_MS);
        self.elapsed_ms += dt_ms;
        let frames = dt_ms / FRAME_MS;

        let target = self.emit_target();
        while self.emitted < target {
            let p = self.spawn();
            self.pieces.push(p);
            self.emitted += 1;
        }

        for p in &mut self.pieces {
            p.vy += GRAVITY * frames;
            p.x += p.vx * frames;
            p.y += p.vy * frames;
            p.angle += p.spin * frames;
        }
        let (w, h) = (self.width, self.height);
        self.pieces.retain(|p| {
            p.y <= h + EDGE_MARGIN && p.x >= -EDGE_MARGIN && p.x <= w + EDGE_MARGIN
        });
    }

    pub fn draw(&self, ctx: &CanvasRenderingContext2d) {
        ctx.clear_rect(0.0, 0.0, self.width, self.height);
        for p in &self.pieces {
            if let Some(color) = self.colors.get(p.color) {
                ctx.set_fill_style_str(color);
            }
            ctx.save();
            let _ = ctx.translate(p.x, p.y);
            let _ = ctx.rotate(p.angle);
            ctx.fill_rect(-p.w / 2.0, -p.h / 2.0, p.w, p.h);
            ctx.restore();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn burst(count: u32) -> ConfettiBurst {
        let colors = vec!["#FF5733".to_string(), "#FFD700".to_string()];
        ConfettiBurst::new(200.0, 100.0, count, colors, 42)
    }

    #[test]
    fn same_seed_scatters_the_same_way() {
        let mut a = burst(500);
        let mut b = burst(500);
        a.step(100.0);
        b.step(100.0);
        assert_eq!(a.pieces().len(), b.pieces().len());
        for (p, q) in a.pieces().iter().zip(b.pieces()) {
            assert_eq!((p.x, p.y, p.color), (q.x, q.y, q.color));
        }
    }

    #[test]
    fn emission_ramps_up() {
        let mut b = burst(100);
        assert_eq!(b.emitted(), 0);
        for _ in 0..25 {
            b.step(100.0);
        }
        // half of the emission window
        assert_eq!(b.emitted(), 50);
        for _ in 0..50 {
            b.step(100.0);
        }
        assert_eq!(b.emitted(), 100);
    }

    #[test]
    fn one_shot_burst_finishes() {
        let mut b = burst(200);
        let mut steps = 0;
        while !b.is_finished() {
            b.step(FRAME_MS);
            steps += 1;
            assert!(steps < 100_000, "burst never finished");
        }
        assert_eq!(b.emitted(), 200);
        assert!(b.pieces().is_empty());
        // further steps are no-ops
        b.step(FRAME_MS);
        assert_eq!(b.emitted(), 200);
    }

    #[test]
    fn pieces_start_on_top_edge_with_palette_colors() {
        let mut b = burst(100);
        b.step(1.0);
        b.step(60.0);
        assert!(!b.pieces().is_empty());
        for p in b.pieces() {
            assert!(p.x >= -EDGE_MARGIN && p.x <= 200.0 + EDGE_MARGIN);
            assert!(p.y < 50.0);
            assert!(p.color < 2);
        }
    }

    #[test]
    fn huge_delta_is_clamped() {
        let mut b = burst(1000);
        b.step(60_000.0);
        assert_eq!(b.emitted(), 20);
    }
}
