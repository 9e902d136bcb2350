//! Keyframe tweening for reactions and the screen shake.
//!
//! A [`Keyframes`] track holds a handful of [`Keyframe`]s at normalized
//! offsets (`0.0..=1.0`). Sampling a track finds the surrounding pair, eases
//! the local progress with the track's [`Easing`] and interpolates every
//! channel. Like CSS keyframe animations the easing applies per segment, not
//! to the whole timeline.

use smallvec::SmallVec;

/// Easing functions for smooth interpolation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Easing {
    /// Constant speed (no easing).
    Linear,
    /// CSS style `cubic-bezier(x1, y1, x2, y2)`.
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// `cubic-bezier(0.4, 0, 0.2, 1)`, fast out and slow in.
    pub const STANDARD: Easing = Easing::CubicBezier(0.4, 0.0, 0.2, 1.0);
    /// CSS `ease-in-out`.
    pub const EASE_IN_OUT: Easing = Easing::CubicBezier(0.42, 0.0, 0.58, 1.0);
}

/// Apply an easing function to a normalized time value.
///
/// The input `t` is clamped to [0.0, 1.0] and transformed according to the
/// easing curve.
pub fn ease(e: Easing, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match e {
        Easing::Linear => t,
        Easing::CubicBezier(x1, y1, x2, y2) => {
            let s = solve_bezier_x(x1, x2, t);
            bezier(y1, y2, s)
        }
    }
}

/// One coordinate of a cubic bezier with endpoints fixed at 0 and 1.
fn bezier(p1: f32, p2: f32, s: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_slope(p1: f32, p2: f32, s: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Find the curve parameter whose x coordinate equals `x`.
///
/// Newton iterations converge quickly for the usual timing curves; bisection
/// takes over when the slope flattens out.
fn solve_bezier_x(x1: f32, x2: f32, x: f32) -> f32 {
    let mut s = x;
    for _ in 0..8 {
        let err = bezier(x1, x2, s) - x;
        if err.abs() < 1e-6 {
            return s;
        }
        let slope = bezier_slope(x1, x2, s);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= err / slope;
    }

    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    s = x;
    for _ in 0..32 {
        let v = bezier(x1, x2, s);
        if (v - x).abs() < 1e-6 {
            break;
        }
        if v < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    s
}

/// Linearly interpolate between two floats.
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Animated channels at one point of a track.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Keyframe {
    /// Normalized offset in the track, `0.0..=1.0`.
    pub at: f32,
    pub scale: f32,
    /// Degrees.
    pub rotation: f32,
    pub opacity: f32,
    /// Horizontal offset in pixels.
    pub dx: f32,
    /// Vertical offset in pixels (negative is up).
    pub dy: f32,
}

impl Keyframe {
    pub const fn new(at: f32, scale: f32, rotation: f32, opacity: f32, dy: f32) -> Self {
        Keyframe {
            at,
            scale,
            rotation,
            opacity,
            dx: 0.0,
            dy,
        }
    }

    pub const fn shift(at: f32, dx: f32) -> Self {
        Keyframe {
            at,
            scale: 1.0,
            rotation: 0.0,
            opacity: 1.0,
            dx,
            dy: 0.0,
        }
    }

    fn lerp(&self, other: &Keyframe, t: f32) -> Keyframe {
        Keyframe {
            at: lerp_f32(self.at, other.at, t),
            scale: lerp_f32(self.scale, other.scale, t),
            rotation: lerp_f32(self.rotation, other.rotation, t),
            opacity: lerp_f32(self.opacity, other.opacity, t),
            dx: lerp_f32(self.dx, other.dx, t),
            dy: lerp_f32(self.dy, other.dy, t),
        }
    }
}

/// Ordered keyframe track with a per-segment easing.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframes {
    pub frames: SmallVec<[Keyframe; 4]>,
    pub easing: Easing,
}

impl Keyframes {
    /// Build a track; frames are sorted by offset.
    pub fn new(frames: impl IntoIterator<Item = Keyframe>, easing: Easing) -> Self {
        let mut frames: SmallVec<[Keyframe; 4]> = frames.into_iter().collect();
        frames.sort_by(|a, b| a.at.total_cmp(&b.at));
        Keyframes { frames, easing }
    }

    /// Interpolated channels at normalized progress `t`.
    ///
    /// Before the first frame the first frame is held, after the last frame
    /// the last one. An empty track yields an identity frame.
    pub fn sample(&self, t: f32) -> Keyframe {
        let t = t.clamp(0.0, 1.0);
        let (Some(first), Some(last)) = (self.frames.first(), self.frames.last()) else {
            return Keyframe::new(t, 1.0, 0.0, 1.0, 0.0);
        };
        if t <= first.at {
            return *first;
        }
        if t >= last.at {
            return *last;
        }
        for pair in self.frames.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if t >= a.at && t <= b.at {
                let span = b.at - a.at;
                if span <= f32::EPSILON {
                    return *b;
                }
                let local = ease(self.easing, (t - a.at) / span);
                return a.lerp(b, local);
            }
        }
        *last
    }
}
