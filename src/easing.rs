//! CSS-like cubic Bézier easing curves.

use serde::{Deserialize, Serialize};

/// Easing curve attached to an animation request.
///
/// Every curve is a cubic Bézier with fixed endpoints `(0,0)` and `(1,1)`,
/// matching the CSS `cubic-bezier()` timing functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Curve {
    Linear,
    /// CSS `ease`.
    Ease,
    OutCubic,
    #[default]
    InOutCubic,
}

impl Curve {
    /// The two inner control points `(x1, y1, x2, y2)`.
    pub fn control_points(self) -> (f64, f64, f64, f64) {
        match self {
            Curve::Linear => (0.0, 0.0, 1.0, 1.0),
            Curve::Ease => (0.25, 0.10, 0.25, 1.00),
            Curve::OutCubic => (0.33, 1.0, 0.68, 1.0),
            Curve::InOutCubic => (0.65, 0.0, 0.35, 1.0),
        }
    }

    /// Map normalised time `u` in `[0,1]` to eased progress.
    pub fn ease(self, u: f64) -> f64 {
        if self == Curve::Linear {
            return u.clamp(0.0, 1.0);
        }
        let (x1, y1, x2, y2) = self.control_points();
        bezier_scalar(0.0, 1.0, u, x1, y1, x2, y2)
    }

    /// Interpolate between `a` and `b` at normalised time `u`.
    pub fn interpolate(self, a: f64, b: f64, u: f64) -> f64 {
        a + (b - a) * self.ease(u)
    }
}

/// Interpolate between two scalars using a CSS-like cubic-bezier easing.
///
/// Control points are (0,0), (x1,y1), (x2,y2), (1,1).
/// `u` is normalized time in [0,1].
pub fn bezier_scalar(a: f64, b: f64, u: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    // B(t) = ((a*t + b)*t + c)*t for each axis, endpoints fixed at 0 and 1.
    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;

    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    #[inline]
    fn sample_curve(a: f64, b: f64, c: f64, t: f64) -> f64 {
        ((a * t + b) * t + c) * t
    }

    // Solve x(t) = u for t in [0,1]
    fn solve_t_for_x(u: f64, ax: f64, bx: f64, cx: f64) -> f64 {
        // Newton-Raphson
        let mut t = u;
        for _ in 0..8 {
            let x = ((ax * t + bx) * t + cx) * t - u;
            if x.abs() < 1e-9 {
                return t;
            }
            let dx = (3.0 * ax * t + 2.0 * bx) * t + cx;
            if dx.abs() < 1e-9 {
                break;
            }
            t -= x / dx;
            if !(0.0..=1.0).contains(&t) {
                break;
            }
        }

        // Bisection fallback
        let mut lo = 0.0;
        let mut hi = 1.0;
        t = u;
        for _ in 0..48 {
            let x = ((ax * t + bx) * t + cx) * t;
            if (x - u).abs() < 1e-10 {
                return t;
            }
            if x < u {
                lo = t;
            } else {
                hi = t;
            }
            t = 0.5 * (lo + hi);
        }
        t
    }

    let u = u.clamp(0.0, 1.0);
    let t = solve_t_for_x(u, ax, bx, cx);
    let eased = sample_curve(ay, by, cy, t);

    a + (b - a) * eased
}
