//! Corner assignment.
//!
//! Decides which screen corner each window slides toward when the desktop
//! is shown.  The assignment is a two-pass greedy:
//!
//! 1. **Anchors.**  Every window gets a *nearest* corner.  Per corner, the
//!    window closest to it among those that call it nearest is assigned
//!    straight away.  A lone window in the bottom-right therefore always
//!    goes bottom-right instead of being pushed elsewhere by the quota.
//! 2. **Quota fill.**  Each corner takes at most `ceil(n / 4)` windows.
//!    Corners are filled in [`Corner::ALL`] order, each one repeatedly
//!    taking the unassigned window with the lowest score for it.
//!
//! Ties always go to the window that comes first in stacking order.  This
//! is not an optimal assignment and is not meant to be; the ordering and
//! tie-breaks are part of the observable behaviour.

use crate::animation::{Anchor, HorizontalAnchor, VerticalAnchor};
use crate::event::{WindowId, WindowSnapshot};
use crate::geometry::{Point, Rect};
use std::fmt;

/// One of the four screen corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    /// All corners in assignment order.
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomRight,
        Corner::BottomLeft,
    ];

    /// Position in [`Corner::ALL`] and in the score array.
    pub fn index(self) -> usize {
        match self {
            Corner::TopLeft => 0,
            Corner::TopRight => 1,
            Corner::BottomRight => 2,
            Corner::BottomLeft => 3,
        }
    }

    pub fn is_right(self) -> bool {
        matches!(self, Corner::TopRight | Corner::BottomRight)
    }

    pub fn is_bottom(self) -> bool {
        matches!(self, Corner::BottomRight | Corner::BottomLeft)
    }

    /// The window edges pinned to the corner's target point.
    ///
    /// A window heading left keeps its right edge on screen, one heading
    /// up keeps its bottom edge, and so on.
    pub fn anchor(self) -> Anchor {
        let horizontal = if self.is_right() {
            HorizontalAnchor::Left
        } else {
            HorizontalAnchor::Right
        };
        let vertical = if self.is_bottom() {
            VerticalAnchor::Top
        } else {
            VerticalAnchor::Bottom
        };
        Anchor::new(horizontal, vertical)
    }

    /// Where the anchored edges of a window end up: one sixteenth of the
    /// screen extent in from the corner.
    pub fn target(self, screen: &Rect) -> Point {
        let x_offset = screen.width / 16.0;
        let y_offset = screen.height / 16.0;
        let x = if self.is_right() {
            screen.right() - x_offset
        } else {
            screen.left() + x_offset
        };
        let y = if self.is_bottom() {
            screen.bottom() - y_offset
        } else {
            screen.top() + y_offset
        };
        Point::new(x, y)
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Corner::TopLeft => write!(f, "top-left"),
            Corner::TopRight => write!(f, "top-right"),
            Corner::BottomRight => write!(f, "bottom-right"),
            Corner::BottomLeft => write!(f, "bottom-left"),
        }
    }
}

/// Manhattan-style distance of `window` to each corner of `screen`,
/// indexed like [`Corner::ALL`].  Lower is closer.
///
/// The distance to a corner is measured to the window's *far* edges, so
/// it is the distance the window has to travel to clear that corner.
pub fn corner_scores(window: &Rect, screen: &Rect) -> [f64; 4] {
    let dl = window.right() - screen.left();
    let dr = screen.right() - window.left();
    let dt = window.bottom() - screen.top();
    let db = screen.bottom() - window.top();
    [dl + dt, dr + dt, dr + db, dl + db]
}

/// Windows that take part in the assignment, in stacking order.
///
/// Invisible windows, docks and desktop windows are skipped.  A desktop
/// window ends the scan for a full transition, since everything stacked
/// above it is what covers the desktop.  During an interactive gesture
/// the scan continues past it.
pub fn eligible_windows(stacking: &[WindowSnapshot], interactive: bool) -> Vec<&WindowSnapshot> {
    let mut eligible = Vec::new();
    for w in stacking {
        if w.desktop {
            if interactive {
                continue;
            }
            break;
        }
        if !w.visible || w.dock {
            continue;
        }
        eligible.push(w);
    }
    eligible
}

/// The outcome of one planning pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CornerAssignment {
    /// `(window, corner)` in the order the assignments were made.
    entries: Vec<(WindowId, Corner)>,
}

impl CornerAssignment {
    pub fn corner_of(&self, window: WindowId) -> Option<Corner> {
        self.entries
            .iter()
            .find(|(w, _)| *w == window)
            .map(|(_, c)| *c)
    }

    /// Number of windows sent to `corner`.
    pub fn count(&self, corner: Corner) -> usize {
        self.entries.iter().filter(|(_, c)| *c == corner).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (WindowId, Corner)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Maximum number of windows per corner for `n` eligible windows.
pub fn per_corner_quota(n: usize) -> usize {
    n.div_ceil(4)
}

/// Assign every eligible window in `stacking` to a corner of `screen`.
pub fn plan(stacking: &[WindowSnapshot], screen: &Rect, interactive: bool) -> CornerAssignment {
    let eligible = eligible_windows(stacking, interactive);
    let scores: Vec<[f64; 4]> = eligible
        .iter()
        .map(|w| corner_scores(&w.geometry, screen))
        .collect();

    let mut assignment = CornerAssignment::default();
    let mut assigned = vec![false; eligible.len()];

    // Pass 1: closest window per corner among those that call it nearest.
    let mut closest: [Option<usize>; 4] = [None; 4];
    for (i, s) in scores.iter().enumerate() {
        let mut nearest = 0;
        for j in 1..4 {
            // An equal score moves on to a corner that has no candidate yet.
            if s[j] < s[nearest] || (s[j] == s[nearest] && closest[j].is_none()) {
                nearest = j;
            }
        }
        let replace = match closest[nearest] {
            Some(c) => scores[c][nearest] > s[nearest],
            None => true,
        };
        if replace {
            closest[nearest] = Some(i);
        }
    }

    let mut anchored = [0usize; 4];
    for corner in Corner::ALL {
        if let Some(i) = closest[corner.index()] {
            assigned[i] = true;
            anchored[corner.index()] = 1;
            assignment.entries.push((eligible[i].id, corner));
        }
    }

    // Pass 2: fill each corner up to the quota.
    let quota = per_corner_quota(eligible.len());
    for corner in Corner::ALL {
        let c = corner.index();
        for _ in 0..quota.saturating_sub(anchored[c]) {
            let mut best: Option<usize> = None;
            for k in 0..eligible.len() {
                if assigned[k] {
                    continue;
                }
                if best.map_or(true, |b| scores[k][c] < scores[b][c]) {
                    best = Some(k);
                }
            }
            let Some(k) = best else {
                break;
            };
            assigned[k] = true;
            assignment.entries.push((eligible[k].id, corner));
        }
    }

    assignment
}
