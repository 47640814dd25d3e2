//! Declarative animation requests handed to the compositor.
//!
//! The effect never moves pixels itself.  It describes *what* should
//! happen to a window (slide its anchored edge to a point, fade to an
//! opacity) in an [`AnimationRequest`] and the compositor's animation
//! engine plays it.  [`AnimationRequest::sample`] evaluates a request at a
//! given time for hosts that want a reference interpolation.

use crate::easing::Curve;
use crate::event::WindowId;
use crate::geometry::{Point, Rect, Size};
use std::time::Duration;

/// Which window attribute an animation drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    Position,
    Opacity,
}

/// Playback direction used by
/// [`Compositor::redirect`](crate::traits::Compositor::redirect).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAnchor {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAnchor {
    Top,
    Bottom,
}

/// The window edge pair that is pinned to an animation's point.
///
/// `Anchor { Right, Bottom }` with point `(100, 50)` means the window's
/// bottom-right corner sits at `(100, 50)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub horizontal: HorizontalAnchor,
    pub vertical: VerticalAnchor,
}

impl Anchor {
    pub fn new(horizontal: HorizontalAnchor, vertical: VerticalAnchor) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Top-left corner of a window of `size` whose anchored edges sit on
    /// `point`.
    pub fn place(self, point: Point, size: Size) -> Point {
        let x = match self.horizontal {
            HorizontalAnchor::Left => point.x,
            HorizontalAnchor::Right => point.x - size.width,
        };
        let y = match self.vertical {
            VerticalAnchor::Top => point.y,
            VerticalAnchor::Bottom => point.y - size.height,
        };
        Point::new(x, y)
    }
}

/// A value an animation starts from or ends at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimValue {
    Point(Point),
    Scalar(f64),
}

/// One animated attribute within an [`AnimationRequest`].
///
/// A missing `from` or `to` means "the window's current value".
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyAnimation {
    pub property: Property,
    pub from: Option<AnimValue>,
    pub to: Option<AnimValue>,
    /// Anchor applied to a `from` point.
    pub source_anchor: Option<Anchor>,
    /// Anchor applied to a `to` point.
    pub target_anchor: Option<Anchor>,
    /// Pin the animation at this elapsed time instead of letting it run.
    /// Used while an edge gesture is being dragged.
    pub frozen_time: Option<Duration>,
    /// The animation follows a gesture rather than a plain timeline.
    pub gesture: bool,
}

impl PropertyAnimation {
    fn new(property: Property) -> Self {
        Self {
            property,
            from: None,
            to: None,
            source_anchor: None,
            target_anchor: None,
            frozen_time: None,
            gesture: false,
        }
    }

    /// Move the window so its `anchor` edges end up on `point`.
    pub fn position_to(point: Point, anchor: Anchor) -> Self {
        Self {
            to: Some(AnimValue::Point(point)),
            target_anchor: Some(anchor),
            ..Self::new(Property::Position)
        }
    }

    /// Move the window from having its `anchor` edges on `point` back to
    /// where it is.
    pub fn position_from(point: Point, anchor: Anchor) -> Self {
        Self {
            from: Some(AnimValue::Point(point)),
            source_anchor: Some(anchor),
            ..Self::new(Property::Position)
        }
    }

    pub fn opacity_to(value: f64) -> Self {
        Self {
            to: Some(AnimValue::Scalar(value)),
            ..Self::new(Property::Opacity)
        }
    }

    pub fn opacity_from(value: f64) -> Self {
        Self {
            from: Some(AnimValue::Scalar(value)),
            ..Self::new(Property::Opacity)
        }
    }

    pub fn frozen_at(mut self, frozen_time: Option<Duration>) -> Self {
        self.frozen_time = frozen_time;
        self
    }

    pub fn as_gesture(mut self) -> Self {
        self.gesture = true;
        self
    }

    fn point(value: Option<AnimValue>, anchor: Option<Anchor>, geometry: &Rect) -> Point {
        match (value, anchor) {
            (Some(AnimValue::Point(p)), Some(a)) => a.place(p, geometry.size()),
            (Some(AnimValue::Point(p)), None) => p,
            _ => geometry.origin(),
        }
    }

    fn scalar(value: Option<AnimValue>) -> f64 {
        match value {
            Some(AnimValue::Scalar(v)) => v,
            _ => 1.0,
        }
    }
}

/// A request to animate one window, as passed to
/// [`Compositor::animate`](crate::traits::Compositor::animate).
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationRequest {
    pub window: WindowId,
    pub duration: Duration,
    pub curve: Curve,
    /// Keep the window at the target after the animation finishes, until
    /// the animation is cancelled or reversed.  `false` drops the
    /// animation (and its effect on the window) once it ends.
    pub keep_at_target: bool,
    pub animations: Vec<PropertyAnimation>,
}

/// Visual state of a window at one point of an animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Top-left corner of the window.
    pub position: Point,
    pub opacity: f64,
}

impl AnimationRequest {
    /// Evaluate the request for a window with `geometry` after `elapsed`.
    ///
    /// A property's `frozen_time`, when set, takes precedence over
    /// `elapsed`.  Attributes without an animation keep their resting
    /// value (the window's origin, full opacity).
    pub fn sample(&self, geometry: Rect, elapsed: Duration) -> Sample {
        let mut sample = Sample {
            position: geometry.origin(),
            opacity: 1.0,
        };
        for anim in &self.animations {
            let u = self.normalised(anim.frozen_time.unwrap_or(elapsed));
            match anim.property {
                Property::Position => {
                    let from = PropertyAnimation::point(anim.from, anim.source_anchor, &geometry);
                    let to = PropertyAnimation::point(anim.to, anim.target_anchor, &geometry);
                    sample.position = Point::new(
                        self.curve.interpolate(from.x, to.x, u),
                        self.curve.interpolate(from.y, to.y, u),
                    );
                }
                Property::Opacity => {
                    let from = PropertyAnimation::scalar(anim.from);
                    let to = PropertyAnimation::scalar(anim.to);
                    sample.opacity = self.curve.interpolate(from, to, u);
                }
            }
        }
        sample
    }

    fn normalised(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }
}
