//! Host events and the types used throughout aperture.
//!
//! This module defines the vocabulary shared by all components:
//! [`HostEvent`] describes every callback the compositor delivers, and
//! [`ScreenEdge`] / [`WindowSnapshot`] / [`WindowId`] / [`AnimationId`]
//! provide the supporting data types.
//!
//! Screen edges arrive either by name (`"top"`, `"top-left"`, `"TopLeft"`)
//! or as the compositor's numeric electric-border id (`0` = top, going
//! clockwise to `7` = top-left).

use crate::geometry::{Rect, Size};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque, host-assigned window identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Handle to an animation issued through
/// [`Compositor::animate`](crate::traits::Compositor::animate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationId(pub u64);

/// What the effect needs to know about one window in the stacking order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSnapshot {
    pub id: WindowId,
    pub geometry: Rect,
    pub visible: bool,
    /// Panels and docks.
    #[serde(default)]
    pub dock: bool,
    /// The desktop background window.
    #[serde(default)]
    pub desktop: bool,
}

impl WindowSnapshot {
    /// A visible, normal window.
    pub fn normal(id: u64, geometry: Rect) -> Self {
        Self {
            id: WindowId(id),
            geometry,
            visible: true,
            dock: false,
            desktop: false,
        }
    }
}

/// A screen edge or corner that can carry a touch/pointer gesture.
///
/// The discriminants match the compositor's electric-border numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScreenEdge {
    Top = 0,
    TopRight = 1,
    Right = 2,
    BottomRight = 3,
    Bottom = 4,
    BottomLeft = 5,
    Left = 6,
    TopLeft = 7,
}

impl ScreenEdge {
    /// Look up an edge by its electric-border id.
    pub fn from_id(id: u64) -> Option<Self> {
        Some(match id {
            0 => ScreenEdge::Top,
            1 => ScreenEdge::TopRight,
            2 => ScreenEdge::Right,
            3 => ScreenEdge::BottomRight,
            4 => ScreenEdge::Bottom,
            5 => ScreenEdge::BottomLeft,
            6 => ScreenEdge::Left,
            7 => ScreenEdge::TopLeft,
            _ => return None,
        })
    }
}

impl fmt::Display for ScreenEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreenEdge::Top => write!(f, "top"),
            ScreenEdge::TopRight => write!(f, "top-right"),
            ScreenEdge::Right => write!(f, "right"),
            ScreenEdge::BottomRight => write!(f, "bottom-right"),
            ScreenEdge::Bottom => write!(f, "bottom"),
            ScreenEdge::BottomLeft => write!(f, "bottom-left"),
            ScreenEdge::Left => write!(f, "left"),
            ScreenEdge::TopLeft => write!(f, "top-left"),
        }
    }
}

/// Parse an edge name (case-insensitive; accepts "top", "top-left",
/// "TopLeft", "bottom_right" or a numeric id).
fn parse_edge(s: &str) -> Option<ScreenEdge> {
    let normalized: String = s
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(|c| c.to_lowercase())
        .collect();
    match normalized.as_str() {
        "top" => Some(ScreenEdge::Top),
        "topright" => Some(ScreenEdge::TopRight),
        "right" => Some(ScreenEdge::Right),
        "bottomright" => Some(ScreenEdge::BottomRight),
        "bottom" => Some(ScreenEdge::Bottom),
        "bottomleft" => Some(ScreenEdge::BottomLeft),
        "left" => Some(ScreenEdge::Left),
        "topleft" => Some(ScreenEdge::TopLeft),
        other => other.parse::<u64>().ok().and_then(ScreenEdge::from_id),
    }
}

impl<'de> Deserialize<'de> for ScreenEdge {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Visitor;
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = ScreenEdge;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "edge name or electric-border id 0..=7")
            }
            fn visit_u64<E>(self, n: u64) -> Result<ScreenEdge, E>
            where
                E: DeError,
            {
                ScreenEdge::from_id(n)
                    .ok_or_else(|| DeError::custom(format!("invalid screen edge id: {}", n)))
            }
            fn visit_i64<E>(self, n: i64) -> Result<ScreenEdge, E>
            where
                E: DeError,
            {
                u64::try_from(n)
                    .ok()
                    .and_then(ScreenEdge::from_id)
                    .ok_or_else(|| DeError::custom(format!("invalid screen edge id: {}", n)))
            }
            fn visit_str<E>(self, s: &str) -> Result<ScreenEdge, E>
            where
                E: DeError,
            {
                parse_edge(s).ok_or_else(|| DeError::custom(format!("invalid screen edge: {:?}", s)))
            }
        }
        deserializer.deserialize_any(V)
    }
}

/// Every callback the compositor delivers to the effect.
///
/// Events are produced by [`EventSource`](crate::traits::EventSource)
/// implementations and consumed by the
/// [`ApertureEffect`](crate::effect::ApertureEffect), one at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostEvent {
    /// The show-desktop state was toggled.
    ShowingDesktopChanged(bool),

    /// A realtime screen-edge gesture moved, ended or was cancelled.
    ///
    /// `delta` is the accumulated finger/pointer travel since the gesture
    /// started.  `delta` and `screen` are both present while the gesture
    /// is live; either one missing means the gesture is over.
    ScreenEdge {
        edge: ScreenEdge,
        #[serde(default)]
        delta: Option<Size>,
        #[serde(default)]
        screen: Option<Rect>,
    },

    /// An animation issued by this effect finished (or terminated at its
    /// source after being reversed).
    AnimationEnded {
        window: WindowId,
        animation: AnimationId,
    },

    /// A window was destroyed.
    WindowClosed(WindowId),

    /// The effect's configuration changed and should be reloaded.
    ConfigChanged,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_edge_display() {
        assert_eq!(ScreenEdge::Top.to_string(), "top");
        assert_eq!(ScreenEdge::BottomLeft.to_string(), "bottom-left");
    }

    #[test]
    fn parse_edge_accepts_variants() {
        assert_eq!(parse_edge("top"), Some(ScreenEdge::Top));
        assert_eq!(parse_edge("Top-Left"), Some(ScreenEdge::TopLeft));
        assert_eq!(parse_edge("BottomRight"), Some(ScreenEdge::BottomRight));
        assert_eq!(parse_edge("bottom_left"), Some(ScreenEdge::BottomLeft));
        assert_eq!(parse_edge(" 6 "), Some(ScreenEdge::Left));
        assert_eq!(parse_edge("8"), None);
        assert_eq!(parse_edge("middle"), None);
    }

    #[test]
    fn deserialize_edge_from_name_and_id() {
        let edges: Vec<ScreenEdge> =
            serde_json::from_str(r#"["top", 4, "2", "TopRight"]"#).unwrap();
        assert_eq!(
            edges,
            vec![
                ScreenEdge::Top,
                ScreenEdge::Bottom,
                ScreenEdge::Right,
                ScreenEdge::TopRight
            ]
        );
    }

    #[test]
    fn deserialize_edge_rejects_out_of_range() {
        assert!(serde_json::from_str::<ScreenEdge>("9").is_err());
        assert!(serde_json::from_str::<ScreenEdge>("-1").is_err());
    }

    #[test]
    fn deserialize_host_events() {
        let e: HostEvent = serde_json::from_str(r#"{"ShowingDesktopChanged":true}"#).unwrap();
        assert_eq!(e, HostEvent::ShowingDesktopChanged(true));

        let e: HostEvent = serde_json::from_str(
            r#"{"ScreenEdge":{"edge":"bottom","delta":{"width":0,"height":-120},
                "screen":{"x":0,"y":0,"width":1600,"height":900}}}"#,
        )
        .unwrap();
        assert_eq!(
            e,
            HostEvent::ScreenEdge {
                edge: ScreenEdge::Bottom,
                delta: Some(Size::new(0.0, -120.0)),
                screen: Some(Rect::new(0.0, 0.0, 1600.0, 900.0)),
            }
        );

        let e: HostEvent = serde_json::from_str(r#"{"ScreenEdge":{"edge":0}}"#).unwrap();
        assert_eq!(
            e,
            HostEvent::ScreenEdge {
                edge: ScreenEdge::Top,
                delta: None,
                screen: None,
            }
        );

        let e: HostEvent = serde_json::from_str(r#""ConfigChanged""#).unwrap();
        assert_eq!(e, HostEvent::ConfigChanged);
    }

    #[test]
    fn window_snapshot_flags_default_to_false() {
        let w: WindowSnapshot = serde_json::from_str(
            r#"{"id":7,"geometry":{"x":0,"y":0,"width":10,"height":10},"visible":true}"#,
        )
        .unwrap();
        assert_eq!(w, WindowSnapshot::normal(7, Rect::new(0.0, 0.0, 10.0, 10.0)));
    }
}
