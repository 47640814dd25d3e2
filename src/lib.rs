//! **aperture**: a show-desktop effect that slides windows off to the
//! screen corners.
//!
//! When the desktop is shown, every normal window is assigned one of the
//! four screen corners and animated toward it while fading out.  When the
//! desktop is hidden again the windows come back.  An edge gesture bound to
//! show-desktop drives the same motion interactively.
//!
//! # Architecture
//!
//! The crate is organised around two core traits:
//!
//! * [`traits::Compositor`] abstracts the host: stacking order, geometry,
//!   the animation engine and screen-edge registration.  The effect never
//!   touches a concrete compositor.
//! * [`traits::EventSource`] abstracts the transport that delivers host
//!   callbacks, so the effect is not coupled to any plugin mechanism.
//!
//! [`planner`] holds the pure corner assignment; [`effect`] wraps it with
//! the per-window state and animation bookkeeping.  [`replay`] provides an
//! event source for recorded host traces.

pub mod animation;
pub mod config;
pub mod easing;
pub mod effect;
pub mod event;
pub mod geometry;
pub mod planner;
pub mod replay;
pub mod traits;
