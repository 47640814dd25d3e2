//! Core traits that decouple aperture from any specific compositor or
//! event transport.
//!
//! The [`ApertureEffect`](crate::effect::ApertureEffect) only depends on
//! these abstractions.  A real backend wraps a compositor's scripting or
//! plugin API; the tests use recording doubles.

use crate::animation::{AnimationRequest, Direction};
use crate::event::{AnimationId, HostEvent, ScreenEdge, WindowId, WindowSnapshot};
use crate::geometry::Rect;
use std::sync::mpsc;
use std::time::Duration;

/// The capabilities the effect borrows from its host compositor.
///
/// Window stacking, geometry and the animation engine all live in the
/// host.  Methods take `&self`: a host handle is expected to be a thin
/// proxy, and the effect calls it only from the event-delivery thread.
pub trait Compositor {
    /// The error type produced by this compositor.
    type Error: std::error::Error + Send + 'static;

    /// All windows in stacking order, back to front.
    fn stacking_order(&self) -> Result<Vec<WindowSnapshot>, Self::Error>;

    /// The geometry spanning every output.
    fn virtual_screen_geometry(&self) -> Result<Rect, Self::Error>;

    /// Start an animation and return its handle.
    fn animate(&self, request: &AnimationRequest) -> Result<AnimationId, Self::Error>;

    /// Stop an animation and drop its effect on the window.
    ///
    /// Returns `false` if the handle is unknown (e.g. it already ended).
    fn cancel(&self, animation: AnimationId) -> Result<bool, Self::Error>;

    /// Change the playback direction of a running animation.  A reversed
    /// animation terminates once it reaches its source.
    ///
    /// Returns `false` if the animation cannot be redirected.
    fn redirect(&self, animation: AnimationId, direction: Direction) -> Result<bool, Self::Error>;

    /// Pin a running animation at `elapsed`, or let it run freely again
    /// when `elapsed` is `None`.
    ///
    /// Returns `false` if the handle is unknown.
    fn freeze_in_time(
        &self,
        animation: AnimationId,
        elapsed: Option<Duration>,
    ) -> Result<bool, Self::Error>;

    /// Keep `window` painted above the desktop window (or stop doing so).
    fn set_elevated(&self, window: WindowId, elevated: bool) -> Result<(), Self::Error>;

    /// Ask the host to report realtime gesture progress on `edge` through
    /// [`HostEvent::ScreenEdge`].
    fn register_realtime_edge(&self, edge: ScreenEdge) -> Result<(), Self::Error>;
}

/// A source of [`HostEvent`]s.
///
/// Implementations listen on whatever the host offers (a plugin callback
/// bridge, a recorded trace, an in-memory channel, …) and forward events
/// into the provided [`mpsc::Sender`].
///
/// # Contract
///
/// * [`run`](EventSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Events must be sent in the order the host delivered them; the effect
///   relies on serial delivery.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait EventSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every [`HostEvent`] into `sink`.
    fn run(&mut self, sink: mpsc::Sender<HostEvent>) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;

    #[derive(Debug, thiserror::Error)]
    #[error("mock error")]
    struct MockError;

    /// A test double that emits a fixed sequence of events.
    struct MockSource {
        events: Vec<HostEvent>,
    }

    impl EventSource for MockSource {
        type Error = MockError;

        fn run(&mut self, sink: mpsc::Sender<HostEvent>) -> Result<(), MockError> {
            for event in self.events.drain(..) {
                let _ = sink.send(event);
            }
            Ok(())
        }
    }

    #[test]
    fn mock_source_preserves_order() {
        let mut src = MockSource {
            events: vec![
                HostEvent::ScreenEdge {
                    edge: ScreenEdge::Top,
                    delta: Some(Size::new(0.0, 40.0)),
                    screen: Some(Rect::new(0.0, 0.0, 1600.0, 900.0)),
                },
                HostEvent::ShowingDesktopChanged(true),
            ],
        };
        let (tx, rx) = mpsc::channel();
        src.run(tx).unwrap();
        let events: Vec<HostEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], HostEvent::ScreenEdge { .. }));
        assert_eq!(events[1], HostEvent::ShowingDesktopChanged(true));
    }

    #[test]
    fn source_runs_on_its_own_thread() {
        let (tx, rx) = mpsc::channel();
        let handle = std::thread::spawn(move || {
            let mut src = MockSource {
                events: vec![HostEvent::ConfigChanged, HostEvent::WindowClosed(WindowId(3))],
            };
            src.run(tx)
        });
        handle.join().unwrap().unwrap();
        let events: Vec<HostEvent> = rx.iter().collect();
        assert_eq!(
            events,
            vec![HostEvent::ConfigChanged, HostEvent::WindowClosed(WindowId(3))]
        );
    }
}
