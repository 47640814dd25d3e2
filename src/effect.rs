//! The stateful effect that ties the planner, the compositor and the host
//! events together.
//!
//! [`ApertureEffect`] owns a side table of [`PlacementState`]s keyed by
//! window id.  It reacts to [`HostEvent`]s by re-running the corner
//! planner and turning the result into animation requests on the
//! [`Compositor`].

use crate::animation::{AnimationRequest, Direction, PropertyAnimation};
use crate::config::{ApertureConfig, Config, ConfigError};
use crate::easing::Curve;
use crate::event::{AnimationId, HostEvent, ScreenEdge, WindowId, WindowSnapshot};
use crate::geometry::{Rect, Size};
use crate::planner::{plan, Corner};
use crate::traits::Compositor;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

/// Possible errors from the effect.
#[derive(Debug, thiserror::Error)]
pub enum EffectError {
    /// The compositor returned an error.
    #[error("compositor error: {0}")]
    Compositor(String),
}

/// What the effect remembers about one window between passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlacementState {
    /// The corner the window is (or was last) sent to.
    pub corner: Option<Corner>,
    /// The outstanding animation, if any.
    pub animation: Option<AnimationId>,
}

/// Slides windows off to the screen corners while the desktop is shown.
///
/// The effect is generic over any [`Compositor`] implementation and is
/// driven entirely by [`handle`](ApertureEffect::handle).  Events must be
/// delivered one at a time, in host order.
///
/// # Typical usage
///
/// ```ignore
/// let mut effect = ApertureEffect::new(host, config.aperture);
/// effect.init();
/// effect.handle(HostEvent::ShowingDesktopChanged(true))?;
/// ```
pub struct ApertureEffect<C: Compositor> {
    compositor: C,
    config: ApertureConfig,
    config_path: Option<PathBuf>,
    showing_desktop: bool,
    placements: HashMap<WindowId, PlacementState>,
}

impl<C: Compositor> ApertureEffect<C> {
    pub fn new(compositor: C, config: ApertureConfig) -> Self {
        Self {
            compositor,
            config,
            config_path: None,
            showing_desktop: false,
            placements: HashMap::new(),
        }
    }

    /// Reload settings from `path` whenever [`HostEvent::ConfigChanged`]
    /// arrives.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Bind the configured screen edges to realtime gesture reporting.
    ///
    /// Returns the number of edges the compositor accepted.  An edge that
    /// fails to register is logged and skipped.
    pub fn init(&self) -> usize {
        let mut registered = 0;
        for &edge in &self.config.edges {
            match self.compositor.register_realtime_edge(edge) {
                Ok(()) => {
                    debug!("registered realtime edge {}", edge);
                    registered += 1;
                }
                Err(e) => warn!("could not register edge {}: {}", edge, e),
            }
        }
        info!(
            "aperture ready: {} of {} edge(s), duration {:?}",
            registered,
            self.config.edges.len(),
            self.duration()
        );
        registered
    }

    pub fn compositor(&self) -> &C {
        &self.compositor
    }

    pub fn config(&self) -> &ApertureConfig {
        &self.config
    }

    pub fn duration(&self) -> Duration {
        self.config.duration()
    }

    pub fn showing_desktop(&self) -> bool {
        self.showing_desktop
    }

    /// Side-table entry for `window`, if the effect is tracking it.
    pub fn placement(&self, window: WindowId) -> Option<&PlacementState> {
        self.placements.get(&window)
    }

    /// Number of windows the effect is tracking.
    pub fn tracked(&self) -> usize {
        self.placements.len()
    }

    /// Process a single [`HostEvent`].
    pub fn handle(&mut self, event: HostEvent) -> Result<(), EffectError> {
        match event {
            HostEvent::ShowingDesktopChanged(showing) => {
                info!("showing desktop: {}", showing);
                self.set_showing_desktop(showing);
                self.off_to_corners(showing, None)?;
            }

            HostEvent::ScreenEdge {
                edge,
                delta,
                screen,
            } => {
                self.screen_edge(edge, delta, screen)?;
            }

            HostEvent::AnimationEnded { window, animation } => {
                self.animation_ended(window, animation);
            }

            HostEvent::WindowClosed(window) => {
                self.window_closed(window);
            }

            HostEvent::ConfigChanged => {
                if let Err(e) = self.reload_config() {
                    warn!("keeping previous settings: {}", e);
                }
            }
        }
        Ok(())
    }

    /// Drain `events` until every sender is gone.
    ///
    /// Errors are logged and do not stop the loop.
    pub fn run(&mut self, events: mpsc::Receiver<HostEvent>) {
        for event in events {
            if let Err(e) = self.handle(event) {
                warn!("event error: {}", e);
            }
        }
        debug!("all event sources closed");
    }

    pub fn set_showing_desktop(&mut self, showing: bool) {
        self.showing_desktop = showing;
    }

    /// Move windows to their corners (`showing`) or bring them back.
    ///
    /// `progress` in `[0, 1]` pins the animations at that fraction of the
    /// duration, for interactive gestures.  `None` lets them run freely.
    pub fn off_to_corners(&mut self, showing: bool, progress: Option<f64>) -> Result<(), EffectError> {
        let duration = self.duration();
        let frozen = progress.map(|p| frozen_time(duration, p));
        let interactive = frozen.is_some_and(|t| !t.is_zero());

        let stacking = self
            .compositor
            .stacking_order()
            .map_err(|e| EffectError::Compositor(e.to_string()))?;
        let screen = self
            .compositor
            .virtual_screen_geometry()
            .map_err(|e| EffectError::Compositor(e.to_string()))?;

        if showing {
            let assignment = plan(&stacking, &screen, interactive);
            debug!(
                "assigned {} window(s) (interactive: {})",
                assignment.len(),
                interactive
            );
            for (window, corner) in assignment.iter() {
                self.placements.entry(window).or_default().corner = Some(corner);
            }
        }

        for w in &stacking {
            let Some(state) = self.placements.get(&w.id).copied() else {
                continue;
            };

            if let Err(e) = self.compositor.set_elevated(w.id, showing) {
                warn!("{}: could not change elevation: {}", w.id, e);
            }

            if w.dock {
                continue;
            }

            let result = match (state.corner, showing) {
                (Some(corner), true) => self.move_off(w, corner, &screen, state.animation, frozen),
                (Some(corner), false) => self.move_back(w, corner, &screen, state.animation, frozen),
                (None, true) => Ok(()),
                (None, false) => self.discard(w.id),
            };
            if let Err(e) = result {
                warn!("{}: skipped: {}", w.id, e);
            }
        }

        if !showing {
            self.forget_missing(&stacking);
        }
        Ok(())
    }

    /// Realtime gesture callback for `edge`.
    pub fn screen_edge(
        &mut self,
        edge: ScreenEdge,
        delta: Option<Size>,
        screen: Option<Rect>,
    ) -> Result<(), EffectError> {
        let (Some(delta), Some(screen)) = (delta, screen) else {
            debug!("gesture on {} ended", edge);
            return self.off_to_corners(self.showing_desktop, None);
        };
        let Some(progress) = gesture_progress(edge, delta, &screen) else {
            debug!("ignoring gesture on {}", edge);
            return Ok(());
        };
        let progress = if self.showing_desktop {
            1.0 - progress
        } else {
            progress
        };
        debug!("gesture on {}: progress {:.3}", edge, progress);
        self.off_to_corners(true, Some(progress))
    }

    /// The compositor finished (or terminated) `animation` on `window`.
    pub fn animation_ended(&mut self, window: WindowId, animation: AnimationId) {
        let Some(state) = self.placements.get_mut(&window) else {
            return;
        };
        if state.animation != Some(animation) {
            return;
        }
        state.animation = None;
        if !self.showing_desktop {
            debug!("{}: restored", window);
            self.placements.remove(&window);
            if let Err(e) = self.compositor.set_elevated(window, false) {
                warn!("{}: could not change elevation: {}", window, e);
            }
        }
    }

    /// Stop tracking a destroyed window.
    pub fn window_closed(&mut self, window: WindowId) {
        if let Err(e) = self.discard(window) {
            warn!("{}: {}", window, e);
        }
    }

    /// Re-read the config file, if the effect has one.
    pub fn reload_config(&mut self) -> Result<(), ConfigError> {
        let Some(path) = &self.config_path else {
            debug!("config changed, no config file to reload");
            return Ok(());
        };
        let config = Config::load(path)?;
        self.config = config.aperture;
        info!("reloaded config, duration {:?}", self.duration());
        Ok(())
    }

    //  Per-window helpers

    /// Start (or pin) the slide toward `corner`.
    fn move_off(
        &mut self,
        window: &WindowSnapshot,
        corner: Corner,
        screen: &Rect,
        handle: Option<AnimationId>,
        frozen: Option<Duration>,
    ) -> Result<(), C::Error> {
        if let Some(handle) = handle {
            // A restore may still be playing this handle backward.
            if self.compositor.redirect(handle, Direction::Forward)?
                && self.compositor.freeze_in_time(handle, frozen)?
            {
                return Ok(());
            }
            self.compositor.cancel(handle)?;
            self.set_handle(window.id, None);
        }

        let request = AnimationRequest {
            window: window.id,
            duration: self.duration(),
            curve: Curve::InOutCubic,
            keep_at_target: true,
            animations: vec![
                PropertyAnimation::position_to(corner.target(screen), corner.anchor())
                    .frozen_at(frozen),
                PropertyAnimation::opacity_to(0.0).frozen_at(frozen),
            ],
        };
        let handle = self.compositor.animate(&request)?;
        debug!("{}: off to {} ({:?})", window.id, corner, handle);
        self.set_handle(window.id, Some(handle));
        Ok(())
    }

    /// Reverse the slide, or restart it from the corner if it cannot be
    /// reversed.
    fn move_back(
        &mut self,
        window: &WindowSnapshot,
        corner: Corner,
        screen: &Rect,
        handle: Option<AnimationId>,
        frozen: Option<Duration>,
    ) -> Result<(), C::Error> {
        if let Some(handle) = handle {
            if self.compositor.redirect(handle, Direction::Backward)?
                && self.compositor.freeze_in_time(handle, frozen)?
            {
                debug!("{}: reversing from {}", window.id, corner);
                return Ok(());
            }
        }

        self.discard(window.id)?;
        if !window.visible {
            debug!("{}: hidden meanwhile, not restoring", window.id);
            return Ok(());
        }

        let request = AnimationRequest {
            window: window.id,
            duration: self.duration(),
            curve: Curve::InOutCubic,
            keep_at_target: false,
            animations: vec![
                PropertyAnimation::position_from(corner.target(screen), corner.anchor())
                    .as_gesture(),
                PropertyAnimation::opacity_from(0.0),
            ],
        };
        self.compositor.animate(&request)?;
        debug!("{}: back from {}", window.id, corner);
        Ok(())
    }

    /// Cancel any outstanding animation and drop the side-table entry.
    ///
    /// The entry survives a failed cancel so the handle is retried later.
    fn discard(&mut self, window: WindowId) -> Result<(), C::Error> {
        if let Some(handle) = self.placements.get(&window).and_then(|s| s.animation) {
            self.compositor.cancel(handle)?;
        }
        self.placements.remove(&window);
        Ok(())
    }

    /// Drop entries for windows that left the stacking order without a
    /// close notification.
    fn forget_missing(&mut self, stacking: &[WindowSnapshot]) {
        let missing: Vec<WindowId> = self
            .placements
            .keys()
            .filter(|id| !stacking.iter().any(|w| w.id == **id))
            .copied()
            .collect();
        for window in missing {
            debug!("{}: gone from stacking order", window);
            self.window_closed(window);
        }
    }

    fn set_handle(&mut self, window: WindowId, handle: Option<AnimationId>) {
        self.placements.entry(window).or_default().animation = handle;
    }
}

/// The point of a `duration`-long animation that `progress` corresponds to.
fn frozen_time(duration: Duration, progress: f64) -> Duration {
    let progress = if progress.is_finite() {
        progress.clamp(0.0, 1.0)
    } else {
        0.0
    };
    Duration::try_from_secs_f64(duration.as_secs_f64() * progress).unwrap_or(duration)
}

/// Fraction of a show-desktop gesture on `edge` that `delta` covers.
///
/// Half the screen extent along the gesture axis counts as a complete
/// gesture.  Corners carry no progress and return `None`, as does a
/// degenerate screen.
pub(crate) fn gesture_progress(edge: ScreenEdge, delta: Size, screen: &Rect) -> Option<f64> {
    let (travel, extent) = match edge {
        ScreenEdge::Top | ScreenEdge::Bottom => (delta.height, screen.height),
        ScreenEdge::Left | ScreenEdge::Right => (delta.width, screen.width),
        _ => return None,
    };
    let half = extent / 2.0;
    if half <= 0.0 {
        return None;
    }
    Some((travel.abs() / half).min(1.0))
}

//  Tests
