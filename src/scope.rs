//! The render loop: ties the dataset, viewport, visibility machine and frame
//! scheduler together and issues one pair of polylines per frame.

use crate::config::ScopeConfig;
use crate::dataset::{Channel, WaveformDataset};
use crate::geometry::{self, ViewportGeometry};
use crate::surface::DrawingSurface;
use crate::visibility::{Transition, VisibilityScheduler};
use crate::windowing::{self, SampleWindow, ValueScale};

/// Opaque id of a scheduled animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHandle(pub i32);

/// Per-frame callback scheduling, e.g. `requestAnimationFrame`.
pub trait FrameScheduler {
    /// Schedules the next frame. `None` means the platform refused and the
    /// loop stays idle until the next visibility change.
    fn request_frame(&mut self) -> Option<FrameHandle>;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Snapshot of the loop's run state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackState {
    pub is_visible: bool,
    /// Clock time (ms) the current visible run started; `None` until its
    /// first frame.
    pub origin_timestamp: Option<f64>,
    pub animation_handle: Option<FrameHandle>,
}

/// Result of one [`Oscilloscope::frame`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// No dataset or not visible; the loop has stopped.
    Idle,
    /// The frame ran. `traces` counts channels actually stroked.
    Drawn { elapsed_seconds: f64, traces: usize },
}

pub struct Oscilloscope<S, F> {
    config: ScopeConfig,
    dataset: Option<WaveformDataset>,
    geometry: ViewportGeometry,
    visibility: VisibilityScheduler,
    origin_timestamp: Option<f64>,
    animation_handle: Option<FrameHandle>,
    surface: S,
    scheduler: F,
}

impl<S: DrawingSurface, F: FrameScheduler> Oscilloscope<S, F> {
    pub fn new(config: ScopeConfig, surface: S, scheduler: F) -> Self {
        let visibility = VisibilityScheduler::new(config.visibility_threshold);
        Self {
            config,
            dataset: None,
            geometry: ViewportGeometry::default(),
            visibility,
            origin_timestamp: None,
            animation_handle: None,
            surface,
            scheduler,
        }
    }

    pub fn config(&self) -> &ScopeConfig {
        &self.config
    }

    pub fn playback(&self) -> PlaybackState {
        PlaybackState {
            is_visible: self.visibility.is_visible(),
            origin_timestamp: self.origin_timestamp,
            animation_handle: self.animation_handle,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    /// Publishes the loaded recording. If the scope is already on screen
    /// and idle, playback starts right away.
    pub fn set_dataset(&mut self, dataset: WaveformDataset) {
        log::info!(
            "waveform loaded: {} sample pairs, {} ms per pair",
            dataset.total_len(),
            dataset.ms_per_sample_pair
        );
        self.dataset = Some(dataset);
        if self.visibility.is_visible() && self.animation_handle.is_none() {
            self.origin_timestamp = None;
            self.schedule();
        }
    }

    /// Re-sizes the surface for a new container box or pixel density.
    pub fn resize(&mut self, geometry: ViewportGeometry) {
        if geometry != self.geometry {
            log::debug!(
                "viewport {}x{} css px at dpr {}",
                geometry.width_css,
                geometry.height_css,
                geometry.device_pixel_ratio
            );
        }
        self.geometry = geometry;
        geometry::apply(&mut self.surface, &geometry);
    }

    /// Feeds one intersection report into the visibility machine.
    pub fn observe_visibility(&mut self, intersection_ratio: f64, is_intersecting: bool) -> Transition {
        let transition = self.visibility.observe(intersection_ratio, is_intersecting);
        match transition {
            Transition::Entered => {
                log::debug!("scope visible (ratio {intersection_ratio:.3})");
                self.origin_timestamp = None;
                self.cancel_pending();
                if self.dataset.is_some() {
                    self.schedule();
                }
            }
            Transition::Exited => {
                log::debug!("scope hidden (ratio {intersection_ratio:.3})");
                self.cancel_pending();
            }
            Transition::Unchanged => {}
        }
        transition
    }

    /// Runs one animation frame at clock time `timestamp_ms` and schedules
    /// the next one while visible.
    pub fn frame(&mut self, timestamp_ms: f64) -> FrameOutcome {
        // The handle that triggered this call has fired.
        self.animation_handle = None;

        if !self.visibility.is_visible() {
            return FrameOutcome::Idle;
        }
        let Some(dataset) = self.dataset.as_ref() else {
            return FrameOutcome::Idle;
        };

        let origin = *self.origin_timestamp.get_or_insert(timestamp_ms);
        let elapsed_seconds = ((timestamp_ms - origin) / 1000.0).max(0.0);

        let traces = draw(
            &mut self.surface,
            &self.config,
            dataset,
            &self.geometry,
            elapsed_seconds,
        );
        log::trace!("frame at {elapsed_seconds:.3}s, {traces} traces");

        self.schedule();
        FrameOutcome::Drawn { elapsed_seconds, traces }
    }

    fn schedule(&mut self) {
        self.animation_handle = self.scheduler.request_frame();
        if self.animation_handle.is_none() {
            log::warn!("frame request refused; scope paused");
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.animation_handle.take() {
            self.scheduler.cancel_frame(handle);
        }
    }
}

/// Clears `surface` and strokes both channels for `elapsed_seconds`.
/// Returns how many traces were stroked.
fn draw<S: DrawingSurface>(
    surface: &mut S,
    config: &ScopeConfig,
    dataset: &WaveformDataset,
    geometry: &ViewportGeometry,
    elapsed_seconds: f64,
) -> usize {
    let (width, height) = (geometry.width_css, geometry.height_css);
    surface.clear(width, height);
    if geometry.is_degenerate() {
        return 0;
    }

    let window = SampleWindow::at(
        elapsed_seconds,
        dataset,
        config.playback_speed,
        config.window_seconds,
    );

    let mut traces = 0;
    for channel in Channel::ALL {
        let trace = config.trace(channel);
        let (y_top, y_bottom) = trace.band.resolve(height);
        let scale = ValueScale::new(dataset.value_min, dataset.value_max, y_top, y_bottom);
        let mut points = windowing::trace_points(dataset.samples(channel), &window, width, scale);
        let Some(first) = points.next() else {
            continue;
        };

        surface.set_stroke(&trace.style);
        surface.begin_path();
        surface.move_to(first.x, first.y);
        for p in points {
            surface.line_to(p.x, p.y);
        }
        surface.stroke();
        traces += 1;
    }
    traces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    /// Hands out increasing handles and remembers what was cancelled.
    #[derive(Default)]
    struct FakeFrames {
        next: i32,
        requested: Vec<FrameHandle>,
        cancelled: Vec<FrameHandle>,
        refuse: bool,
    }

    impl FrameScheduler for FakeFrames {
        fn request_frame(&mut self) -> Option<FrameHandle> {
            if self.refuse {
                return None;
            }
            self.next += 1;
            let h = FrameHandle(self.next);
            self.requested.push(h);
            Some(h)
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            self.cancelled.push(handle);
        }
    }

    fn dataset(len: usize) -> WaveformDataset {
        WaveformDataset {
            channel_a: (0..len).map(|i| i as f64).collect(),
            channel_b: (0..len).map(|i| (len - i) as f64).collect(),
            value_min: 0.0,
            value_max: len as f64,
            ms_per_sample_pair: 2.0,
        }
    }

    fn scope() -> Oscilloscope<RecordingSurface, FakeFrames> {
        let mut s = Oscilloscope::new(
            ScopeConfig::default(),
            RecordingSurface::new(),
            FakeFrames::default(),
        );
        s.resize(ViewportGeometry::new(800.0, 200.0, 1.0));
        s.surface_mut().take_commands();
        s
    }

    #[test]
    fn starts_hidden_and_idle() {
        let mut s = scope();
        assert_eq!(s.playback(), PlaybackState::default());
        s.set_dataset(dataset(100));
        assert_eq!(s.frame(16.0), FrameOutcome::Idle);
        assert!(s.scheduler().requested.is_empty());
    }

    #[test]
    fn entering_without_data_schedules_nothing() {
        let mut s = scope();
        assert_eq!(s.observe_visibility(1.0, true), Transition::Entered);
        assert!(s.scheduler().requested.is_empty());
        assert_eq!(s.frame(10.0), FrameOutcome::Idle);
    }

    #[test]
    fn data_arriving_while_visible_starts_loop() {
        let mut s = scope();
        s.observe_visibility(1.0, true);
        s.set_dataset(dataset(100));
        assert_eq!(s.scheduler().requested.len(), 1);
        assert!(s.playback().animation_handle.is_some());
    }

    #[test]
    fn first_frame_captures_origin() {
        let mut s = scope();
        s.set_dataset(dataset(100));
        s.observe_visibility(0.5, true);
        assert_eq!(
            s.frame(1000.0),
            FrameOutcome::Drawn { elapsed_seconds: 0.0, traces: 2 }
        );
        assert_eq!(s.playback().origin_timestamp, Some(1000.0));
        assert_eq!(
            s.frame(3500.0),
            FrameOutcome::Drawn { elapsed_seconds: 2.5, traces: 2 }
        );
        assert_eq!(s.scheduler().requested.len(), 3);
    }

    #[test]
    fn exit_cancels_pending_frame() {
        let mut s = scope();
        s.set_dataset(dataset(100));
        s.observe_visibility(1.0, true);
        s.frame(0.0);
        let pending = s.playback().animation_handle;
        assert!(pending.is_some());
        assert_eq!(s.observe_visibility(0.0, false), Transition::Exited);
        assert_eq!(s.scheduler().cancelled, vec![pending.unwrap()]);
        assert_eq!(s.playback().animation_handle, None);
        assert_eq!(s.frame(16.0), FrameOutcome::Idle);
    }

    #[test]
    fn reentering_resets_elapsed_time() {
        let mut s = scope();
        s.set_dataset(dataset(100));
        s.observe_visibility(1.0, true);
        s.frame(0.0);
        s.frame(4000.0);
        s.observe_visibility(0.0, false);
        s.observe_visibility(1.0, true);
        match s.frame(9000.0) {
            FrameOutcome::Drawn { elapsed_seconds, .. } => assert_eq!(elapsed_seconds, 0.0),
            other => panic!("expected a drawn frame, got {other:?}"),
        }
        match s.frame(9100.0) {
            FrameOutcome::Drawn { elapsed_seconds, .. } => {
                assert!((elapsed_seconds - 0.1).abs() < 1e-9)
            }
            other => panic!("expected a drawn frame, got {other:?}"),
        }
    }

    #[test]
    fn frame_clears_then_strokes_both_channels() {
        let mut s = scope();
        s.set_dataset(dataset(10));
        s.observe_visibility(1.0, true);
        s.frame(0.0);
        let cmds = s.surface_mut().take_commands();
        assert_eq!(cmds[0], DrawCommand::Clear { width: 800.0, height: 200.0 });
        assert!(matches!(cmds[1], DrawCommand::SetStroke(ref st) if st.color == "#CC6677"));
        assert_eq!(cmds[2], DrawCommand::BeginPath);
        assert!(matches!(cmds[3], DrawCommand::MoveTo(x, _) if x == 0.0));
        assert_eq!(cmds.iter().filter(|c| matches!(c, DrawCommand::Stroke)).count(), 2);
        // 20 s window at 1 point/ms: 20000 points per channel
        let line_tos = cmds.iter().filter(|c| matches!(c, DrawCommand::LineTo(..))).count();
        assert_eq!(line_tos, 2 * 19_999);
    }

    #[test]
    fn degenerate_viewport_clears_but_keeps_running() {
        let mut s = scope();
        s.resize(ViewportGeometry::new(0.0, 0.0, 2.0));
        s.surface_mut().take_commands();
        s.set_dataset(dataset(10));
        s.observe_visibility(1.0, true);
        assert_eq!(
            s.frame(0.0),
            FrameOutcome::Drawn { elapsed_seconds: 0.0, traces: 0 }
        );
        assert_eq!(s.surface().strokes(), 0);
        assert!(s.playback().animation_handle.is_some());
    }

    #[test]
    fn empty_dataset_draws_nothing() {
        let mut s = scope();
        s.set_dataset(WaveformDataset {
            channel_a: vec![],
            channel_b: vec![],
            value_min: 0.0,
            value_max: 1.0,
            ms_per_sample_pair: 1.0,
        });
        s.observe_visibility(1.0, true);
        assert_eq!(
            s.frame(5.0),
            FrameOutcome::Drawn { elapsed_seconds: 0.0, traces: 0 }
        );
    }

    #[test]
    fn playback_visibility_follows_intersection() {
        let mut s = scope();
        assert!(!s.playback().is_visible);
        s.observe_visibility(0.2, true);
        assert!(s.playback().is_visible);
        s.observe_visibility(0.01, true);
        assert!(!s.playback().is_visible);
    }

    #[test]
    fn tiny_pair_interval_draws_a_capped_window() {
        let ds = WaveformDataset::from_json(
            r#"{"v1":[0,1,2],"v2":[2,1,0],"y_min":0,"y_max":2,"ms_per_pair":1e-15}"#,
        )
        .unwrap();
        let mut s = scope();
        s.set_dataset(ds);
        s.observe_visibility(1.0, true);
        assert_eq!(
            s.frame(0.0),
            FrameOutcome::Drawn { elapsed_seconds: 0.0, traces: 2 }
        );
        let cmds = s.surface_mut().take_commands();
        let line_tos = cmds.iter().filter(|c| matches!(c, DrawCommand::LineTo(..))).count();
        assert_eq!(line_tos, 2 * (windowing::MAX_WINDOW_POINTS - 1));
        assert!(s.playback().animation_handle.is_some());
    }

    #[test]
    fn refused_frame_request_leaves_loop_idle() {
        let mut s = scope();
        s.set_dataset(dataset(10));
        s.scheduler.refuse = true;
        s.observe_visibility(1.0, true);
        assert_eq!(s.playback().animation_handle, None);
        assert!(s.playback().is_visible);
    }
}
