//! Continuous helix animation loop.
//!
//! # Responsibility
//! - Own the renderer scene (particles + geometry) and replace it wholesale
//!   on data change or resize.
//! - Drive one frame per interval on a named thread until cancelled.
//!
//! # Invariants
//! - At most one frame loop runs per `HelixView`.
//! - `unmount`, input identity changes and `Drop` always stop and join the
//!   running loop before returning.
//! - Frames read an immutable scene snapshot; a frame never observes a
//!   half-updated scene.
//! - Zero-sized surfaces skip frames and recover on the next `resize`.
//! - A sink that reports its surface gone ends the loop.

use crate::render::canvas::{Canvas, CommandRecorder, DrawCommand};
use crate::render::geometry::{HelixGeometry, RendererConfig, SurfaceSize};
use crate::render::layout::{expand_particles, layout_frame, FrameLayout, Particle, StrandSide};
use crate::render::paint::paint_frame;
use crate::stats::count::ElementStat;
use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use log::{debug, info, warn};
use parking_lot::RwLock;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const FRAME_THREAD_NAME: &str = "wuxing-helix-frames";

/// Monotonic time source for the animation phase.
pub trait FrameClock: Send + Sync + 'static {
    fn elapsed(&self) -> Duration;
}

/// Wall-clock backed clock starting at construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for MonotonicClock {
    fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock frozen at one instant; used for snapshots and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedClock(pub Duration);

impl FrameClock for FixedClock {
    fn elapsed(&self) -> Duration {
        self.0
    }
}

/// Receiver of finished frames.
pub trait FrameSink: Send + Sync + 'static {
    /// Returns `false` once the surface behind the sink is gone; the frame
    /// loop stops on the first `false`.
    fn present(&self, frame: Vec<DrawCommand>) -> bool;
}

impl FrameSink for Sender<Vec<DrawCommand>> {
    fn present(&self, frame: Vec<DrawCommand>) -> bool {
        self.send(frame).is_ok()
    }
}

/// Why a frame was not drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoInputs,
    EmptySurface,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Drawn,
    Skipped(SkipReason),
}

/// Two particle sets ready for placement.
#[derive(Debug, Clone, PartialEq)]
pub struct HelixInputs {
    pub innate: Vec<Particle>,
    pub current: Vec<Particle>,
}

impl HelixInputs {
    /// One particle per counted occurrence in each stats list.
    pub fn from_stats(innate: &[ElementStat], current: &[ElementStat]) -> Self {
        Self {
            innate: expand_particles(innate, StrandSide::Innate),
            current: expand_particles(current, StrandSide::Current),
        }
    }
}

/// Immutable per-frame view of inputs and geometry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HelixScene {
    pub inputs: Option<Arc<HelixInputs>>,
    pub geometry: Option<HelixGeometry>,
}

impl HelixScene {
    /// Lays out the scene at `elapsed`, or reports why it cannot be drawn.
    pub fn layout_at(
        &self,
        config: &RendererConfig,
        elapsed: Duration,
    ) -> Result<FrameLayout, SkipReason> {
        let inputs = self.inputs.as_ref().ok_or(SkipReason::NoInputs)?;
        let geometry = self.geometry.as_ref().ok_or(SkipReason::EmptySurface)?;
        Ok(layout_frame(
            geometry,
            config.strand_samples,
            &inputs.innate,
            &inputs.current,
            config.phase_at(elapsed),
        ))
    }

    /// Fully redraws one frame onto `canvas`.
    pub fn render(
        &self,
        config: &RendererConfig,
        elapsed: Duration,
        canvas: &mut impl Canvas,
    ) -> FrameOutcome {
        match self.layout_at(config, elapsed) {
            Ok(frame) => {
                paint_frame(&frame, canvas);
                FrameOutcome::Drawn
            }
            Err(reason) => FrameOutcome::Skipped(reason),
        }
    }
}

/// Animation errors.
#[derive(Debug)]
pub enum RenderError {
    Spawn(std::io::Error),
}

impl Display for RenderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spawn(err) => write!(f, "failed to spawn frame loop: {err}"),
        }
    }
}

impl Error for RenderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Spawn(err) => Some(err),
        }
    }
}

/// Running frame loop; stops and joins on `cancel` or drop.
pub struct AnimationHandle {
    stop: Option<Sender<()>>,
    worker: Option<JoinHandle<u64>>,
}

impl AnimationHandle {
    fn start(
        config: RendererConfig,
        clock: Arc<dyn FrameClock>,
        scene: Arc<RwLock<Arc<HelixScene>>>,
        sink: Arc<dyn FrameSink>,
    ) -> Result<Self, RenderError> {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let interval = config.frame_interval();
        let worker = thread::Builder::new()
            .name(FRAME_THREAD_NAME.to_string())
            .spawn(move || {
                let mut frames = 0u64;
                let mut last_skip = None;
                loop {
                    let snapshot: Arc<HelixScene> = scene.read().clone();
                    let mut recorder = CommandRecorder::new();
                    match snapshot.render(&config, clock.elapsed(), &mut recorder) {
                        FrameOutcome::Drawn => {
                            if !sink.present(recorder.into_commands()) {
                                info!(
                                    "event=frame_loop_stop module=render status=ok reason=sink_detached frames={frames}"
                                );
                                break;
                            }
                            frames += 1;
                            last_skip = None;
                        }
                        FrameOutcome::Skipped(reason) => {
                            if last_skip != Some(reason) {
                                debug!(
                                    "event=frame_skipped module=render status=skip reason={reason:?}"
                                );
                                last_skip = Some(reason);
                            }
                        }
                    }
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                frames
            })
            .map_err(RenderError::Spawn)?;

        Ok(Self {
            stop: Some(stop_tx),
            worker: Some(worker),
        })
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.is_finished())
    }

    /// Stops the loop and returns the number of frames it presented.
    pub fn cancel(mut self) -> u64 {
        self.shutdown()
    }

    fn shutdown(&mut self) -> u64 {
        if let Some(stop) = self.stop.take() {
            let _ = stop.try_send(());
        }
        match self.worker.take().map(JoinHandle::join) {
            Some(Ok(frames)) => frames,
            Some(Err(_)) => {
                warn!("event=frame_loop_stop module=render status=error reason=panicked");
                0
            }
            None => 0,
        }
    }
}

impl Drop for AnimationHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Drawing-surface owner: scene, resize listener and frame loop lifecycle.
pub struct HelixView {
    config: RendererConfig,
    clock: Arc<dyn FrameClock>,
    scene: Arc<RwLock<Arc<HelixScene>>>,
    sink: Option<Arc<dyn FrameSink>>,
    handle: Option<AnimationHandle>,
}

impl HelixView {
    pub fn new(config: RendererConfig, clock: Arc<dyn FrameClock>) -> Self {
        Self {
            config,
            clock,
            scene: Arc::new(RwLock::new(Arc::new(HelixScene::default()))),
            sink: None,
            handle: None,
        }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Current scene snapshot.
    pub fn scene(&self) -> Arc<HelixScene> {
        self.scene.read().clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.sink.is_some()
    }

    pub fn is_animating(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(AnimationHandle::is_running)
    }

    /// Attaches the view to a surface and starts the frame loop.
    ///
    /// Any loop from a previous mount is stopped first.
    pub fn mount(
        &mut self,
        surface: SurfaceSize,
        sink: Arc<dyn FrameSink>,
    ) -> Result<(), RenderError> {
        self.stop_loop();
        self.sink = Some(sink);
        self.replace_scene(|scene| scene.geometry = HelixGeometry::from_surface(surface));
        info!(
            "event=helix_mount module=render status=ok width={} height={}",
            surface.width, surface.height
        );
        self.start_loop()
    }

    /// Replaces both particle sets; restarts the loop when they changed.
    pub fn set_inputs(&mut self, inputs: Option<HelixInputs>) -> Result<(), RenderError> {
        let unchanged = match (&self.scene().inputs, &inputs) {
            (Some(current), Some(next)) => current.as_ref() == next,
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return Ok(());
        }

        self.stop_loop();
        debug!(
            "event=helix_inputs module=render status=ok innate={} current={}",
            inputs.as_ref().map_or(0, |inputs| inputs.innate.len()),
            inputs.as_ref().map_or(0, |inputs| inputs.current.len())
        );
        self.replace_scene(|scene| scene.inputs = inputs.map(Arc::new));
        if self.is_mounted() {
            self.start_loop()?;
        }
        Ok(())
    }

    /// Resize listener; ignored once the view is unmounted.
    ///
    /// Returns whether the resize was applied.
    pub fn resize(&mut self, surface: SurfaceSize) -> bool {
        if !self.is_mounted() {
            return false;
        }
        self.replace_scene(|scene| scene.geometry = HelixGeometry::from_surface(surface));
        debug!(
            "event=helix_resize module=render status=ok width={} height={} drawable={}",
            surface.width,
            surface.height,
            surface.is_drawable()
        );
        true
    }

    /// Renders one frame synchronously with the view's clock.
    pub fn render_now(&self, canvas: &mut impl Canvas) -> FrameOutcome {
        self.scene()
            .render(&self.config, self.clock.elapsed(), canvas)
    }

    /// Stops the frame loop and detaches the resize listener.
    pub fn unmount(&mut self) {
        let frames = self.stop_loop();
        if self.sink.take().is_some() {
            info!("event=helix_unmount module=render status=ok frames={frames}");
        }
    }

    fn start_loop(&mut self) -> Result<(), RenderError> {
        let Some(sink) = self.sink.clone() else {
            return Ok(());
        };
        let handle = AnimationHandle::start(
            self.config.clone(),
            Arc::clone(&self.clock),
            Arc::clone(&self.scene),
            sink,
        )?;
        self.handle = Some(handle);
        Ok(())
    }

    fn stop_loop(&mut self) -> u64 {
        self.handle.take().map_or(0, AnimationHandle::cancel)
    }

    fn replace_scene(&self, update: impl FnOnce(&mut HelixScene)) {
        let mut guard = self.scene.write();
        let mut next = (**guard).clone();
        update(&mut next);
        *guard = Arc::new(next);
    }
}

impl Drop for HelixView {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::{FixedClock, FrameOutcome, HelixInputs, HelixView, SkipReason};
    use crate::model::symbol::ElementCategory;
    use crate::render::canvas::{CommandRecorder, DrawCommand};
    use crate::render::geometry::{RendererConfig, SurfaceSize};
    use crate::stats::count::ElementCount;
    use crossbeam_channel::unbounded;
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    fn inputs() -> HelixInputs {
        HelixInputs::from_stats(
            &ElementCount::from_pairs([(ElementCategory::Wood, 5), (ElementCategory::Fire, 3)])
                .stats(),
            &ElementCount::from_pairs([(ElementCategory::Water, 8)]).stats(),
        )
    }

    fn view() -> HelixView {
        let config = RendererConfig {
            frame_interval_ms: 2,
            ..RendererConfig::default()
        };
        HelixView::new(config, Arc::new(FixedClock(Duration::from_millis(1_500))))
    }

    #[test]
    fn render_skips_without_inputs_or_surface() {
        let mut view = view();
        let mut recorder = CommandRecorder::new();
        assert_eq!(
            view.render_now(&mut recorder),
            FrameOutcome::Skipped(SkipReason::NoInputs)
        );

        view.set_inputs(Some(inputs())).expect("set inputs");
        assert_eq!(
            view.render_now(&mut recorder),
            FrameOutcome::Skipped(SkipReason::EmptySurface)
        );
        assert!(recorder.commands().is_empty());
    }

    #[test]
    fn zero_surface_recovers_on_resize() {
        let mut view = view();
        let (tx, rx) = unbounded::<Vec<DrawCommand>>();
        view.set_inputs(Some(inputs())).expect("set inputs");
        view.mount(SurfaceSize::new(0.0, 400.0), Arc::new(tx))
            .expect("mount");
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());

        assert!(view.resize(SurfaceSize::new(640.0, 400.0)));
        let frame = rx
            .recv_timeout(Duration::from_secs(2))
            .expect("frame after resize");
        assert!(matches!(frame[0], DrawCommand::Background { .. }));
        view.unmount();
    }

    #[test]
    fn unmount_stops_loop_and_detaches_resize() {
        let mut view = view();
        let (tx, rx) = unbounded::<Vec<DrawCommand>>();
        view.set_inputs(Some(inputs())).expect("set inputs");
        view.mount(SurfaceSize::new(640.0, 400.0), Arc::new(tx))
            .expect("mount");
        rx.recv_timeout(Duration::from_secs(2)).expect("first frame");
        assert!(view.is_animating());

        view.unmount();
        assert!(!view.is_animating());
        assert!(!view.resize(SurfaceSize::new(320.0, 400.0)));
        while rx.try_recv().is_ok() {}
        assert!(rx.recv_timeout(Duration::from_millis(30)).is_err());
    }

    #[test]
    fn identical_inputs_keep_running_loop() {
        let mut view = view();
        let (tx, _rx) = unbounded::<Vec<DrawCommand>>();
        view.set_inputs(Some(inputs())).expect("set inputs");
        view.mount(SurfaceSize::new(640.0, 400.0), Arc::new(tx))
            .expect("mount");
        let before = view.scene();
        view.set_inputs(Some(inputs())).expect("same inputs");
        assert!(Arc::ptr_eq(&before, &view.scene()));

        view.set_inputs(None).expect("clear inputs");
        assert!(view.scene().inputs.is_none());
        assert!(view.is_animating());
    }

    #[test]
    fn dropped_receiver_stops_frame_loop() {
        let mut view = view();
        view.set_inputs(Some(inputs())).expect("set inputs");
        let (tx, rx) = unbounded::<Vec<DrawCommand>>();
        view.mount(SurfaceSize::new(640.0, 400.0), Arc::new(tx))
            .expect("mount");
        rx.recv_timeout(Duration::from_secs(2)).expect("first frame");
        drop(rx);

        let deadline = Instant::now() + Duration::from_secs(2);
        while view.is_animating() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(!view.is_animating());
        assert!(view.is_mounted());
        view.unmount();
    }

    #[test]
    fn fixed_clock_frames_are_identical() {
        let mut view = view();
        view.set_inputs(Some(inputs())).expect("set inputs");
        let (tx, rx) = unbounded::<Vec<DrawCommand>>();
        view.mount(SurfaceSize::new(640.0, 400.0), Arc::new(tx))
            .expect("mount");
        let first = rx.recv_timeout(Duration::from_secs(2)).expect("frame 1");
        let second = rx.recv_timeout(Duration::from_secs(2)).expect("frame 2");
        assert_eq!(first, second);
    }
}
