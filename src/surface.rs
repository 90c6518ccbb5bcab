// One scratch card session: input in, coverage callbacks and frames out.
//
// Everything runs on the host thread. The host feeds pointer events, calls
// `pump` once per frame (reveal ticks, image notifications)
// and `compose` to get the picture.

use crate::blend::{GammaLut, compose_over};
use crate::clock::{AnimationClock, FrameClock, Tick};
use crate::compositor::OverlayCompositor;
use crate::config::ScratchConfig;
use crate::coverage::CoverageEstimator;
use crate::error::{Error, Result};
use crate::giftcard::GiftCardPainter;
use crate::image_source::{ImageEvent, ImageSubscription};
use crate::overlay::{ImagePainter, OverlayPainter};
use crate::reveal::{RevealController, ScratchState};
use crate::stroke::{Stroke, StrokeRecorder};
use crate::types::{FrameBuffer, Layer, Point, Size};
use image::RgbaImage;
use std::time::Duration;

pub struct ScratchSurface<C: AnimationClock = FrameClock> {
    size: Size,
    brush_size: f32,
    enabled: bool,
    recorder: StrokeRecorder,
    coverage: CoverageEstimator,
    compositor: OverlayCompositor,
    reveal: RevealController<C>,
    /// Procedural art used whenever no image has resolved.
    fallback: Box<dyn OverlayPainter>,
    image: Option<ImagePainter>,
    image_sub: Option<ImageSubscription>,
    overlay_dirty: bool,
    lut: GammaLut,
    disposed: bool,
}

impl ScratchSurface<FrameClock> {
    /// A surface whose reveal runs on wall-clock time.
    pub fn new(config: &ScratchConfig) -> Self {
        Self::with_clock(config, FrameClock::new())
    }
}

impl<C: AnimationClock> ScratchSurface<C> {
    pub fn with_clock(config: &ScratchConfig, clock: C) -> Self {
        let config = config.clone().normalized();
        Self {
            size: Size::default(),
            brush_size: config.brush_size,
            enabled: config.enabled,
            recorder: StrokeRecorder::new(),
            coverage: CoverageEstimator::new(config.grid_size, config.threshold),
            compositor: OverlayCompositor::new(),
            reveal: RevealController::new(clock),
            fallback: Box::new(GiftCardPainter::from_config(&config)),
            image: None,
            image_sub: None,
            overlay_dirty: true,
            lut: GammaLut::new(),
            disposed: false,
        }
    }

    /* ---------- configuration ---------- */

    /// Replace the procedural overlay used while no image is present.
    pub fn set_painter(&mut self, painter: impl OverlayPainter + 'static) {
        self.fallback = Box::new(painter);
        if self.image.is_none() {
            self.compositor.invalidate_content();
            self.overlay_dirty = true;
        }
    }

    /// Called with the scratched percentage after every recomputation.
    pub fn on_change(&mut self, cb: impl FnMut(f32) + 'static) {
        self.coverage.set_on_change(cb);
    }

    /// Called once per session when coverage first reaches the threshold.
    pub fn on_threshold(&mut self, cb: impl FnMut() + 'static) {
        self.coverage.set_on_threshold(cb);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.recorder.end_stroke();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Takes effect for rendering at once and for coverage on the next update.
    pub fn set_brush_size(&mut self, brush_size: f32) {
        self.brush_size = brush_size.max(0.0);
        self.overlay_dirty = true;
    }

    pub fn brush_size(&self) -> f32 {
        self.brush_size
    }

    pub fn set_threshold(&mut self, threshold: f32) {
        self.coverage.set_threshold(threshold);
    }

    /// Layout changed. Coverage is re-mapped onto the new cell size (never
    /// losing cleared cells) and the overlay is repainted at the new size.
    pub fn resize(&mut self, width: usize, height: usize) {
        let size = Size::new(width, height);
        if size == self.size {
            return;
        }
        tracing::debug!(width, height, "surface resized");
        self.size = size;
        self.overlay_dirty = true;
        if !self.recorder.is_empty() && !self.disposed {
            self.update_coverage();
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /* ---------- pointer input ---------- */

    /// Input before the first layout is dropped: there is nothing to clamp
    /// positions against yet.
    fn accepts_input(&self) -> bool {
        self.enabled && !self.disposed && self.size.is_known() && self.reveal.state().accepts_input()
    }

    /// Pointer down: a new stroke begins.
    pub fn pointer_down(&mut self, p: Point) {
        if !self.accepts_input() {
            return;
        }
        self.recorder.start_stroke(p, self.size);
        self.reveal.note_scratch();
        self.overlay_dirty = true;
        tracing::debug!(x = p.x, y = p.y, strokes = self.recorder.strokes().len(), "stroke started");
    }

    /// Pointer move: extend the stroke and re-estimate coverage.
    pub fn pointer_move(&mut self, p: Point) {
        if !self.accepts_input() {
            return;
        }
        if self.recorder.append_point(p, self.size) {
            self.overlay_dirty = true;
            self.update_coverage();
        }
    }

    /// Pointer up: close the stroke. Coverage is re-estimated so a tap that
    /// never moved still counts.
    pub fn pointer_up(&mut self) {
        if !self.recorder.is_active() {
            return;
        }
        self.recorder.end_stroke();
        if self.accepts_input() {
            self.update_coverage();
        }
    }

    fn update_coverage(&mut self) -> f32 {
        self.coverage.update(self.recorder.strokes(), self.brush_size, self.size)
    }

    /* ---------- reveal / reset / dispose ---------- */

    /// Fade the whole overlay out over `duration`. Scratch input stops now.
    pub fn reveal(&mut self, duration: Duration) {
        if self.disposed {
            return;
        }
        self.recorder.end_stroke();
        self.reveal.reveal(duration);
    }

    /// Start over: strokes, coverage, latch and reveal all go back to fresh.
    /// The overlay content (image or painter) and callbacks are kept.
    pub fn reset(&mut self) {
        self.reveal.reset();
        self.recorder.clear();
        self.coverage.reset();
        self.overlay_dirty = true;
        tracing::debug!("surface reset");
    }

    /// Detach from the clock and the image provider. Nothing fires after this.
    /// Also runs on drop; calling it twice is fine.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.reveal.cancel();
        self.image_sub = None;
        self.coverage.clear_callbacks();
        self.disposed = true;
        tracing::debug!("surface disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Apply a tick delivered by an external scheduler.
    pub fn handle_tick(&mut self, tick: Tick) -> bool {
        !self.disposed && self.reveal.handle_tick(tick)
    }

    /// Drain clock ticks and image notifications. Returns true if the next
    /// frame will look different.
    pub fn pump(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        let mut changed = self.reveal.pump();

        if let Some(sub) = self.image_sub.as_mut() {
            while let Some(event) = sub.poll() {
                match event {
                    ImageEvent::Ready(img) => {
                        tracing::info!(width = img.width(), height = img.height(), "overlay image ready");
                        self.image = Some(ImagePainter::new(img));
                        self.compositor.invalidate_content();
                        self.overlay_dirty = true;
                        changed = true;
                    }
                    ImageEvent::Failed(e) => {
                        tracing::warn!("overlay image failed, keeping procedural overlay: {e}");
                    }
                }
            }
            if sub.is_closed() {
                self.image_sub = None;
            }
        }
        changed
    }

    /* ---------- overlay content ---------- */

    /// Listen to an image provider. Replaces any previous subscription.
    pub fn subscribe_image(&mut self, sub: ImageSubscription) {
        if !self.disposed {
            self.image_sub = Some(sub);
        }
    }

    /// Set (or clear) the overlay image directly. Coverage is untouched.
    pub fn set_overlay_image(&mut self, image: Option<RgbaImage>) {
        self.image = image.map(ImagePainter::new);
        self.compositor.invalidate_content();
        self.overlay_dirty = true;
    }

    pub fn has_overlay_image(&self) -> bool {
        self.image.is_some()
    }

    /* ---------- output ---------- */

    /// The overlay as it looks right now (before reveal opacity), or `None`
    /// once fully revealed.
    pub fn overlay(&mut self) -> Option<&Layer> {
        if !self.refresh_overlay() {
            return None;
        }
        Some(self.compositor.layer())
    }

    fn refresh_overlay(&mut self) -> bool {
        if !self.reveal.overlay_visible() {
            return false;
        }
        if self.overlay_dirty {
            let painter: &dyn OverlayPainter = match &self.image {
                Some(img) => img,
                None => self.fallback.as_ref(),
            };
            self.compositor.render(self.size, self.recorder.strokes(), self.brush_size, painter);
            self.overlay_dirty = false;
        }
        true
    }

    /// Hidden content at the bottom, overlay (times reveal opacity) on top.
    pub fn compose(&mut self, content: &FrameBuffer, out: &mut FrameBuffer) -> Result<()> {
        if content.size() != self.size {
            return Err(Error::SizeMismatch {
                expected: (self.size.width, self.size.height),
                actual: (content.width, content.height),
            });
        }
        let visible = self.refresh_overlay();
        let overlay = visible.then(|| self.compositor.layer());
        compose_over(content, overlay, self.reveal.opacity(), out, &self.lut)
    }

    /* ---------- state ---------- */

    /// Last computed coverage percentage.
    pub fn coverage(&self) -> f32 {
        self.coverage.percentage()
    }

    pub fn threshold_reached(&self) -> bool {
        self.coverage.threshold_reached()
    }

    pub fn state(&self) -> ScratchState {
        self.reveal.state()
    }

    pub fn reveal_progress(&self) -> f32 {
        self.reveal.progress()
    }

    /// Overlay alpha multiplier from the reveal animation.
    pub fn opacity(&self) -> f32 {
        self.reveal.opacity()
    }

    pub fn strokes(&self) -> &[Stroke] {
        self.recorder.strokes()
    }

    pub fn coverage_estimator(&self) -> &CoverageEstimator {
        &self.coverage
    }

    pub fn clock_mut(&mut self) -> &mut C {
        self.reveal.clock_mut()
    }

    pub fn clock(&self) -> &C {
        self.reveal.clock()
    }
}

impl<C: AnimationClock> Drop for ScratchSurface<C> {
    fn drop(&mut self) {
        self.dispose();
    }
}
