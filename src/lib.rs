//! Scratch-off surface engine.
//!
//! An opaque overlay sits above hidden content. Dragging a pointer erases it
//! along smoothed strokes; a coarse occupancy grid estimates how much has been
//! cleared and drives an `on_change` / one-shot `on_threshold` pair. A timed
//! reveal can fade the whole overlay away.
//!
//! ```no_run
//! use scratch_card::{FrameBuffer, Point, ScratchConfig, ScratchSurface};
//!
//! let mut surface = ScratchSurface::new(&ScratchConfig::default());
//! surface.resize(320, 200);
//! surface.on_threshold(|| println!("prize!"));
//!
//! surface.pointer_down(Point::new(40.0, 40.0));
//! surface.pointer_move(Point::new(120.0, 60.0));
//! surface.pointer_up();
//!
//! let content = FrameBuffer::new(320, 200);
//! let mut frame = FrameBuffer::new(320, 200);
//! surface.pump();
//! surface.compose(&content, &mut frame).unwrap();
//! ```

pub mod blend;
pub mod clock;
pub mod compositor;
pub mod config;
pub mod coverage;
pub mod error;
pub mod giftcard;
pub mod image_source;
pub mod overlay;
pub mod raster;
pub mod reveal;
pub mod smooth;
pub mod stroke;
pub mod surface;
pub mod types;

pub use clock::{AnimationClock, FrameClock, ManualClock, Tick, TickSubscription};
pub use compositor::OverlayCompositor;
pub use config::ScratchConfig;
pub use coverage::{CoverageEstimator, OccupancyGrid};
pub use error::{Error, Result};
pub use giftcard::GiftCardPainter;
pub use image_source::{ImageEvent, ImageSubscription};
pub use overlay::{ImagePainter, OverlayPainter, SolidPainter};
pub use reveal::{RevealController, ScratchState};
pub use smooth::{Segment, SmoothPath, smooth};
pub use stroke::{Stroke, StrokeRecorder};
pub use surface::ScratchSurface;
pub use types::{Color, FrameBuffer, Layer, Point, Size};
