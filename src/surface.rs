//! Drawing surfaces.
//!
//! The animator never talks to a renderer directly. Each frame it clears a
//! [`DrawSurface`] and hands it one [`SpriteDraw`] per visible item, in draw
//! order. Surfaces are obtained lazily from a [`SurfaceProvider`]; a provider
//! that fails turns every effect into a silent no-op until a later call
//! succeeds.
//!
//! - [`RecordingSurface`] keeps the last presented frame in memory. Tests and
//!   the headless CLI use it.
//! - `crate::backend::raylib` (feature `raylib`) draws the recorded frame in a
//!   window.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use thiserror::Error;

use crate::color::Color;
use crate::components::sprite::Shape;
use crate::resources::viewport::Viewport;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("drawing surface unavailable: {0}")]
    Unavailable(String),
    #[error("drawing surface lost")]
    Lost,
}

/// What to draw for one item.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Shape(Shape),
    /// A text glyph such as an emoji.
    Glyph(String),
}

/// One draw call. `color.a` already includes the item's opacity.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteDraw {
    pub primitive: Primitive,
    /// Center of the item in surface pixels.
    pub position: Vec2,
    /// Diameter, side length or glyph size in pixels, before `scale`.
    pub size: f32,
    pub scale: f32,
    /// Degrees, clockwise.
    pub rotation: f32,
    pub color: Color,
}

/// Heart outline as two lobes over a downward triangle, already rotated
/// about the sprite center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeartGeometry {
    pub lobes: [Vec2; 2],
    pub lobe_radius: f32,
    /// Counter-clockwise on screen (y down), as raylib expects.
    pub triangle: [Vec2; 3],
}

impl SpriteDraw {
    pub fn heart_geometry(&self) -> HeartGeometry {
        let r = self.size * self.scale / 4.0;
        let turn = Vec2::from_angle(self.rotation.to_radians());
        let place = |offset: Vec2| self.position + turn.rotate(offset);
        HeartGeometry {
            lobes: [place(Vec2::new(-r, -r / 2.0)), place(Vec2::new(r, -r / 2.0))],
            lobe_radius: r,
            triangle: [
                place(Vec2::new(-2.0 * r, -r / 4.0)),
                place(Vec2::new(0.0, 2.0 * r)),
                place(Vec2::new(2.0 * r, -r / 4.0)),
            ],
        }
    }
}

pub trait DrawSurface {
    /// Current surface size in pixels.
    fn size(&self) -> (u32, u32);
    /// Match a new viewport size.
    fn resize(&mut self, width: u32, height: u32);
    /// Erase everything drawn so far.
    fn clear(&mut self);
    fn draw(&mut self, sprite: &SpriteDraw);
    /// Called once all of a frame's draws are done.
    ///
    /// [`SurfaceError::Lost`] makes the animator drop the surface; the next
    /// effect acquires a fresh one from the provider.
    fn present(&mut self) -> Result<(), SurfaceError> {
        Ok(())
    }
}

/// Source of drawing surfaces, asked again whenever the animator has none.
pub trait SurfaceProvider {
    fn acquire(&mut self, viewport: Viewport) -> Result<Box<dyn DrawSurface>, SurfaceError>;
}

impl<F> SurfaceProvider for F
where
    F: FnMut(Viewport) -> Result<Box<dyn DrawSurface>, SurfaceError>,
{
    fn acquire(&mut self, viewport: Viewport) -> Result<Box<dyn DrawSurface>, SurfaceError> {
        self(viewport)
    }
}

/// Provider that never yields a surface.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSurface;

impl SurfaceProvider for NoSurface {
    fn acquire(&mut self, _viewport: Viewport) -> Result<Box<dyn DrawSurface>, SurfaceError> {
        Err(SurfaceError::Unavailable("no surface host".into()))
    }
}

/// Everything a [`RecordingSurface`] has seen.
#[derive(Debug, Default, Clone)]
pub struct Recording {
    pub width: u32,
    pub height: u32,
    /// Draws since the last clear.
    pub pending: Vec<SpriteDraw>,
    /// The last presented frame.
    pub last_frame: Vec<SpriteDraw>,
    pub clears: u64,
    pub frames_presented: u64,
}

/// Shared handle to a [`Recording`]. Clones observe the same recording.
pub type RecordingHandle = Rc<RefCell<Recording>>;

/// In-memory surface that records draw calls.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    recording: RecordingHandle,
}

impl RecordingSurface {
    pub fn new(viewport: Viewport) -> Self {
        let recording = Recording {
            width: viewport.w,
            height: viewport.h,
            ..Recording::default()
        };
        RecordingSurface {
            recording: Rc::new(RefCell::new(recording)),
        }
    }

    pub fn handle(&self) -> RecordingHandle {
        Rc::clone(&self.recording)
    }

    /// A provider that hands out recording surfaces sharing one recording,
    /// plus the handle to inspect it.
    pub fn provider() -> (RecordingProvider, RecordingHandle) {
        let handle: RecordingHandle = Rc::new(RefCell::new(Recording::default()));
        (
            RecordingProvider {
                recording: Rc::clone(&handle),
            },
            handle,
        )
    }
}

impl DrawSurface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        let r = self.recording.borrow();
        (r.width, r.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        let mut r = self.recording.borrow_mut();
        r.width = width;
        r.height = height;
    }

    fn clear(&mut self) {
        let mut r = self.recording.borrow_mut();
        r.pending.clear();
        r.clears += 1;
    }

    fn draw(&mut self, sprite: &SpriteDraw) {
        self.recording.borrow_mut().pending.push(sprite.clone());
    }

    fn present(&mut self) -> Result<(), SurfaceError> {
        let mut r = self.recording.borrow_mut();
        r.last_frame = std::mem::take(&mut r.pending);
        r.frames_presented += 1;
        Ok(())
    }
}

/// Provider returned by [`RecordingSurface::provider`].
#[derive(Debug, Clone)]
pub struct RecordingProvider {
    recording: RecordingHandle,
}

impl SurfaceProvider for RecordingProvider {
    fn acquire(&mut self, viewport: Viewport) -> Result<Box<dyn DrawSurface>, SurfaceError> {
        {
            let mut r = self.recording.borrow_mut();
            r.width = viewport.w;
            r.height = viewport.h;
        }
        Ok(Box::new(RecordingSurface {
            recording: Rc::clone(&self.recording),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(x: f32) -> SpriteDraw {
        SpriteDraw {
            primitive: Primitive::Shape(Shape::Circle),
            position: Vec2::new(x, 0.0),
            size: 4.0,
            scale: 1.0,
            rotation: 0.0,
            color: Color::WHITE,
        }
    }

    #[test]
    fn test_recording_frame_lifecycle() {
        let mut s = RecordingSurface::new(Viewport::new(100, 50));
        let h = s.handle();
        s.clear();
        s.draw(&dot(1.0));
        s.draw(&dot(2.0));
        assert!(h.borrow().last_frame.is_empty());
        s.present().unwrap();
        let r = h.borrow();
        assert_eq!(r.last_frame.len(), 2);
        assert_eq!(r.last_frame[1].position.x, 2.0);
        assert!(r.pending.is_empty());
        assert_eq!(r.clears, 1);
        assert_eq!(r.frames_presented, 1);
    }

    #[test]
    fn test_heart_geometry_follows_rotation() {
        let mut heart = SpriteDraw {
            primitive: Primitive::Shape(Shape::Heart),
            position: Vec2::new(100.0, 100.0),
            size: 8.0,
            scale: 1.0,
            rotation: 0.0,
            color: Color::WHITE,
        };
        let upright = heart.heart_geometry();
        assert_eq!(upright.lobe_radius, 2.0);
        assert_eq!(upright.triangle[1], Vec2::new(100.0, 104.0));

        // Half a turn puts the tip above the center.
        heart.rotation = 180.0;
        let flipped = heart.heart_geometry();
        assert!((flipped.triangle[1] - Vec2::new(100.0, 96.0)).length() < 1e-4);
        assert!((flipped.lobes[0] - Vec2::new(102.0, 101.0)).length() < 1e-4);
    }

    #[test]
    fn test_resize_updates_size() {
        let mut s = RecordingSurface::new(Viewport::new(100, 50));
        s.resize(300, 200);
        assert_eq!(s.size(), (300, 200));
    }

    #[test]
    fn test_provider_shares_recording() {
        let (mut provider, handle) = RecordingSurface::provider();
        let mut s = provider.acquire(Viewport::new(640, 480)).unwrap();
        assert_eq!(s.size(), (640, 480));
        s.clear();
        s.draw(&dot(0.0));
        s.present().unwrap();
        assert_eq!(handle.borrow().last_frame.len(), 1);
    }

    #[test]
    fn test_closure_provider_and_no_surface() {
        let mut failing = |_vp: Viewport| -> Result<Box<dyn DrawSurface>, SurfaceError> {
            Err(SurfaceError::Unavailable("detached".into()))
        };
        assert!(failing.acquire(Viewport::default()).is_err());
        assert!(NoSurface.acquire(Viewport::default()).is_err());
    }
}
