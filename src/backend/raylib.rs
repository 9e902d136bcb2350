//! Raylib preview window.
//!
//! The animator keeps drawing into a [`RecordingSurface`](crate::surface::RecordingSurface);
//! [`RaylibPreview`] copies the last presented frame of the shared
//! [`Recording`] to a resizable window and reports pointer clicks back to
//! the host.

use std::time::Duration;

use raylib::prelude::*;

use crate::color::Color as FxColor;
use crate::components::sprite::Shape;
use crate::resources::viewport::Viewport;
use crate::surface::{Primitive, Recording, SpriteDraw};

const BACKGROUND: Color = Color::new(24, 16, 32, 255);

fn to_raylib(c: FxColor) -> Color {
    Color::new(c.r, c.g, c.b, c.a)
}

pub struct RaylibPreview {
    rl: RaylibHandle,
    thread: RaylibThread,
}

impl RaylibPreview {
    pub fn open(viewport: Viewport, title: &str) -> Self {
        let (mut rl, thread) = raylib::init()
            .size(viewport.w as i32, viewport.h as i32)
            .resizable()
            .title(title)
            .build();
        rl.set_target_fps(60);
        RaylibPreview { rl, thread }
    }

    pub fn is_open(&self) -> bool {
        !self.rl.window_should_close()
    }

    pub fn frame_time(&self) -> Duration {
        Duration::from_secs_f32(self.rl.get_frame_time().max(0.0))
    }

    /// Time since the window opened.
    pub fn clock(&self) -> Duration {
        Duration::from_secs_f64(self.rl.get_time().max(0.0))
    }

    pub fn size(&self) -> (u32, u32) {
        (
            self.rl.get_screen_width().max(1) as u32,
            self.rl.get_screen_height().max(1) as u32,
        )
    }

    /// Position of a left click this frame, if any.
    pub fn clicked_at(&self) -> Option<(f32, f32)> {
        if self
            .rl
            .is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT)
        {
            let p = self.rl.get_mouse_position();
            Some((p.x, p.y))
        } else {
            None
        }
    }

    /// Draw the last presented frame.
    pub fn show(&mut self, recording: &Recording) {
        let mut d = self.rl.begin_drawing(&self.thread);
        d.clear_background(BACKGROUND);
        for sprite in &recording.last_frame {
            draw_sprite(&mut d, sprite);
        }
    }
}

fn draw_sprite(d: &mut RaylibDrawHandle, sprite: &SpriteDraw) {
    let color = to_raylib(sprite.color);
    let size = sprite.size * sprite.scale;
    let center = Vector2::new(sprite.position.x, sprite.position.y);
    match &sprite.primitive {
        Primitive::Shape(Shape::Circle) => {
            d.draw_circle_v(center, size / 2.0, color);
        }
        Primitive::Shape(Shape::Square) => {
            let rect = Rectangle::new(center.x, center.y, size, size);
            d.draw_rectangle_pro(rect, Vector2::new(size / 2.0, size / 2.0), sprite.rotation, color);
        }
        Primitive::Shape(Shape::Heart) => {
            let heart = sprite.heart_geometry();
            let v = |p: glam::Vec2| Vector2::new(p.x, p.y);
            for lobe in heart.lobes {
                d.draw_circle_v(v(lobe), heart.lobe_radius, color);
            }
            let [a, b, c] = heart.triangle;
            d.draw_triangle(v(a), v(b), v(c), color);
        }
        Primitive::Glyph(glyph) => {
            let font_size = size.max(1.0) as i32;
            let half = font_size / 2;
            d.draw_text(
                glyph,
                center.x as i32 - half,
                center.y as i32 - half,
                font_size,
                color,
            );
        }
    }
}
