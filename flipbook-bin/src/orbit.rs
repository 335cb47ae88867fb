// orbit.rs
//
// Copyright (c) 2026  flipbook developers
//
//! Orbiting circles animation
use pix::{gray::Gray8, rgb::SRgb8, Palette, Raster};
use std::f32::consts::PI;

/// Canvas width
pub const WIDTH: u16 = 160;

/// Canvas height
pub const HEIGHT: u16 = 120;

/// Number of orbiting circles
const NUM_CIRCLES: usize = 10;

/// Radius of orbiting circles
const RADIUS: i32 = 5;

/// Radius of trail dots
const TRAIL_RADIUS: i32 = 1;

/// Scale of trail dot positions
const TRAIL_SCALE: f32 = 0.25;

/// Default 16-color palette
const COLORS: [u32; 16] = [
    0x000000, 0x2b335f, 0x7e2072, 0x19959c, 0x8b4852, 0x395c98, 0xa9c1ff,
    0xeeeeee, 0xd4186c, 0xd38441, 0xe9c35b, 0x70c6a9, 0x7696de, 0xa3a3a3,
    0xff9798, 0xedc7b0,
];

/// Make the default palette
pub fn palette() -> Palette {
    let mut palette = Palette::new(COLORS.len());
    for rgb in COLORS {
        let [_, r, g, b] = rgb.to_be_bytes();
        palette.set_entry(SRgb8::new(r, g, b));
    }
    palette
}

/// Orbit animation state
pub struct Orbit {
    /// Time step per frame
    dt: f32,
    /// Animation time
    t: f32,
    /// Circle positions, relative to the center
    current: [(f32, f32); NUM_CIRCLES],
    /// Circle positions on the previous frame
    past: [(f32, f32); NUM_CIRCLES],
}

impl Orbit {
    /// Create a new orbit animation
    pub fn new(fps: f32) -> Self {
        Orbit {
            dt: 2.0 / fps,
            t: 0.0,
            current: [(0.0, 0.0); NUM_CIRCLES],
            past: [(0.0, 0.0); NUM_CIRCLES],
        }
    }

    /// Advance to the next frame
    pub fn advance(&mut self) {
        self.past = self.current;
        self.t += self.dt;
        let w = f32::from(WIDTH) / 4.0;
        let t = self.t;
        for (i, pos) in self.current.iter_mut().enumerate() {
            let radians = i as f32 / NUM_CIRCLES as f32 * 2.0 * PI;
            let x = (radians + t).sin() * (w * t.sin());
            let y = (radians + t).cos() * (w * t.cos());
            *pos = (x, y);
        }
    }

    /// Render the current frame
    pub fn render(&self) -> Raster<Gray8> {
        let mut raster = Raster::with_clear(WIDTH.into(), HEIGHT.into());
        let cx = f32::from(WIDTH) / 2.0;
        let cy = f32::from(HEIGHT) / 2.0;
        for (i, (x, y)) in self.current.iter().enumerate() {
            let clr = color(i);
            fill_circle(&mut raster, x + cx, y + cy, RADIUS, clr);
        }
        for (i, (x, y)) in self.past.iter().enumerate() {
            let clr = color(i);
            let (x, y) = (x * TRAIL_SCALE + cx, y * TRAIL_SCALE + cy);
            fill_circle(&mut raster, x, y, TRAIL_RADIUS, clr);
        }
        raster
    }
}

/// Render a number of frames
pub fn render_frames(fps: f32, n_frames: usize) -> Vec<Raster<Gray8>> {
    let mut orbit = Orbit::new(fps);
    (0..n_frames)
        .map(|_| {
            orbit.advance();
            orbit.render()
        })
        .collect()
}

/// Get palette index for a circle
fn color(i: usize) -> u8 {
    ((i + 1) % COLORS.len()) as u8
}

/// Fill a circle, clipped to the raster
fn fill_circle(raster: &mut Raster<Gray8>, cx: f32, cy: f32, r: i32, clr: u8) {
    let cx = cx.round() as i32;
    let cy = cy.round() as i32;
    let w = raster.width() as i32;
    let h = raster.height() as i32;
    for y in (cy - r).max(0)..=(cy + r).min(h - 1) {
        for x in (cx - r).max(0)..=(cx + r).min(w - 1) {
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy <= r * r {
                *raster.pixel_mut(x, y) = Gray8::new(clr);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pix::gray::Gray;

    fn count(raster: &Raster<Gray8>, clr: u8) -> usize {
        raster
            .pixels()
            .iter()
            .filter(|p| u8::from(Gray::value(**p)) == clr)
            .count()
    }

    #[test]
    fn palette_colors() {
        let palette = palette();
        assert_eq!(palette.len(), 16);
        assert_eq!(palette.entry(0), Some(SRgb8::new(0, 0, 0)));
        assert_eq!(palette.entry(1), Some(SRgb8::new(0x2b, 0x33, 0x5f)));
        assert_eq!(palette.entry(15), Some(SRgb8::new(0xed, 0xc7, 0xb0)));
    }

    #[test]
    fn circle_clipped() {
        let mut raster = Raster::with_clear(8, 8);
        fill_circle(&mut raster, 0.0, 0.0, 2, 3);
        // quarter disc of radius 2: rows of 3, 2 and 1 pixels
        assert_eq!(count(&raster, 3), 6);
        assert_eq!(count(&raster, 0), 64 - 6);
    }

    #[test]
    fn frames() {
        let frames = render_frames(15.0, 4);
        assert_eq!(frames.len(), 4);
        for raster in &frames {
            assert_eq!(raster.width(), u32::from(WIDTH));
            assert_eq!(raster.height(), u32::from(HEIGHT));
            // last trail dot is drawn on top
            assert!(count(raster, color(NUM_CIRCLES - 1)) > 0);
            assert!(count(raster, 0) > raster.pixels().len() / 2);
        }
        assert_ne!(frames[0].pixels(), frames[1].pixels());
    }
}
