use image::{GrayImage, Luma, Rgb, RgbImage};

use super::QR;
use crate::common::metadata::Color;

// Render
//------------------------------------------------------------------------------

impl QR {
    /// Paints the symbol with a light quiet zone of `QUIET_ZONE` modules on
    /// every side, each module a `module_sz` pixel square.
    pub fn render(&self, module_sz: u32, dark: Rgb<u8>, light: Rgb<u8>) -> RgbImage {
        let qz_sz = QUIET_ZONE * module_sz;
        let qr_sz = self.width() as u32 * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        RgbImage::from_fn(total_sz, total_sz, |x, y| {
            match self.color_at(x, y, qz_sz, qr_sz, module_sz) {
                Color::Dark => dark,
                Color::Light => light,
            }
        })
    }

    pub fn to_image(&self, module_sz: u32) -> GrayImage {
        let qz_sz = QUIET_ZONE * module_sz;
        let qr_sz = self.width() as u32 * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        GrayImage::from_fn(total_sz, total_sz, |x, y| {
            Luma([self.color_at(x, y, qz_sz, qr_sz, module_sz).select(0, 255)])
        })
    }

    /// Text rendering for terminals, light modules as full blocks.
    pub fn to_str(&self, module_sz: u32) -> String {
        let qz_sz = QUIET_ZONE * module_sz;
        let qr_sz = self.width() as u32 * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        let mut canvas = String::with_capacity((total_sz * (total_sz + 1)) as usize);
        for y in 0..total_sz {
            for x in 0..total_sz {
                canvas.push(self.color_at(x, y, qz_sz, qr_sz, module_sz).select(' ', '█'));
            }
            canvas.push('\n');
        }

        canvas
    }

    fn color_at(&self, x: u32, y: u32, qz_sz: u32, qr_sz: u32, module_sz: u32) -> Color {
        if x < qz_sz || x >= qz_sz + qr_sz || y < qz_sz || y >= qz_sz + qr_sz {
            return Color::Light;
        }
        let r = ((y - qz_sz) / module_sz) as i16;
        let c = ((x - qz_sz) / module_sz) as i16;
        *self.get(r, c)
    }
}

// Global constants
//------------------------------------------------------------------------------

// Light border width in modules
pub const QUIET_ZONE: u32 = 4;
