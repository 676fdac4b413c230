use clap::ValueEnum;
use raylib::prelude::*;
use crate::constants::*;
use crate::looper::Layer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FitMode {
    /// Fill the whole frame, cropping the overflow
    #[default]
    Cover,
    /// Show the whole image, shrinking it to 90% of the frame if needed
    Contain,
}

/// Scale that maps a `width` x `height` texture onto the render target.
pub fn fit_scale(width: f32, height: f32, mode: FitMode) -> f32 {
    let screen_width = RENDER_WIDTH as f32;
    let screen_height = RENDER_HEIGHT as f32;
    if width <= 0.0 || height <= 0.0 {
        return 1.0;
    }
    match mode {
        FitMode::Cover => (screen_width / width).max(screen_height / height),
        FitMode::Contain => {
            if width > height {
                if width > screen_width * 0.9 {
                    (screen_width * 0.9) / width
                } else {
                    1.0
                }
            } else if height > screen_height * 0.9 {
                (screen_height * 0.9) / height
            } else {
                1.0
            }
        }
    }
}

/// Alpha byte for an opacity in `[0, 1]`.
pub fn alpha_byte(opacity: f32) -> u8 {
    (opacity.clamp(0.0, 1.0) * 255.0).round() as u8
}

pub struct Slide {
    image: Texture2D,
    scale: f32,
    opacity: f32,
}

impl Slide {
    pub fn new(image: Texture2D, fit: FitMode) -> Self {
        let scale = fit_scale(image.width() as f32, image.height() as f32, fit);
        Self {
            image,
            scale,
            opacity: 0.0,
        }
    }

    pub fn draw(&self, d: &mut RaylibDrawHandle) {
        if self.opacity <= 0.0 {
            return;
        }

        let screen_width = RENDER_WIDTH as f32;
        let screen_height = RENDER_HEIGHT as f32;

        let tex_width = self.image.width() as f32;
        let tex_height = self.image.height() as f32;

        let scaled_width = tex_width * self.scale;
        let scaled_height = tex_height * self.scale;

        // Centered; anything outside the render texture is clipped by it
        let dest = Rectangle::new(
            (screen_width - scaled_width) * 0.5,
            (screen_height - scaled_height) * 0.5,
            scaled_width,
            scaled_height,
        );

        d.draw_texture_pro(
            &self.image,
            Rectangle::new(0.0, 0.0, tex_width, tex_height),
            dest,
            Vector2::new(0.0, 0.0),
            0.0,
            Color::new(255, 255, 255, alpha_byte(self.opacity)),
        );
    }
}

impl Layer for Slide {
    fn opacity(&self) -> f32 {
        self.opacity
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
    }
}
