use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};

/// Grayscale conversion that keeps four channels, so R = G = B for every pixel.
pub fn desaturate(image: &DynamicImage) -> RgbaImage {
    image.grayscale().to_rgba8()
}

/// Row-major red channel scaled to `[0, 1]`.
pub fn pack_red_channel(image: &RgbaImage) -> Vec<f32> {
    image.pixels().map(|p| f32::from(p[0]) / 255.0).collect()
}

/// Converts a trace bitmap into the `side * side` classifier input.
pub fn trace_to_tensor(trace: &DynamicImage, side: u32) -> Vec<f32> {
    let sized = if trace.width() == side && trace.height() == side {
        desaturate(trace)
    } else {
        tracing::debug!(
            "Resizing {}x{} trace to {}x{}",
            trace.width(),
            trace.height(),
            side,
            side
        );
        desaturate(&trace.resize_exact(side, side, FilterType::Triangle))
    };
    pack_red_channel(&sized)
}
