//! Inverse-mapped sampling of the crop region.
//!
//! For every output pixel we find its center in the displayed frame, map it
//! back through rotation and flip into source pixel space, and sample there.
//! Samples outside the source clamp to the nearest edge pixel, so crops
//! touching the border never pick up black fringes.

use crate::bitmap::{Bitmap, FilterType, CHANNELS};
use crate::crop::{CropRect, Point};
use crate::error::{CropError, Result};
use crate::orientation::{map_display_to_source, FlipMode, Rotation};

/// Render `crop` of `source` into a `size.0 × size.1` bitmap.
///
/// Bilinear and Lanczos3 read a fixed neighborhood at source scale, so a
/// strong downscale aliases fine detail. Fails with `ImageNotReady` for an
/// empty source.
pub fn resample(
    source: &Bitmap,
    crop: &CropRect,
    rotation: Rotation,
    flip: FlipMode,
    size: (u32, u32),
    filter: FilterType,
) -> Result<Bitmap> {
    if source.is_empty() {
        return Err(CropError::ImageNotReady);
    }
    let (out_w, out_h) = size;
    let (src_w, src_h) = (source.width as f64, source.height as f64);
    let step_x = crop.width() / out_w as f64;
    let step_y = crop.height() / out_h as f64;

    let mut output = vec![0u8; out_w as usize * out_h as usize * CHANNELS];

    for out_y in 0..out_h {
        let display_y = crop.top + (out_y as f64 + 0.5) * step_y;
        for out_x in 0..out_w {
            let display_x = crop.left + (out_x as f64 + 0.5) * step_x;
            let src = map_display_to_source(
                Point::new(display_x, display_y),
                rotation,
                flip,
                src_w,
                src_h,
            );

            let pixel = match filter {
                FilterType::Nearest => sample_nearest(source, src.x, src.y),
                // Pixel centers sit at +0.5 in continuous coordinates.
                FilterType::Bilinear => sample_bilinear(source, src.x - 0.5, src.y - 0.5),
                FilterType::Lanczos3 => sample_lanczos3(source, src.x - 0.5, src.y - 0.5),
            };

            let idx = (out_y as usize * out_w as usize + out_x as usize) * CHANNELS;
            output[idx..idx + CHANNELS].copy_from_slice(&pixel);
        }
    }

    Bitmap::new(out_w, out_h, output)
}

/// Clamp a pixel index to `[0, len - 1]`.
#[inline]
fn clamp_index(v: i64, len: u32) -> u32 {
    v.clamp(0, len as i64 - 1) as u32
}

/// Get a pixel as [f64; 4], clamping the coordinates to the image.
#[inline]
fn get_pixel_f64(image: &Bitmap, px: i64, py: i64) -> [f64; 4] {
    let p = image.pixel(clamp_index(px, image.width), clamp_index(py, image.height));
    [p[0] as f64, p[1] as f64, p[2] as f64, p[3] as f64]
}

#[inline]
fn to_pixel(values: [f64; 4]) -> [u8; 4] {
    values.map(|v| v.clamp(0.0, 255.0).round() as u8)
}

/// Sample the pixel whose square contains `(x, y)`.
fn sample_nearest(image: &Bitmap, x: f64, y: f64) -> [u8; 4] {
    image.pixel(
        clamp_index(x.floor() as i64, image.width),
        clamp_index(y.floor() as i64, image.height),
    )
}

/// Sample a pixel using bilinear interpolation.
///
/// `(x, y)` are in pixel-center coordinates: integer values hit pixel
/// centers exactly.
fn sample_bilinear(image: &Bitmap, x: f64, y: f64) -> [u8; 4] {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_f64(image, x0, y0);
    let p10 = get_pixel_f64(image, x0 + 1, y0);
    let p01 = get_pixel_f64(image, x0, y0 + 1);
    let p11 = get_pixel_f64(image, x0 + 1, y0 + 1);

    let mut result = [0.0f64; 4];
    for i in 0..CHANNELS {
        result[i] = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
    }
    to_pixel(result)
}

/// Sample a pixel over a 6x6 Lanczos3 neighborhood.
fn sample_lanczos3(image: &Bitmap, x: f64, y: f64) -> [u8; 4] {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 4];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        let py = y0 + ky;
        let wy = lanczos_weight(y - py as f64, 3.0);
        for kx in -2..=3 {
            let px = x0 + kx;
            let weight = lanczos_weight(x - px as f64, 3.0) * wy;

            let pixel = get_pixel_f64(image, px, py);
            for i in 0..CHANNELS {
                sum[i] += pixel[i] * weight;
            }
            weight_sum += weight;
        }
    }

    if weight_sum.abs() < f64::EPSILON {
        return sample_bilinear(image, x, y);
    }
    to_pixel(sum.map(|v| v / weight_sum))
}

/// Lanczos kernel weight function.
///
/// ```text
/// L(x) = sinc(x) * sinc(x/a)  for |x| < a
/// L(x) = 0                     for |x| >= a
/// ```
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;
    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Horizontal gradient, constant down each column.
    fn gradient(width: u32, height: u32) -> Bitmap {
        let mut img = Bitmap::filled(width, height, [0, 0, 0, 255]);
        for y in 0..height {
            for x in 0..width {
                let v = (x * 255 / (width - 1)) as u8;
                img.put_pixel(x, y, [v, v, v, 255]);
            }
        }
        img
    }

    #[test]
    fn test_lanczos_weight_at_zero() {
        assert!((lanczos_weight(0.0, 3.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lanczos_weight_at_boundary() {
        assert!(lanczos_weight(3.0, 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lanczos_weight_symmetry() {
        assert!((lanczos_weight(1.5, 3.0) - lanczos_weight(-1.5, 3.0)).abs() < 1e-10);
    }

    #[test]
    fn test_bilinear_hits_pixel_centers() {
        let img = gradient(6, 2);
        assert_eq!(sample_bilinear(&img, 2.0, 0.0), img.pixel(2, 0));
        // Halfway between two columns.
        let mid = sample_bilinear(&img, 2.5, 0.0);
        assert_eq!(mid[0], 128);
    }

    #[test]
    fn test_edge_samples_clamp() {
        let img = gradient(4, 4);
        assert_eq!(sample_bilinear(&img, -3.0, -3.0), img.pixel(0, 0));
        assert_eq!(sample_nearest(&img, 10.0, 10.0), img.pixel(3, 3));
        assert_eq!(sample_lanczos3(&img, 3.0, 3.0)[3], 255);
    }

    #[test]
    fn test_identity_resample_is_exact() {
        let img = gradient(8, 5);
        for filter in [FilterType::Nearest, FilterType::Bilinear, FilterType::Lanczos3] {
            let out = resample(
                &img,
                &CropRect::FULL,
                Rotation::Deg0,
                FlipMode::None,
                (8, 5),
                filter,
            )
            .unwrap();
            assert_eq!(out, img, "{:?}", filter);
        }
    }

    #[test]
    fn test_empty_source_is_not_ready() {
        let img = Bitmap::filled(0, 0, [0; 4]);
        for filter in [FilterType::Nearest, FilterType::Bilinear, FilterType::Lanczos3] {
            let result = resample(
                &img,
                &CropRect::FULL,
                Rotation::Deg0,
                FlipMode::None,
                (1, 1),
                filter,
            );
            assert_eq!(result, Err(CropError::ImageNotReady));
        }
    }

    #[test]
    fn test_half_turn_reverses_gradient() {
        let img = gradient(8, 2);
        let out = resample(
            &img,
            &CropRect::FULL,
            Rotation::Deg180,
            FlipMode::None,
            (8, 2),
            FilterType::Bilinear,
        )
        .unwrap();
        assert_eq!(out.pixel(0, 0), img.pixel(7, 1));
        assert_eq!(out.pixel(7, 0), img.pixel(0, 1));
    }

    #[test]
    fn test_downscale_averages() {
        let mut img = Bitmap::filled(2, 1, [0, 0, 0, 255]);
        img.put_pixel(1, 0, [200, 200, 200, 255]);
        let out = resample(
            &img,
            &CropRect::FULL,
            Rotation::Deg0,
            FlipMode::None,
            (1, 1),
            FilterType::Bilinear,
        )
        .unwrap();
        assert_eq!(out.pixel(0, 0), [100, 100, 100, 255]);
    }
}
