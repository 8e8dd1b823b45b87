use image::{GrayImage, RgbaImage};

use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};

/// Above this sigma the exact kernel gets wide enough that three box passes are used instead.
const EXACT_KERNEL_MAX_SIGMA: f32 = 8.0;
const BOX_PASSES: usize = 3;

/// Gaussian blur of a straight-alpha RGBA image.
///
/// `sigma` is the standard deviation in pixels; `0` returns a copy. Color is blurred premultiplied
/// so transparent pixels never bleed black into their neighbours.
pub fn gaussian_blur(img: &RgbaImage, sigma: f32) -> CardResult<RgbaImage> {
    let (w, h) = img.dimensions();
    let mut buf = img.as_raw().clone();
    premultiply_rgba8_in_place(&mut buf);
    let mut out = blur_channels(&buf, w, h, 4, sigma)?;
    unpremultiply_rgba8_in_place(&mut out);
    RgbaImage::from_raw(w, h, out)
        .ok_or_else(|| CardError::processing("blur output does not match image dimensions"))
}

/// Gaussian blur of a single-channel coverage mask.
pub fn blur_gray(mask: &GrayImage, sigma: f32) -> CardResult<GrayImage> {
    let (w, h) = mask.dimensions();
    let out = blur_channels(mask.as_raw(), w, h, 1, sigma)?;
    GrayImage::from_raw(w, h, out)
        .ok_or_else(|| CardError::processing("blur output does not match mask dimensions"))
}

/// Separable blur over interleaved 8-bit channels with clamped edges.
pub(crate) fn blur_channels(
    src: &[u8],
    width: u32,
    height: u32,
    channels: usize,
    sigma: f32,
) -> CardResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(channels))
        .ok_or_else(|| CardError::processing("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(CardError::processing(
            "blur expects src matching width*height*channels",
        ));
    }
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(CardError::processing("blur sigma must be finite and >= 0"));
    }
    if sigma == 0.0 || expected_len == 0 {
        return Ok(src.to_vec());
    }

    let geom = Geometry {
        width: width as usize,
        height: height as usize,
        channels,
    };
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    if sigma <= EXACT_KERNEL_MAX_SIGMA {
        let radius = (sigma * 3.0).ceil() as u32;
        let kernel = gaussian_kernel_q16(radius, sigma)?;
        horizontal_pass(src, &mut tmp, geom, &kernel);
        vertical_pass(&tmp, &mut out, geom, &kernel);
        return Ok(out);
    }

    out.copy_from_slice(src);
    for radius in box_radii(sigma) {
        box_horizontal(&out, &mut tmp, geom, radius);
        box_vertical(&tmp, &mut out, geom, radius);
    }
    Ok(out)
}

#[derive(Clone, Copy)]
struct Geometry {
    width: usize,
    height: usize,
    channels: usize,
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> CardResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(CardError::processing("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

/// Radii of three successive box filters whose convolution approximates a gaussian of `sigma`.
fn box_radii(sigma: f32) -> [usize; BOX_PASSES] {
    let n = BOX_PASSES as f64;
    let s2 = f64::from(sigma) * f64::from(sigma);
    let ideal = (12.0 * s2 / n + 1.0).sqrt();
    let mut wl = ideal.floor() as i64;
    if wl % 2 == 0 {
        wl -= 1;
    }
    let wl = wl.max(1);
    let wu = wl + 2;
    let wlf = wl as f64;
    let m = ((12.0 * s2 - n * wlf * wlf - 4.0 * n * wlf - 3.0 * n) / (-4.0 * wlf - 4.0)).round();

    let mut radii = [0usize; BOX_PASSES];
    for (i, r) in radii.iter_mut().enumerate() {
        let size = if (i as f64) < m { wl } else { wu };
        *r = ((size - 1) / 2) as usize;
    }
    radii
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], g: Geometry, k: &[u32]) {
    let radius = (k.len() / 2) as isize;
    let w = g.width as isize;
    let ch = g.channels;
    for y in 0..g.height {
        let row = y * g.width;
        for x in 0..w {
            let out_idx = (row + x as usize) * ch;
            for c in 0..ch {
                let mut acc = 0u64;
                for (ki, &kw) in k.iter().enumerate() {
                    let sx = (x + ki as isize - radius).clamp(0, w - 1) as usize;
                    acc += u64::from(kw) * u64::from(src[(row + sx) * ch + c]);
                }
                dst[out_idx + c] = q16_to_u8(acc);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], g: Geometry, k: &[u32]) {
    let radius = (k.len() / 2) as isize;
    let h = g.height as isize;
    let ch = g.channels;
    for y in 0..h {
        for x in 0..g.width {
            let out_idx = (y as usize * g.width + x) * ch;
            for c in 0..ch {
                let mut acc = 0u64;
                for (ki, &kw) in k.iter().enumerate() {
                    let sy = (y + ki as isize - radius).clamp(0, h - 1) as usize;
                    acc += u64::from(kw) * u64::from(src[(sy * g.width + x) * ch + c]);
                }
                dst[out_idx + c] = q16_to_u8(acc);
            }
        }
    }
}

fn box_horizontal(src: &[u8], dst: &mut [u8], g: Geometry, radius: usize) {
    let ch = g.channels;
    let last = g.width - 1;
    let r = radius as isize;
    let d = (2 * radius + 1) as u32;
    for y in 0..g.height {
        let row = y * g.width;
        let at = |x: isize, c: usize| -> u32 {
            let sx = x.clamp(0, last as isize) as usize;
            u32::from(src[(row + sx) * ch + c])
        };
        for c in 0..ch {
            let mut acc: u32 = (-r..=r).map(|x| at(x, c)).sum();
            for x in 0..g.width {
                dst[(row + x) * ch + c] = ((acc + d / 2) / d).min(255) as u8;
                let xi = x as isize;
                acc = acc + at(xi + r + 1, c) - at(xi - r, c);
            }
        }
    }
}

fn box_vertical(src: &[u8], dst: &mut [u8], g: Geometry, radius: usize) {
    let ch = g.channels;
    let last = g.height - 1;
    let r = radius as isize;
    let d = (2 * radius + 1) as u32;
    for x in 0..g.width {
        let at = |y: isize, c: usize| -> u32 {
            let sy = y.clamp(0, last as isize) as usize;
            u32::from(src[(sy * g.width + x) * ch + c])
        };
        for c in 0..ch {
            let mut acc: u32 = (-r..=r).map(|y| at(y, c)).sum();
            for y in 0..g.height {
                dst[(y * g.width + x) * ch + c] = ((acc + d / 2) / d).min(255) as u8;
                let yi = y as isize;
                acc = acc + at(yi + r + 1, c) - at(yi - r, c);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    (v.min(255)) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
