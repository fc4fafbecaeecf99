//! Deterministic test-time crops.
//!
//! Evaluation must be reproducible, so unlike training-time augmentation
//! these transforms carry no randomness: the ten-crop ensemble is the four
//! corner crops plus the center crop, each paired with its horizontal
//! mirror. All functions operate on row-major single-channel buffers.

/// Extract a `crop`x`crop` window from a `size`x`size` image at (top, left)
fn crop_at(image: &[f32], size: usize, crop: usize, top: usize, left: usize) -> Vec<f32> {
    debug_assert!(top + crop <= size && left + crop <= size);

    let mut out = Vec::with_capacity(crop * crop);
    for y in 0..crop {
        let row = (top + y) * size + left;
        out.extend_from_slice(&image[row..row + crop]);
    }
    out
}

/// Mirror a square image horizontally
fn hflip(image: &[f32], side: usize) -> Vec<f32> {
    let mut out = vec![0.0f32; image.len()];
    for y in 0..side {
        for x in 0..side {
            out[y * side + x] = image[y * side + (side - 1 - x)];
        }
    }
    out
}

/// Center crop of a square image
pub fn center_crop(image: &[f32], size: usize, crop: usize) -> Vec<f32> {
    let offset = (size - crop) / 2;
    crop_at(image, size, crop, offset, offset)
}

/// Ten-crop ensemble: four corners + center, each plus its horizontal
/// mirror, in that order. Crop count and order are fixed for a run.
pub fn ten_crop(image: &[f32], size: usize, crop: usize) -> Vec<Vec<f32>> {
    let far = size - crop;
    let plain = [
        crop_at(image, size, crop, 0, 0),
        crop_at(image, size, crop, 0, far),
        crop_at(image, size, crop, far, 0),
        crop_at(image, size, crop, far, far),
        center_crop(image, size, crop),
    ];

    let mut out = Vec::with_capacity(10);
    for c in &plain {
        out.push(c.clone());
    }
    for c in &plain {
        out.push(hflip(c, crop));
    }
    out
}
