//! Normalized patch distance between two masked images

use crate::spatial::MaskedImage;

/// Largest representable distance, also the "no valid match" sentinel
pub const DSCALE: u32 = 65_535;

/// Penalty for a pixel pair that cannot be compared (hole or outside image)
pub const SSD_MAX: u64 = 10 * 255 * 255;

/// Per-channel SSD weights (R, G, B), a rough luminance weighting
pub const CHANNEL_WEIGHTS: [u64; 3] = [3, 6, 1];

/// Distance between the patch at (xs, ys) in `source` and the patch at
/// (xt, yt) in `target`, scaled to `[0, DSCALE]`
///
/// Pixel pairs where either side is masked or outside its image add the full
/// `SSD_MAX` penalty, so holes and borders are discouraged rather than
/// excluded. A patch with no comparable pixel scores exactly `DSCALE`.
pub fn patch_distance(
    source: &MaskedImage,
    xs: i32,
    ys: i32,
    target: &MaskedImage,
    xt: i32,
    yt: i32,
    radius: i32,
) -> u32 {
    let mut distance = 0u64;
    let mut weight_sum = 0u64;

    for dy in -radius..=radius {
        for dx in -radius..=radius {
            weight_sum += SSD_MAX;
            distance += pixel_cost(
                source.known_pixel(xs + dx, ys + dy),
                target.known_pixel(xt + dx, yt + dy),
            );
        }
    }

    if weight_sum == 0 {
        return DSCALE;
    }

    // Rounded division; distance <= weight_sum keeps the result within DSCALE
    ((u64::from(DSCALE) * distance + weight_sum / 2) / weight_sum) as u32
}

/// Weighted squared difference of two pixels, `SSD_MAX` if either is unknown
pub fn pixel_cost(source: Option<[u8; 3]>, target: Option<[u8; 3]>) -> u64 {
    let (Some(a), Some(b)) = (source, target) else {
        return SSD_MAX;
    };

    a.iter()
        .zip(b)
        .zip(CHANNEL_WEIGHTS)
        .map(|((&p, q), weight)| {
            let diff = u64::from(p.abs_diff(q));
            weight * diff * diff
        })
        .sum()
}
