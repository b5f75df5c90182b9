//! Palette reduction for indexed images
//!
//! A [`PaletteImage`] is one frame's index buffer together with its color
//! table. [`PaletteImage::reduce`] builds a smaller table with a weighted
//! median cut over the colors the frame actually uses, then remaps every pixel
//! with Floyd–Steinberg error diffusion so gradients dither instead of band.
//!
//! Transparent pixels keep a dedicated slot at the end of the reduced table and
//! never receive or spread quantization error.

/// An RGB palette entry
pub type Rgb = [u8; 3];

/// Indexed pixel data plus its ordered palette
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteImage {
    pub width: usize,
    pub height: usize,
    /// Row-major palette indices, `width * height` long
    pub pixels: Vec<u8>,
    pub palette: Vec<Rgb>,
    /// Index treated as fully transparent, if any
    pub transparent: Option<u8>,
}

impl PaletteImage {
    /// Build from a packed `RGBRGB...` color table
    pub fn from_packed(
        width: usize,
        height: usize,
        pixels: Vec<u8>,
        packed_palette: &[u8],
        transparent: Option<u8>,
    ) -> Self {
        let palette = packed_palette
            .chunks_exact(3)
            .map(|rgb| [rgb[0], rgb[1], rgb[2]])
            .collect();
        Self {
            width,
            height,
            pixels,
            palette,
            transparent,
        }
    }

    /// Color table flattened back into `RGBRGB...` form
    pub fn packed_palette(&self) -> Vec<u8> {
        self.palette.iter().flatten().copied().collect()
    }

    /// Resolve the color of a palette index; out-of-range indices read as black
    fn color_of(&self, index: u8) -> Rgb {
        self.palette
            .get(index as usize)
            .copied()
            .unwrap_or([0, 0, 0])
    }

    fn is_transparent(&self, index: u8) -> bool {
        self.transparent == Some(index)
    }

    /// Reduce to at most `target` palette entries (transparent slot included)
    ///
    /// `target` must be at least 2 when the image has a transparent index and
    /// at least 1 otherwise; smaller values are raised to that minimum.
    pub fn reduce(&self, target: usize) -> PaletteImage {
        let reserve = usize::from(self.transparent.is_some());
        let budget = target.max(1 + reserve) - reserve;

        let mut palette = median_cut(&self.histogram(), budget);
        if palette.is_empty() {
            // Fully transparent (or empty) frame: keep one opaque entry so the
            // table is never empty.
            palette.push([0, 0, 0]);
        }

        let transparent = self.transparent.map(|old| {
            palette.push(self.color_of(old));
            (palette.len() - 1) as u8
        });

        let pixels = self.dither_into(&palette, transparent);

        PaletteImage {
            width: self.width,
            height: self.height,
            pixels,
            palette,
            transparent,
        }
    }

    /// Count how often each opaque color appears
    fn histogram(&self) -> Vec<(Rgb, u32)> {
        let mut counts = [0u32; 256];
        for &index in &self.pixels {
            counts[index as usize] += 1;
        }

        let mut by_color: Vec<(Rgb, u32)> = Vec::new();
        for (index, &count) in counts.iter().enumerate() {
            if count == 0 || self.is_transparent(index as u8) {
                continue;
            }
            let color = self.color_of(index as u8);
            match by_color.iter_mut().find(|(existing, _)| *existing == color) {
                Some((_, total)) => *total += count,
                None => by_color.push((color, count)),
            }
        }
        by_color
    }

    /// Map every pixel onto `palette` with Floyd–Steinberg error diffusion
    ///
    /// Pixels are visited in raster order; the quantization error of each
    /// pixel is pushed 7/16 right, 3/16 down-left, 5/16 down and 1/16
    /// down-right, onto pixels that have not been visited yet.
    fn dither_into(&self, palette: &[Rgb], transparent: Option<u8>) -> Vec<u8> {
        let width = self.width;
        let mut output = vec![0u8; self.pixels.len()];

        // Rows are padded by one column either side so neighbours never need
        // bounds checks.
        let mut current = vec![[0f32; 3]; width + 2];
        let mut next = vec![[0f32; 3]; width + 2];

        for y in 0..self.height {
            for x in 0..width {
                let offset = y * width + x;
                let Some(&source) = self.pixels.get(offset) else {
                    break;
                };

                if self.is_transparent(source) {
                    output[offset] = transparent.unwrap_or(0);
                    continue;
                }

                let original = self.color_of(source);
                let carried = current[x + 1];
                let wanted = [
                    (original[0] as f32 + carried[0]).clamp(0.0, 255.0),
                    (original[1] as f32 + carried[1]).clamp(0.0, 255.0),
                    (original[2] as f32 + carried[2]).clamp(0.0, 255.0),
                ];

                let chosen = nearest(palette, wanted);
                output[offset] = chosen as u8;

                let actual = palette[chosen];
                for channel in 0..3 {
                    let error = wanted[channel] - actual[channel] as f32;
                    current[x + 2][channel] += error * 7.0 / 16.0;
                    next[x][channel] += error * 3.0 / 16.0;
                    next[x + 1][channel] += error * 5.0 / 16.0;
                    next[x + 2][channel] += error * 1.0 / 16.0;
                }
            }

            std::mem::swap(&mut current, &mut next);
            next.iter_mut().for_each(|cell| *cell = [0.0; 3]);
        }

        output
    }
}

/// Index of the palette entry closest to `color` (squared Euclidean distance)
fn nearest(palette: &[Rgb], color: [f32; 3]) -> usize {
    let mut best = 0;
    let mut best_distance = f32::MAX;
    for (index, candidate) in palette.iter().enumerate() {
        let distance: f32 = (0..3)
            .map(|c| {
                let d = color[c] - candidate[c] as f32;
                d * d
            })
            .sum();
        if distance < best_distance {
            best = index;
            best_distance = distance;
        }
    }
    best
}

/// Weighted median cut: split the color box with the widest channel range at
/// its pixel-weighted median until `budget` boxes exist (or none can split),
/// then average each box.
fn median_cut(histogram: &[(Rgb, u32)], budget: usize) -> Vec<Rgb> {
    if histogram.len() <= budget {
        return histogram.iter().map(|(color, _)| *color).collect();
    }

    let mut boxes: Vec<Vec<(Rgb, u32)>> = vec![histogram.to_vec()];

    while boxes.len() < budget {
        let widest = boxes
            .iter()
            .enumerate()
            .filter(|(_, colors)| colors.len() > 1)
            .map(|(index, colors)| (index, widest_channel(colors)))
            .max_by_key(|(_, (_, range))| *range);

        let Some((index, (channel, _))) = widest else {
            break;
        };

        let mut colors = boxes.swap_remove(index);
        colors.sort_by_key(|(color, _)| color[channel]);

        let total: u64 = colors.iter().map(|(_, count)| *count as u64).sum();
        let mut running = 0u64;
        let mut split = 1;
        for (position, (_, count)) in colors.iter().enumerate() {
            running += *count as u64;
            if running * 2 >= total {
                split = (position + 1).clamp(1, colors.len() - 1);
                break;
            }
        }

        let upper = colors.split_off(split);
        boxes.push(colors);
        boxes.push(upper);
    }

    boxes.iter().map(|colors| average(colors)).collect()
}

/// The channel with the largest value spread, and that spread
fn widest_channel(colors: &[(Rgb, u32)]) -> (usize, u8) {
    (0..3)
        .map(|channel| {
            let (min, max) = colors.iter().fold((u8::MAX, u8::MIN), |(lo, hi), (c, _)| {
                (lo.min(c[channel]), hi.max(c[channel]))
            });
            (channel, max - min)
        })
        .max_by_key(|(_, range)| *range)
        .unwrap_or((0, 0))
}

fn average(colors: &[(Rgb, u32)]) -> Rgb {
    let mut sums = [0u64; 3];
    let mut weight = 0u64;
    for (color, count) in colors {
        for channel in 0..3 {
            sums[channel] += color[channel] as u64 * *count as u64;
        }
        weight += *count as u64;
    }
    if weight == 0 {
        return [0, 0, 0];
    }
    [
        ((sums[0] + weight / 2) / weight) as u8,
        ((sums[1] + weight / 2) / weight) as u8,
        ((sums[2] + weight / 2) / weight) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A 20x10 image where every pixel has its own palette entry
    fn rainbow(colors: usize) -> PaletteImage {
        let palette: Vec<Rgb> = (0..colors)
            .map(|i| {
                let i = i as u32;
                [(i * 37 % 256) as u8, (i * 91 % 256) as u8, (i * 13 % 256) as u8]
            })
            .collect();
        let pixels = (0..200).map(|i| (i % colors) as u8).collect();
        PaletteImage {
            width: 20,
            height: 10,
            pixels,
            palette,
            transparent: None,
        }
    }

    #[test]
    fn test_reduce_respects_target() {
        let reduced = rainbow(200).reduce(25);
        assert!(reduced.palette.len() <= 25);
        assert_eq!(reduced.pixels.len(), 200);
        assert_eq!((reduced.width, reduced.height), (20, 10));
        assert!(reduced
            .pixels
            .iter()
            .all(|&index| (index as usize) < reduced.palette.len()));
    }

    #[test]
    fn test_reduce_keeps_few_colors_exact() {
        let image = PaletteImage {
            width: 2,
            height: 2,
            pixels: vec![0, 1, 1, 0],
            palette: vec![[255, 0, 0], [0, 0, 255], [9, 9, 9]],
            transparent: None,
        };
        let reduced = image.reduce(25);
        // Only the two used colors survive, and no error diffuses between exact matches.
        assert_eq!(reduced.palette, vec![[255, 0, 0], [0, 0, 255]]);
        assert_eq!(reduced.pixels, vec![0, 1, 1, 0]);
    }

    #[test]
    fn test_transparent_slot_is_reserved() {
        let mut image = rainbow(200);
        image.transparent = Some(0);
        let reduced = image.reduce(25);

        assert!(reduced.palette.len() <= 25);
        let transparent = reduced.transparent.expect("transparency preserved");
        assert_eq!(transparent as usize, reduced.palette.len() - 1);
        for (before, after) in image.pixels.iter().zip(&reduced.pixels) {
            assert_eq!(*before == 0, *after == transparent);
        }
    }

    #[test]
    fn test_fully_transparent_frame_keeps_nonempty_palette() {
        let image = PaletteImage {
            width: 3,
            height: 1,
            pixels: vec![4, 4, 4],
            palette: vec![[1, 1, 1]; 5],
            transparent: Some(4),
        };
        let reduced = image.reduce(2);
        assert_eq!(reduced.palette.len(), 2);
        assert_eq!(reduced.pixels, vec![1, 1, 1]);
    }

    #[test]
    fn test_dithering_mixes_palette_for_midtones() {
        // A flat mid grey reduced to black and white must dither into a mix of both.
        let mut palette: Vec<Rgb> = vec![[128, 128, 128]];
        palette.extend((0..40).map(|i| [i as u8, i as u8, i as u8]));
        palette.extend((0..40).map(|i| [255 - i as u8, 255 - i as u8, 255 - i as u8]));
        let mut pixels = vec![0u8; 64];
        pixels.extend(1..=80u8);
        let image = PaletteImage {
            width: 16,
            height: 9,
            pixels,
            palette,
            transparent: None,
        };

        let reduced = image.reduce(2);
        assert_eq!(reduced.palette.len(), 2);
        let grey_region = &reduced.pixels[..64];
        assert!(grey_region.contains(&0));
        assert!(grey_region.contains(&1));
    }

    #[test]
    fn test_packed_palette_round_trip() {
        let image = PaletteImage::from_packed(1, 1, vec![0], &[1, 2, 3, 4, 5, 6], None);
        assert_eq!(image.palette, vec![[1, 2, 3], [4, 5, 6]]);
        assert_eq!(image.packed_palette(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_median_cut_splits_into_budget() {
        let histogram: Vec<(Rgb, u32)> = (0..100u8).map(|i| ([i, 0, 0], 1)).collect();
        let palette = median_cut(&histogram, 4);
        assert_eq!(palette.len(), 4);
    }
}
