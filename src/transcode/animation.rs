//! Animated GIF re-encoding
//!
//! Frames are decoded as raw palette indices so per-frame metadata (delay,
//! disposal, offsets, transparency) passes through untouched. When the first
//! frame's color table is larger than the target, every frame is reduced with
//! [`PaletteImage::reduce`] and written with its own local table.

use std::borrow::Cow;
use std::io::Cursor;

use gif::{ColorOutput, DecodeOptions, Encoder, Frame, Repeat};

use super::error::TranscodeError;
use super::palette::PaletteImage;

const FORMAT: &str = "gif";

/// A fully decoded GIF: logical screen, global table and every frame
pub struct Animation {
    pub width: u16,
    pub height: u16,
    pub global_palette: Option<Vec<u8>>,
    pub repeat: Repeat,
    pub frames: Vec<Frame<'static>>,
}

impl Animation {
    /// Decode all frames of `data` as indexed pixels
    pub fn decode(data: &[u8]) -> Result<Self, TranscodeError> {
        let mut options = DecodeOptions::new();
        options.set_color_output(ColorOutput::Indexed);

        let mut decoder = options
            .read_info(Cursor::new(data))
            .map_err(|e| TranscodeError::decode_failure(FORMAT, e))?;

        let width = decoder.width();
        let height = decoder.height();
        let global_palette = decoder.global_palette().map(|palette| palette.to_vec());
        let repeat = decoder.repeat();

        let mut frames = Vec::new();
        while let Some(frame) = decoder
            .read_next_frame()
            .map_err(|e| TranscodeError::decode_failure(FORMAT, e))?
        {
            frames.push(frame.clone());
        }

        if frames.is_empty() {
            return Err(TranscodeError::decode_failure(FORMAT, "no image frames"));
        }

        Ok(Self {
            width,
            height,
            global_palette,
            repeat,
            frames,
        })
    }

    /// Number of entries in the color table the frame at `index` draws from
    pub fn palette_len(&self, index: usize) -> usize {
        self.frames
            .get(index)
            .and_then(|frame| frame.palette.as_deref().or(self.global_palette.as_deref()))
            .map(|palette| palette.len() / 3)
            .unwrap_or(0)
    }

    /// Reduce every frame to at most `target` colors if the first frame exceeds it
    ///
    /// Returns `false` (and leaves the animation untouched) when no reduction
    /// was needed.
    pub fn reduce_palettes(&mut self, target: usize) -> Result<bool, TranscodeError> {
        if target == 0 || self.palette_len(0) <= target {
            return Ok(false);
        }

        for frame in &mut self.frames {
            let table = frame
                .palette
                .as_deref()
                .or(self.global_palette.as_deref())
                .ok_or_else(|| TranscodeError::decode_failure(FORMAT, "frame has no color table"))?;

            let (width, height) = (frame.width as usize, frame.height as usize);
            if frame.buffer.len() != width * height {
                return Err(TranscodeError::decode_failure(
                    FORMAT,
                    format!(
                        "frame buffer holds {} pixels, expected {}x{}",
                        frame.buffer.len(),
                        width,
                        height
                    ),
                ));
            }

            let source = PaletteImage::from_packed(
                width,
                height,
                frame.buffer.to_vec(),
                table,
                frame.transparent,
            );
            let reduced = source.reduce(target);

            frame.palette = Some(reduced.packed_palette());
            frame.transparent = reduced.transparent;
            frame.buffer = Cow::Owned(reduced.pixels);
        }

        // Every frame now carries its own table.
        self.global_palette = None;
        Ok(true)
    }

    /// Encode all frames back into a single GIF stream
    pub fn encode(&self) -> Result<Vec<u8>, TranscodeError> {
        let mut output = Vec::new();
        {
            let global = self.global_palette.as_deref().unwrap_or(&[]);
            let mut encoder = Encoder::new(&mut output, self.width, self.height, global)
                .map_err(|e| TranscodeError::encode_failure(FORMAT, e))?;

            if self.frames.len() > 1 || self.repeat != Repeat::Finite(0) {
                encoder
                    .set_repeat(self.repeat)
                    .map_err(|e| TranscodeError::encode_failure(FORMAT, e))?;
            }

            for frame in &self.frames {
                encoder
                    .write_frame(frame)
                    .map_err(|e| TranscodeError::encode_failure(FORMAT, e))?;
            }
            // Dropping the encoder writes the trailer.
        }
        Ok(output)
    }
}

/// Decode, reduce to `target` colors when needed, and re-encode a GIF
pub fn transcode_gif(data: &[u8], target: usize) -> Result<Vec<u8>, TranscodeError> {
    let mut animation = Animation::decode(data)?;
    let reduced = animation.reduce_palettes(target)?;
    tracing::debug!(
        frames = animation.frames.len(),
        width = animation.width,
        height = animation.height,
        reduced,
        "re-encoding gif"
    );
    animation.encode()
}
