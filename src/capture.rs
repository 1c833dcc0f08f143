use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

/// Reorders a bottom-up RGBA8 readback into top-down rows.
pub fn flip_rows(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, CaptureError> {
    let row = width as usize * 4;

    if pixels.len() != row * height as usize {
        return Err(CaptureError::InvalidSrcLength);
    }

    if row == 0 {
        return Ok(Vec::new());
    }

    Ok(pixels.chunks_exact(row).rev().flatten().copied().collect())
}

pub fn encode_png<W: Write>(
    writer: W,
    pixels: &[u8],
    width: u32,
    height: u32,
) -> Result<(), CaptureError> {
    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(pixels)?;
    writer.finish()?;

    Ok(())
}

/// Writes a GL readback to `path` as a PNG.
pub fn write_out<P: AsRef<Path>>(
    path: P,
    gl_pixels: &[u8],
    width: u32,
    height: u32,
) -> Result<(), CaptureError> {
    let flipped = flip_rows(gl_pixels, width, height)?;

    let file = File::create(path)?;
    let writer = BufWriter::new(file);

    encode_png(writer, &flipped, width, height)
}

/// Holds a capture back until a number of frames have been presented.
#[derive(Debug)]
pub struct CaptureSchedule {
    warmup: u32,
    presented: u32,
}

impl CaptureSchedule {
    pub fn new(warmup: u32) -> Self {
        Self {
            warmup,
            presented: 0,
        }
    }

    pub fn frame_presented(&mut self) {
        self.presented = self.presented.saturating_add(1);
    }

    pub fn is_due(&self) -> bool {
        self.presented >= self.warmup
    }
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Invalid source data length")]
    InvalidSrcLength,
    #[error("could not create capture file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode capture: {0}")]
    Encoding(#[from] png::EncodingError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_two_rows() {
        #[rustfmt::skip]
        let bottom_up = [
            1, 1, 1, 255,  2, 2, 2, 255,
            3, 3, 3, 255,  4, 4, 4, 255,
        ];

        let top_down = flip_rows(&bottom_up, 2, 2).unwrap();

        assert_eq!(&top_down[..8], &bottom_up[8..]);
        assert_eq!(&top_down[8..], &bottom_up[..8]);
    }

    #[test]
    fn flip_rejects_wrong_length() {
        assert!(matches!(
            flip_rows(&[0; 7], 1, 2),
            Err(CaptureError::InvalidSrcLength)
        ));
    }

    #[test]
    fn capture_waits_for_presented_frames() {
        let mut schedule = CaptureSchedule::new(3);

        for _ in 0..3 {
            assert!(!schedule.is_due());
            schedule.frame_presented();
        }

        assert!(schedule.is_due());
    }

    #[test]
    fn no_warmup_captures_first_frame() {
        assert!(CaptureSchedule::new(0).is_due());
    }

    #[test]
    fn encoded_png_decodes_back() {
        let pixels = [255, 0, 0, 255, 0, 255, 255, 255];
        let mut out = Vec::new();

        encode_png(&mut out, &pixels, 2, 1).unwrap();

        let decoder = png::Decoder::new(out.as_slice());
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();

        assert_eq!((info.width, info.height), (2, 1));
        assert_eq!(info.color_type, png::ColorType::Rgba);
        assert_eq!(&buf[..info.buffer_size()], &pixels);
    }
}
