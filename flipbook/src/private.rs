// private.rs
//
// Copyright (c) 2026  flipbook developers
//
//! Private module for top-level items
use crate::{
    diff::{diff, Patch, Region},
    encode::{assemble, check_fps, Step},
    palette::Plan,
    Error, Result,
};
use pix::{
    gray::{Gray, Gray8},
    rgb::SRgb8,
    Palette, Raster,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// One frame of an animation, as palette indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Width in pixels
    width: u16,
    /// Height in pixels
    height: u16,
    /// Row-major palette indices
    indices: Vec<u8>,
}

impl Frame {
    /// Create a frame from row-major palette indices.
    ///
    /// The length of `indices` is checked when the frame is encoded.
    pub fn with_indices(width: u16, height: u16, indices: Vec<u8>) -> Self {
        Frame {
            width,
            height,
            indices,
        }
    }

    /// Create a frame from an indexed raster.
    ///
    /// Each gray value is a palette index.
    pub fn with_raster(raster: &Raster<Gray8>) -> Result<Self> {
        let width = u16::try_from(raster.width())
            .map_err(|_| Error::InvalidFrameDimensions)?;
        let height = u16::try_from(raster.height())
            .map_err(|_| Error::InvalidFrameDimensions)?;
        let indices = raster
            .pixels()
            .iter()
            .map(|p| u8::from(Gray::value(*p)))
            .collect();
        Ok(Frame::with_indices(width, height, indices))
    }

    /// Get the width
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Get the height
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Get the palette indices
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }
}

/// Handling of a frame identical to the one before it
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IdenticalFrames {
    /// Redraw the top-left pixel, keeping the frame's own delay
    #[default]
    EncodePixel,
    /// Show the previous step for one more frame
    ExtendDelay,
    /// Fail with [Error::DegenerateDiff]
    Reject,
}

/// Encoding settings shared by the encoders
#[derive(Clone, Copy, Debug)]
struct Config {
    /// Frames per second
    fps: f32,
    /// Number of loops (zero means forever)
    loop_count: u16,
    /// Identical frame handling
    identical: IdenticalFrames,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            fps: 10.0,
            loop_count: 0,
            identical: IdenticalFrames::default(),
        }
    }
}

impl Config {
    /// Encode an animation into an in-memory file
    fn encode(
        &self,
        palette: &Palette,
        frames: &[Frame],
    ) -> Result<(Vec<u8>, Vec<Step>)> {
        check_fps(self.fps)?;
        let (width, height) = check_frames(frames)?;
        let colors: Vec<SRgb8> =
            (0..palette.len()).filter_map(|i| palette.entry(i)).collect();
        let plan = Plan::new(&colors)?;
        let len = plan.len();
        if frames
            .iter()
            .any(|f| f.indices.iter().any(|i| usize::from(*i) >= len))
        {
            return Err(Error::SymbolOutOfRange);
        }
        let steps = self.steps(frames, width, height)?;
        let buf =
            assemble(&plan, width, height, &steps, self.fps, self.loop_count)?;
        Ok((buf, steps))
    }

    /// Make animation steps from frames
    fn steps(
        &self,
        frames: &[Frame],
        width: u16,
        height: u16,
    ) -> Result<Vec<Step>> {
        let mut steps: Vec<Step> = Vec::with_capacity(frames.len());
        let mut prev: Option<&[u8]> = None;
        for (n, frame) in frames.iter().enumerate() {
            let curr = frame.indices();
            match diff(prev, curr, width, height) {
                Some(patch) => steps.push(Step::with_patch(patch)),
                None => {
                    debug!("frame {} identical to previous", n);
                    match self.identical {
                        IdenticalFrames::EncodePixel => {
                            let region = Region::with_canvas(1, 1);
                            let indices = curr[..1].to_vec();
                            let patch = Patch { region, indices };
                            steps.push(Step::with_patch(patch));
                        }
                        IdenticalFrames::ExtendDelay => {
                            if let Some(step) = steps.last_mut() {
                                step.extend();
                            }
                        }
                        IdenticalFrames::Reject => {
                            return Err(Error::DegenerateDiff)
                        }
                    }
                }
            }
            prev = Some(curr);
        }
        Ok(steps)
    }
}

/// Check frame dimensions, returning the canvas size
fn check_frames(frames: &[Frame]) -> Result<(u16, u16)> {
    let first = frames.first().ok_or(Error::NoFrames)?;
    let (width, height) = (first.width, first.height);
    if width == 0 || height == 0 {
        return Err(Error::InvalidFrameDimensions);
    }
    let len = usize::from(width) * usize::from(height);
    for frame in frames {
        if frame.width != width
            || frame.height != height
            || frame.indices.len() != len
        {
            return Err(Error::FrameSizeMismatch);
        }
    }
    Ok((width, height))
}

/// GIF animation encoder
///
/// The whole file is assembled in memory, then written with one call.
/// Nothing is written if encoding fails.
///
/// ## Encoding Example
/// ```
/// use flipbook::{Encoder, Frame};
/// use pix::{gray::Gray8, Palette, Raster, rgb::SRgb8};
/// use std::error::Error;
///
/// fn main() -> Result<(), Box<dyn Error>> {
///     let mut frames = vec![];
///     for i in 0..4 {
///         let mut raster = Raster::<Gray8>::with_clear(4, 4);
///         *raster.pixel_mut(i, i) = Gray8::new(1);
///         frames.push(Frame::with_raster(&raster)?);
///     }
///     let mut palette = Palette::new(2);
///     palette.set_entry(SRgb8::new(0xFF, 0, 0));
///     palette.set_entry(SRgb8::new(0xFF, 0xFF, 0));
///     let mut enc = Encoder::new(vec![]).with_fps(4.0);
///     let steps = enc.encode(&palette, &frames)?;
///     assert_eq!(steps.len(), 4);
///     let gif = enc.into_inner();
///     assert_eq!(&gif[..6], b"GIF89a");
///     Ok(())
/// }
/// ```
pub struct Encoder<W: Write> {
    /// Writer for output data
    writer: W,
    /// Encoding settings
    config: Config,
}

impl<W: Write> Encoder<W> {
    /// Create a new GIF encoder.
    pub fn new(writer: W) -> Self {
        Encoder {
            writer,
            config: Config::default(),
        }
    }

    /// Set the frame rate, in frames per second.
    pub fn with_fps(mut self, fps: f32) -> Self {
        self.config.fps = fps;
        self
    }

    /// Set the number of times to loop (zero means forever).
    pub fn with_loop_count(mut self, loop_count: u16) -> Self {
        self.config.loop_count = loop_count;
        self
    }

    /// Set handling of frames identical to the previous frame.
    pub fn with_identical_frames(mut self, identical: IdenticalFrames) -> Self {
        self.config.identical = identical;
        self
    }

    /// Encode an animation.
    ///
    /// * `palette` Colors for the frame indices.
    /// * `frames` Frames, all the same size.
    ///
    /// Returns the steps which were encoded.
    pub fn encode(
        &mut self,
        palette: &Palette,
        frames: &[Frame],
    ) -> Result<Vec<Step>> {
        let (buf, steps) = self.config.encode(palette, frames)?;
        self.writer.write_all(&buf)?;
        self.writer.flush()?;
        Ok(steps)
    }

    /// Get the inner writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// GIF animation file encoder
///
/// The file is written to a temporary file in the same directory, then
/// renamed into place.  The destination is left untouched if encoding fails.
pub struct FileEncoder {
    /// Destination path
    path: PathBuf,
    /// Encoding settings
    config: Config,
}

impl FileEncoder {
    /// Create a file encoder for a path.
    pub fn create<P: AsRef<Path>>(path: P) -> Self {
        FileEncoder {
            path: path.as_ref().to_path_buf(),
            config: Config::default(),
        }
    }

    /// Set the frame rate, in frames per second.
    pub fn with_fps(mut self, fps: f32) -> Self {
        self.config.fps = fps;
        self
    }

    /// Set the number of times to loop (zero means forever).
    pub fn with_loop_count(mut self, loop_count: u16) -> Self {
        self.config.loop_count = loop_count;
        self
    }

    /// Set handling of frames identical to the previous frame.
    pub fn with_identical_frames(mut self, identical: IdenticalFrames) -> Self {
        self.config.identical = identical;
        self
    }

    /// Get the destination path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Encode an animation to the file.
    pub fn encode(
        &self,
        palette: &Palette,
        frames: &[Frame],
    ) -> Result<Vec<Step>> {
        let (buf, steps) = self.config.encode(palette, frames)?;
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&buf)?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        debug!("wrote {:?}", self.path);
        Ok(steps)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io;

    fn palette(n: usize) -> Palette {
        let mut palette = Palette::new(n);
        for i in 0..n {
            palette.set_entry(SRgb8::new(i as u8, 0x80, 0xFF - i as u8));
        }
        palette
    }

    fn blank(n: usize) -> Vec<Frame> {
        vec![Frame::with_indices(4, 4, vec![0; 16]); n]
    }

    /// Writer which always fails
    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "broken"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn raster_frame() {
        let mut raster = Raster::<Gray8>::with_clear(3, 2);
        *raster.pixel_mut(2, 1) = Gray8::new(5);
        let frame = Frame::with_raster(&raster).unwrap();
        assert_eq!(frame.width(), 3);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.indices(), [0, 0, 0, 0, 0, 5]);
    }

    #[test]
    fn raster_too_large() {
        let raster = Raster::<Gray8>::with_clear(65536, 1);
        assert!(matches!(
            Frame::with_raster(&raster),
            Err(Error::InvalidFrameDimensions)
        ));
        let raster = Raster::<Gray8>::with_clear(1, 65536);
        assert!(matches!(
            Frame::with_raster(&raster),
            Err(Error::InvalidFrameDimensions)
        ));
        let raster = Raster::<Gray8>::with_clear(65535, 1);
        assert_eq!(Frame::with_raster(&raster).unwrap().width(), 65535);
    }

    #[test]
    fn identical_pixel() {
        let mut enc = Encoder::new(vec![]);
        let steps = enc.encode(&palette(2), &blank(3)).unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].region(), Region::with_canvas(4, 4));
        for step in &steps[1..] {
            assert_eq!(step.region(), Region::with_canvas(1, 1));
            assert_eq!(step.indices(), [0]);
            assert_eq!(step.span(), 1);
        }
        let gif = enc.into_inner();
        assert_eq!(gif.iter().filter(|b| **b == 0x2C).count(), 3);
        assert_eq!(gif.last(), Some(&0x3B));
    }

    #[test]
    fn identical_extend() {
        let mut enc = Encoder::new(vec![])
            .with_fps(20.0)
            .with_identical_frames(IdenticalFrames::ExtendDelay);
        let steps = enc.encode(&palette(2), &blank(3)).unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].span(), 3);
        assert_eq!(steps[0].delay_time_cs(20.0), 15);
        let gif = enc.into_inner();
        // graphic control extension follows the 6 color table bytes
        let gce = 13 + 6 + 19;
        assert_eq!(&gif[gce..gce + 6], [0x21, 0xF9, 0x04, 0x04, 15, 0]);
    }

    #[test]
    fn identical_reject() {
        let mut enc = Encoder::new(vec![])
            .with_identical_frames(IdenticalFrames::Reject);
        assert!(matches!(
            enc.encode(&palette(2), &blank(2)),
            Err(Error::DegenerateDiff)
        ));
        assert!(enc.into_inner().is_empty());
        // a single frame has nothing to compare
        let mut enc = Encoder::new(vec![])
            .with_identical_frames(IdenticalFrames::Reject);
        assert_eq!(enc.encode(&palette(2), &blank(1)).unwrap().len(), 1);
    }

    #[test]
    fn validation() {
        let pal = palette(4);
        let mut enc = Encoder::new(vec![]);
        assert!(matches!(enc.encode(&pal, &[]), Err(Error::NoFrames)));
        let empty = [Frame::with_indices(0, 4, vec![])];
        assert!(matches!(
            enc.encode(&pal, &empty),
            Err(Error::InvalidFrameDimensions)
        ));
        let frames = [
            Frame::with_indices(4, 4, vec![0; 16]),
            Frame::with_indices(4, 3, vec![0; 12]),
        ];
        assert!(matches!(
            enc.encode(&pal, &frames),
            Err(Error::FrameSizeMismatch)
        ));
        let short = [Frame::with_indices(4, 4, vec![0; 15])];
        assert!(matches!(
            enc.encode(&pal, &short),
            Err(Error::FrameSizeMismatch)
        ));
        let frames = [Frame::with_indices(2, 2, vec![0, 1, 2, 4])];
        assert!(matches!(
            enc.encode(&pal, &frames),
            Err(Error::SymbolOutOfRange)
        ));
        assert!(matches!(
            enc.encode(&Palette::new(4), &blank(1)),
            Err(Error::InvalidPalette)
        ));
        let mut enc = Encoder::new(vec![]).with_fps(0.0);
        assert!(matches!(
            enc.encode(&pal, &blank(1)),
            Err(Error::InvalidFrameRate)
        ));
        assert!(enc.into_inner().is_empty());
    }

    #[test]
    fn padded_palette_indices() {
        // three colors pad to four, so index 3 is allowed
        let frames = [Frame::with_indices(2, 2, vec![0, 1, 2, 3])];
        let mut enc = Encoder::new(vec![]);
        assert!(enc.encode(&palette(3), &frames).is_ok());
    }

    #[test]
    fn broken_writer() {
        let mut enc = Encoder::new(Broken);
        assert!(matches!(
            enc.encode(&palette(2), &blank(1)),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn loop_count() {
        let mut enc = Encoder::new(vec![]).with_loop_count(0x0102);
        enc.encode(&palette(2), &blank(1)).unwrap();
        let gif = enc.into_inner();
        let app = 13 + 6;
        assert_eq!(&gif[app + 14..app + 19], [3, 1, 0x02, 0x01, 0]);
    }

    #[test]
    fn file_encoder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anim.gif");
        let mut frames = blank(2);
        frames[1] = Frame::with_indices(4, 4, vec![1; 16]);
        let enc = FileEncoder::create(&path).with_fps(5.0);
        let steps = enc.encode(&palette(2), &frames).unwrap();
        assert_eq!(steps.len(), 2);
        let mut mem = Encoder::new(vec![]).with_fps(5.0);
        mem.encode(&palette(2), &frames).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), mem.into_inner());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn file_encoder_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anim.gif");
        std::fs::write(&path, b"previous").unwrap();
        let frames = [Frame::with_indices(2, 2, vec![0, 1, 2, 9])];
        let enc = FileEncoder::create(&path);
        assert!(matches!(
            enc.encode(&palette(4), &frames),
            Err(Error::SymbolOutOfRange)
        ));
        assert_eq!(std::fs::read(&path).unwrap(), b"previous");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
