// encode.rs
//
// Copyright (c) 2026  flipbook developers
//
//! Container assembly
use crate::block::*;
use crate::diff::{Patch, Region};
use crate::error::{Error, Result};
use crate::palette::Plan;
use std::io::{self, Write};

/// One step of an animation: a changed patch shown for one or more frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    /// Changed patch
    patch: Patch,
    /// Number of frames the step covers
    span: u16,
}

impl Step {
    /// Create a step covering one frame
    pub fn with_patch(patch: Patch) -> Self {
        Step { patch, span: 1 }
    }

    /// Get the region of the canvas drawn
    pub fn region(&self) -> Region {
        self.patch.region
    }

    /// Get the palette indices of the region
    pub fn indices(&self) -> &[u8] {
        &self.patch.indices
    }

    /// Get the number of frames covered
    pub fn span(&self) -> u16 {
        self.span
    }

    /// Cover one more frame
    pub fn extend(&mut self) {
        self.span = self.span.saturating_add(1);
    }

    /// Get the delay time in centiseconds at a frame rate
    pub fn delay_time_cs(&self, fps: f32) -> u16 {
        let delay = (100.0 * f32::from(self.span) / fps).round();
        delay.min(f32::from(u16::MAX)) as u16
    }
}

/// Check that a frame rate is usable
pub(crate) fn check_fps(fps: f32) -> Result<()> {
    if fps.is_finite() && fps > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidFrameRate)
    }
}

/// Region of the file expected next
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Header,
    LogicalScreenDesc,
    GlobalColorTable,
    Looping,
    Frame,
    ImageDesc,
    ImageData,
    Done,
}

impl Stage {
    /// Get the stage following a block, if it is allowed here
    fn next(self, block: &Block) -> Option<Stage> {
        use self::Stage::*;
        match (self, block) {
            (Header, Block::Header(_)) => Some(LogicalScreenDesc),
            (LogicalScreenDesc, Block::LogicalScreenDesc(_)) => {
                Some(GlobalColorTable)
            }
            (GlobalColorTable, Block::GlobalColorTable(_)) => Some(Looping),
            (Looping, Block::Application(_)) => Some(Frame),
            (Frame, Block::GraphicControl(_)) => Some(ImageDesc),
            (Frame, Block::Trailer(_)) => Some(Done),
            (ImageDesc, Block::ImageDesc(_)) => Some(ImageData),
            (ImageData, Block::ImageData(_)) => Some(Frame),
            _ => None,
        }
    }
}

/// Block encoder.
///
/// Blocks must be encoded in file order: header, screen descriptor, global
/// color table, looping extension, then for each frame a graphic control,
/// image descriptor and image data, and finally the trailer.
pub struct BlockEnc<W: Write> {
    /// Writer for blocks
    writer: W,
    /// Expected stage
    stage: Stage,
}

impl<W: Write> BlockEnc<W> {
    /// Create a new block encoder
    pub fn new(writer: W) -> Self {
        BlockEnc {
            writer,
            stage: Stage::Header,
        }
    }

    /// Encode one block
    pub fn encode<B: Into<Block>>(&mut self, block: B) -> Result<()> {
        use crate::block::Block::*;
        let block = block.into();
        let stage = self
            .stage
            .next(&block)
            .ok_or(Error::InvalidBlockSequence)?;
        let w = &mut self.writer;
        match &block {
            Header(b) => b.format(w),
            LogicalScreenDesc(b) => b.format(w),
            GlobalColorTable(b) => b.format(w),
            Application(b) => b.format(w),
            GraphicControl(b) => b.format(w),
            ImageDesc(b) => b.format(w),
            ImageData(b) => b.format(w),
            Trailer(b) => b.format(w),
        }?;
        self.stage = stage;
        Ok(())
    }

    /// Check if the trailer has been encoded
    pub fn is_done(&self) -> bool {
        self.stage == Stage::Done
    }

    /// Get the inner writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl Header {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(b"GIF")?;
        w.write_all(&self.version())
    }
}

impl LogicalScreenDesc {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let mut buf = Vec::with_capacity(7);
        buf.extend_from_slice(&self.screen_width().to_le_bytes());
        buf.extend_from_slice(&self.screen_height().to_le_bytes());
        buf.push(self.flags());
        buf.push(self.background_color_idx());
        buf.push(self.pixel_aspect_ratio());
        w.write_all(&buf)
    }
}

impl GlobalColorTable {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(self.colors())
    }
}

impl Application {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&[BlockCode::Extension_.signature()])?;
        w.write_all(&[u8::from(ExtensionCode::Application_)])?;
        for c in self.app_data() {
            debug_assert!(c.len() < 256);
            w.write_all(&[c.len() as u8])?; // block size
            w.write_all(c)?;
        }
        w.write_all(&[0]) // block size
    }
}

impl GraphicControl {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let mut buf = Vec::with_capacity(8);
        buf.push(BlockCode::Extension_.signature());
        buf.push(ExtensionCode::GraphicControl_.into());
        buf.push(4); // block size
        buf.push(self.flags());
        buf.extend_from_slice(&self.delay_time_cs().to_le_bytes());
        buf.push(self.transparent_color_idx());
        buf.push(0); // block size
        w.write_all(&buf)
    }
}

impl ImageDesc {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let mut buf = Vec::with_capacity(10);
        buf.push(BlockCode::ImageDesc_.signature());
        buf.extend_from_slice(&self.left().to_le_bytes());
        buf.extend_from_slice(&self.top().to_le_bytes());
        buf.extend_from_slice(&self.width().to_le_bytes());
        buf.extend_from_slice(&self.height().to_le_bytes());
        buf.push(self.flags());
        w.write_all(&buf)
    }
}

impl ImageData {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(self.data())
    }
}

impl Trailer {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&[BlockCode::Trailer_.signature()])
    }
}

/// Assemble a complete GIF file in memory.
///
/// * `plan` Global color table plan.
/// * `width` / `height` Canvas size.
/// * `steps` Animation steps, in display order.
/// * `fps` Frames per second, for delay times.
/// * `loop_count` Number of times to loop (zero means forever).
///
/// Every step is drawn over the previous one (disposal "keep").
pub fn assemble(
    plan: &Plan,
    width: u16,
    height: u16,
    steps: &[Step],
    fps: f32,
    loop_count: u16,
) -> Result<Vec<u8>> {
    check_fps(fps)?;
    let image_sz: usize = steps.iter().map(|s| s.indices().len()).sum();
    let mut enc = BlockEnc::new(Vec::with_capacity(image_sz / 2 + 1024));
    enc.encode(Header::default())?;
    enc.encode(
        LogicalScreenDesc::default()
            .with_screen_width(width)
            .with_screen_height(height)
            .with_color_table(plan),
    )?;
    enc.encode(GlobalColorTable::with_plan(plan))?;
    enc.encode(Application::with_loop_count(loop_count))?;
    for (n, step) in steps.iter().enumerate() {
        let region = step.region();
        let right = u32::from(region.left) + u32::from(region.width);
        let bottom = u32::from(region.top) + u32::from(region.height);
        if region.is_empty()
            || right > u32::from(width)
            || bottom > u32::from(height)
            || step.indices().len() != region.len()
        {
            return Err(Error::FrameSizeMismatch);
        }
        // indices past the padded table may still be below the clear code
        if step.indices().iter().any(|i| usize::from(*i) >= plan.len()) {
            return Err(Error::SymbolOutOfRange);
        }
        let delay = step.delay_time_cs(fps);
        if delay < 2 {
            warn!("frame {}: delay of {} cs may not be honored", n, delay);
        }
        trace!("frame {}: {:?}, delay {} cs", n, region, delay);
        let mut control = GraphicControl::default();
        control.set_disposal_method(DisposalMethod::Keep);
        control.set_delay_time_cs(delay);
        enc.encode(control)?;
        enc.encode(ImageDesc::with_region(region))?;
        enc.encode(ImageData::compress(plan.min_code_size(), step.indices())?)?;
    }
    enc.encode(Trailer::default())?;
    let buf = enc.into_inner();
    debug!("assembled {} steps into {} bytes", steps.len(), buf.len());
    Ok(buf)
}
