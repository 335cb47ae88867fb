// block.rs
//
// Copyright (c) 2026  flipbook developers
//
//! Blocks within a GIF file
use crate::diff::Region;
use crate::error::Result;
use crate::lzw::Compressor;
use crate::pack::pack;
use crate::palette::Plan;

/// Application identifier for looping animations
const LOOPING_APP_ID: &[u8; 11] = b"NETSCAPE2.0";

/// Disposal method for a frame, applied before drawing the next one.
///
/// Frames are stored as patches over the previous frame, so it must stay
/// drawn.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum DisposalMethod {
    /// Leave the frame drawn
    #[default]
    Keep,
}

impl From<DisposalMethod> for u8 {
    fn from(d: DisposalMethod) -> Self {
        match d {
            DisposalMethod::Keep => 1,
        }
    }
}

/// Block codes (signatures)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum BlockCode {
    ImageDesc_,
    Extension_,
    Trailer_,
}

impl BlockCode {
    /// Get the block signature
    pub fn signature(self) -> u8 {
        use self::BlockCode::*;
        match self {
            ImageDesc_ => b',', // (0x2C) Image separator
            Extension_ => b'!', // (0x21) Extension introducer
            Trailer_ => b';',   // (0x3B) GIF trailer
        }
    }
}

/// Extension labels
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum ExtensionCode {
    GraphicControl_,
    Application_,
}

impl From<ExtensionCode> for u8 {
    fn from(t: ExtensionCode) -> Self {
        use self::ExtensionCode::*;
        match t {
            GraphicControl_ => 0xF9,
            Application_ => 0xFF,
        }
    }
}

/// Header block: signature and version
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    version: [u8; 3],
}

impl Default for Header {
    fn default() -> Self {
        // animation requires 89a extensions
        Header { version: *b"89a" }
    }
}

impl Header {
    /// Get the version
    pub fn version(&self) -> [u8; 3] {
        self.version
    }
}

/// Logical screen descriptor
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LogicalScreenDesc {
    screen_width: u16,
    screen_height: u16,
    flags: u8,
    background_color_idx: u8, // index into global color table
    pixel_aspect_ratio: u8,
}

impl LogicalScreenDesc {
    const COLOR_TABLE_PRESENT: u8 = 0b1000_0000;
    const COLOR_RESOLUTION: u8 = 0b0111_0000;
    const COLOR_TABLE_SIZE: u8 = 0b0000_0111;

    pub fn with_screen_width(mut self, screen_width: u16) -> Self {
        self.screen_width = screen_width;
        self
    }
    pub fn screen_width(&self) -> u16 {
        self.screen_width
    }
    pub fn with_screen_height(mut self, screen_height: u16) -> Self {
        self.screen_height = screen_height;
        self
    }
    pub fn screen_height(&self) -> u16 {
        self.screen_height
    }
    pub fn flags(&self) -> u8 {
        self.flags
    }
    /// Declare an (unsorted) global color table.
    ///
    /// Color resolution is set to the table bit depth.
    pub fn with_color_table(mut self, plan: &Plan) -> Self {
        let bits = plan.bit_depth() - 1;
        let mut flags = bits & Self::COLOR_TABLE_SIZE;
        flags |= (flags << 4) & Self::COLOR_RESOLUTION;
        flags |= Self::COLOR_TABLE_PRESENT;
        self.flags = flags;
        self
    }
    pub fn background_color_idx(&self) -> u8 {
        self.background_color_idx
    }
    pub fn pixel_aspect_ratio(&self) -> u8 {
        self.pixel_aspect_ratio
    }
}

/// Global color table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlobalColorTable {
    colors: Vec<u8>,
}

impl GlobalColorTable {
    /// Create a color table from a palette plan
    pub fn with_plan(plan: &Plan) -> Self {
        GlobalColorTable {
            colors: plan.rgb_bytes(),
        }
    }
    pub fn colors(&self) -> &[u8] {
        &self.colors
    }
}

/// Graphic control extension
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GraphicControl {
    flags: u8,
    delay_time_cs: u16, // delay in centiseconds (hundredths of a second)
    transparent_color_idx: u8,
}

impl GraphicControl {
    const DISPOSAL_METHOD: u8 = 0b0001_1100;

    pub fn flags(&self) -> u8 {
        self.flags
    }
    pub fn set_disposal_method(&mut self, disposal_method: DisposalMethod) {
        let d: u8 = disposal_method.into();
        self.flags = (self.flags & !Self::DISPOSAL_METHOD) | (d << 2);
    }
    pub fn delay_time_cs(&self) -> u16 {
        self.delay_time_cs
    }
    pub fn set_delay_time_cs(&mut self, delay_time_cs: u16) {
        self.delay_time_cs = delay_time_cs;
    }
    pub fn transparent_color_idx(&self) -> u8 {
        self.transparent_color_idx
    }
}

/// Application extension for looping
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Application {
    app_data: Vec<Vec<u8>>, // sequence of sub-blocks
}

impl Application {
    /// Create a looping extension.
    ///
    /// * `loop_count` Number of times to loop (zero means loop forever).
    pub fn with_loop_count(loop_count: u16) -> Self {
        let [lo, hi] = loop_count.to_le_bytes();
        let app_data = vec![LOOPING_APP_ID.to_vec(), vec![1, lo, hi]];
        Application { app_data }
    }
    pub fn app_data(&self) -> &[Vec<u8>] {
        &self.app_data
    }
    pub fn loop_count(&self) -> Option<u16> {
        match &self.app_data[..] {
            [id, data] if id[..] == LOOPING_APP_ID[..] && data.len() == 3 => {
                Some(u16::from_le_bytes([data[1], data[2]]))
            }
            _ => None,
        }
    }
}

/// Image descriptor
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImageDesc {
    left: u16,
    top: u16,
    width: u16,
    height: u16,
    flags: u8, // no local color table, not interlaced
}

impl ImageDesc {
    /// Create an image descriptor for a region of the screen
    pub fn with_region(region: Region) -> Self {
        ImageDesc {
            left: region.left,
            top: region.top,
            width: region.width,
            height: region.height,
            flags: 0,
        }
    }
    pub fn left(&self) -> u16 {
        self.left
    }
    pub fn top(&self) -> u16 {
        self.top
    }
    pub fn width(&self) -> u16 {
        self.width
    }
    pub fn height(&self) -> u16 {
        self.height
    }
    pub fn flags(&self) -> u8 {
        self.flags
    }
}

/// Compressed image data
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageData {
    data: Vec<u8>, // first byte of data is LZW minimum code size
}

impl ImageData {
    /// Compress palette indices into image data
    pub fn compress(min_code_size: u8, indices: &[u8]) -> Result<Self> {
        let words = Compressor::new(min_code_size).compress(indices)?;
        trace!("{} indices => {} codes", indices.len(), words.len());
        let data = pack(&words, min_code_size);
        Ok(ImageData { data })
    }
    pub fn min_code_size(&self) -> u8 {
        self.data[0]
    }
    /// Get the LZW minimum code size, sub-blocks and terminator
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Trailer (end of file)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Trailer {}

/// A block within a GIF file
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    Header(Header),
    LogicalScreenDesc(LogicalScreenDesc),
    GlobalColorTable(GlobalColorTable),
    Application(Application),
    GraphicControl(GraphicControl),
    ImageDesc(ImageDesc),
    ImageData(ImageData),
    Trailer(Trailer),
}

impl From<Header> for Block {
    fn from(b: Header) -> Self {
        Block::Header(b)
    }
}

impl From<LogicalScreenDesc> for Block {
    fn from(b: LogicalScreenDesc) -> Self {
        Block::LogicalScreenDesc(b)
    }
}

impl From<GlobalColorTable> for Block {
    fn from(b: GlobalColorTable) -> Self {
        Block::GlobalColorTable(b)
    }
}

impl From<Application> for Block {
    fn from(b: Application) -> Self {
        Block::Application(b)
    }
}

impl From<GraphicControl> for Block {
    fn from(b: GraphicControl) -> Self {
        Block::GraphicControl(b)
    }
}

impl From<ImageDesc> for Block {
    fn from(b: ImageDesc) -> Self {
        Block::ImageDesc(b)
    }
}

impl From<ImageData> for Block {
    fn from(b: ImageData) -> Self {
        Block::ImageData(b)
    }
}

impl From<Trailer> for Block {
    fn from(b: Trailer) -> Self {
        Block::Trailer(b)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pix::rgb::SRgb8;

    fn plan(n: usize) -> Plan {
        let colors: Vec<SRgb8> = (0..n).map(|i| SRgb8::new(i as u8, 0, 0)).collect();
        Plan::new(&colors).unwrap()
    }

    #[test]
    fn screen_flags() {
        let desc = LogicalScreenDesc::default().with_color_table(&plan(4));
        assert_eq!(desc.flags(), 0b1001_0001);
        let desc = LogicalScreenDesc::default().with_color_table(&plan(2));
        assert_eq!(desc.flags(), 0b1000_0000);
        let desc = LogicalScreenDesc::default().with_color_table(&plan(200));
        assert_eq!(desc.flags(), 0b1111_0111);
    }

    #[test]
    fn disposal_method() {
        let mut control = GraphicControl::default();
        assert_eq!(control.flags(), 0);
        control.set_disposal_method(DisposalMethod::Keep);
        assert_eq!(control.flags(), 0b0000_0100);
        control.set_disposal_method(DisposalMethod::default());
        assert_eq!(control.flags(), 0b0000_0100);
    }

    #[test]
    fn loop_count() {
        let b = Application::with_loop_count(0);
        assert_eq!(b.loop_count(), Some(0));
        let b = Application::with_loop_count(0x1234);
        assert_eq!(b.app_data()[1], [1, 0x34, 0x12]);
        assert_eq!(b.loop_count(), Some(0x1234));
    }

    #[test]
    fn image_data() {
        let data = ImageData::compress(2, &[1, 1, 1, 1, 1, 2, 2, 2, 2, 2])
            .unwrap();
        assert_eq!(data.min_code_size(), 2);
        assert_eq!(data.data(), [2, 4, 0x8C, 0x2D, 0x99, 0x05, 0]);
    }
}
