// diff.rs
//
// Copyright (c) 2026  flipbook developers
//
//! Frame differencing
//!
//! Since every frame is drawn over the previous one, only the rectangle of
//! pixels which changed needs to be encoded.

/// Rectangular region of the canvas
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Region {
    /// Left edge
    pub left: u16,
    /// Top edge
    pub top: u16,
    /// Width in pixels
    pub width: u16,
    /// Height in pixels
    pub height: u16,
}

/// Cropped indices of a changed region
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Patch {
    /// Region of the canvas covered
    pub region: Region,
    /// Row-major palette indices within the region
    pub indices: Vec<u8>,
}

impl Region {
    /// Create a region covering a full canvas
    pub fn with_canvas(width: u16, height: u16) -> Self {
        Region {
            left: 0,
            top: 0,
            width,
            height,
        }
    }

    /// Get the number of pixels in the region
    pub fn len(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Check if the region is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy the pixels of a canvas which fall within the region
    pub fn crop(&self, canvas: &[u8], canvas_width: u16) -> Vec<u8> {
        let stride = usize::from(canvas_width);
        let left = usize::from(self.left);
        let width = usize::from(self.width);
        let top = usize::from(self.top);
        let mut indices = Vec::with_capacity(self.len());
        for row in canvas.chunks_exact(stride).skip(top).take(self.height.into())
        {
            indices.extend_from_slice(&row[left..left + width]);
        }
        indices
    }
}

/// Bounds of changed pixels (inclusive)
#[derive(Clone, Copy, Debug)]
struct Bounds {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
}

impl Bounds {
    /// Create bounds containing one pixel
    fn new(x: usize, y: usize) -> Self {
        Bounds {
            x0: x,
            y0: y,
            x1: x,
            y1: y,
        }
    }

    /// Extend bounds to contain a pixel
    fn extend(&mut self, x: usize, y: usize) {
        self.x0 = self.x0.min(x);
        self.x1 = self.x1.max(x);
        self.y0 = self.y0.min(y);
        self.y1 = self.y1.max(y);
    }

    /// Convert to a region
    fn region(self) -> Region {
        // bounds lie within a canvas of u16 dimensions
        Region {
            left: self.x0 as u16,
            top: self.y0 as u16,
            width: (self.x1 - self.x0 + 1) as u16,
            height: (self.y1 - self.y0 + 1) as u16,
        }
    }
}

/// Find the changed patch between two frames.
///
/// * `prev` Previous frame, or `None` for the first frame.
/// * `curr` Current frame.
///
/// Both frames must contain `width * height` indices.  The first frame
/// always covers the whole canvas.  Returns `None` if the frames are
/// identical, since there is no changed region.
///
/// ```
/// use flipbook::diff::{diff, Region};
///
/// let prev = [0, 0, 0, 0, 0, 0, 0, 0, 0];
/// let curr = [0, 0, 0, 0, 1, 2, 0, 0, 0];
/// let patch = diff(Some(&prev[..]), &curr, 3, 3).unwrap();
/// assert_eq!(patch.region, Region { left: 1, top: 1, width: 2, height: 1 });
/// assert_eq!(patch.indices, [1, 2]);
/// ```
pub fn diff(
    prev: Option<&[u8]>,
    curr: &[u8],
    width: u16,
    height: u16,
) -> Option<Patch> {
    let stride = usize::from(width);
    debug_assert_eq!(curr.len(), stride * usize::from(height));
    let prev = match prev {
        Some(prev) => prev,
        None => {
            let region = Region::with_canvas(width, height);
            let indices = curr.to_vec();
            return Some(Patch { region, indices });
        }
    };
    debug_assert_eq!(prev.len(), curr.len());
    let mut bounds: Option<Bounds> = None;
    for (i, (p, c)) in prev.iter().zip(curr).enumerate() {
        if p != c {
            let (x, y) = (i % stride, i / stride);
            match &mut bounds {
                Some(b) => b.extend(x, y),
                None => bounds = Some(Bounds::new(x, y)),
            }
        }
    }
    let region = bounds?.region();
    let indices = region.crop(curr, width);
    Some(Patch { region, indices })
}
