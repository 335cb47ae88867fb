// error.rs
//
// Copyright (c) 2026  flipbook developers
//
use std::fmt;
use std::io;

/// Errors encountered while encoding
#[derive(Debug)]
pub enum Error {
    /// A wrapped I/O error (writing to the sink failed).
    Io(io::Error),
    /// Palette is empty or has more than 256 colors.
    InvalidPalette,
    /// Frame width or height is zero or larger than 65535.
    InvalidFrameDimensions,
    /// Frame size differs from the first frame, or its index buffer does not
    /// match its width and height.
    FrameSizeMismatch,
    /// A pixel index is outside of the (padded) palette, or collides with a
    /// reserved LZW code.
    SymbolOutOfRange,
    /// Two consecutive frames are identical and the
    /// [IdenticalFrames](enum.IdenticalFrames.html) policy rejects them.
    DegenerateDiff,
    /// Frames per second is not a positive, finite number.
    InvalidFrameRate,
    /// No frames to encode.
    NoFrames,
    /// [Block](block/enum.Block.html)s encoded in invalid sequence.
    InvalidBlockSequence,
}

/// Flipbook result type
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(fmt),
            _ => fmt::Debug::fmt(self, fmt),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}
