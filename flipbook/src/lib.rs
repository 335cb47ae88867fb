// lib.rs      flipbook crate.
//
// Copyright (c) 2026  flipbook developers
//
//! Animated GIF encoder for indexed-color frames.
//!
//! Frames are diffed against the previous frame, so only the changed
//! rectangle of each one is compressed and stored.
#[macro_use]
extern crate log;

pub mod block;
pub mod diff;
mod encode;
mod error;
pub mod lzw;
pub mod pack;
pub mod palette;
mod private;

pub use crate::encode::{assemble, BlockEnc, Step};
pub use crate::error::{Error, Result};
pub use crate::private::{Encoder, FileEncoder, Frame, IdenticalFrames};
