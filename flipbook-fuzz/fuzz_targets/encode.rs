// cargo fuzz run encode corpus/encode -- -timeout=30

#![no_main]

use libfuzzer_sys::fuzz_target;
use pix::{Palette, rgb::SRgb8};

use flipbook::{Encoder, Frame, IdenticalFrames};

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let width = u16::from(data[0] % 16) + 1;
    let height = u16::from(data[1] % 16) + 1;
    let mut palette = Palette::new(256);
    for i in 0..=data[2] {
        palette.set_entry(SRgb8::new(i, i.wrapping_mul(7), i.wrapping_mul(13)));
    }
    let identical = match data[3] % 3 {
        0 => IdenticalFrames::EncodePixel,
        1 => IdenticalFrames::ExtendDelay,
        _ => IdenticalFrames::Reject,
    };
    let len = usize::from(width) * usize::from(height);
    let frames: Vec<Frame> = data[4..]
        .chunks(len)
        .map(|c| Frame::with_indices(width, height, c.to_vec()))
        .collect();
    let mut enc = Encoder::new(vec![]).with_identical_frames(identical);
    if enc.encode(&palette, &frames).is_ok() {
        let gif = enc.into_inner();
        assert_eq!(&gif[..6], b"GIF89a");
        assert_eq!(gif.last(), Some(&0x3B));
    }
});
