use criterion::{Criterion, black_box, criterion_group, criterion_main};
use flipbook::{Encoder, Frame, lzw::Compressor};
use pix::{Palette, rgb::SRgb8};

const WIDTH: u16 = 160;
const HEIGHT: u16 = 120;

/// Make frames with a square moving across a striped background
fn make_frames(n: u16) -> Vec<Frame> {
    (0..n)
        .map(|f| {
            let mut indices = Vec::with_capacity(usize::from(WIDTH * HEIGHT));
            for y in 0..HEIGHT {
                for x in 0..WIDTH {
                    let inside = x >= f * 4 && x < f * 4 + 12 && y >= 40 && y < 52;
                    indices.push(if inside { 15 } else { ((y / 8) % 4) as u8 });
                }
            }
            Frame::with_indices(WIDTH, HEIGHT, indices)
        })
        .collect()
}

fn make_palette() -> Palette {
    let mut palette = Palette::new(16);
    for i in 0..16u8 {
        palette.set_entry(SRgb8::new(i * 16, 255 - i * 16, i * 8));
    }
    palette
}

fn compress(crit: &mut Criterion) {
    let frames = make_frames(1);
    crit.bench_function("compress", |b| {
        b.iter(|| {
            Compressor::new(4)
                .compress(black_box(frames[0].indices()))
                .unwrap()
        })
    });
}

fn encode_frames(crit: &mut Criterion) {
    let frames = make_frames(30);
    let palette = make_palette();
    crit.bench_function("encode_frames", |b| {
        b.iter(|| {
            let mut enc =
                Encoder::new(black_box(Vec::with_capacity(32768))).with_fps(15.0);
            enc.encode(&palette, black_box(&frames)).unwrap();
        })
    });
}

criterion_group!(benches, compress, encode_frames);
criterion_main!(benches);
