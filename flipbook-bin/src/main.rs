// main.rs      flipbook command
//
// Copyright (c) 2026  flipbook developers
//
#![forbid(unsafe_code)]

mod orbit;

use clap::{value_t, App, AppSettings, Arg, ArgMatches, SubCommand};
use flipbook::{FileEncoder, Frame, IdenticalFrames, Step};
use std::error::Error;
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Crate version
const VERSION: &str = std::env!("CARGO_PKG_VERSION");

/// Main entry point
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::builder().format_timestamp(None).init();
    let mut out = StandardStream::stdout(ColorChoice::Auto);
    match create_app().get_matches().subcommand() {
        ("orbit", Some(matches)) => render_orbit(&mut out, matches)?,
        _ => unreachable!(),
    }
    out.reset()?;
    Ok(())
}

/// Create clap App
fn create_app() -> App<'static, 'static> {
    App::new("flipbook")
        .version(VERSION)
        .setting(AppSettings::GlobalVersion)
        .about("GIF animation renderer")
        .setting(AppSettings::ArgRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("orbit")
                .about("Render orbiting circles")
                .arg(
                    Arg::with_name("output")
                        .required(true)
                        .help("output file"),
                )
                .arg(
                    Arg::with_name("fps")
                        .long("fps")
                        .takes_value(true)
                        .default_value("15")
                        .help("frames per second"),
                )
                .arg(
                    Arg::with_name("frames")
                        .long("frames")
                        .takes_value(true)
                        .help("number of frames (default: one orbit)"),
                )
                .arg(
                    Arg::with_name("loops")
                        .long("loops")
                        .takes_value(true)
                        .default_value("0")
                        .help("loop count (0: forever)"),
                )
                .arg(
                    Arg::with_name("identical")
                        .long("identical")
                        .takes_value(true)
                        .possible_values(&["pixel", "extend", "reject"])
                        .default_value("pixel")
                        .help("handling of identical frames"),
                ),
        )
}

/// Handle orbit subcommand
fn render_orbit(
    out: &mut StandardStream,
    matches: &ArgMatches,
) -> Result<(), Box<dyn Error>> {
    let path = matches.value_of_os("output").ok_or("no output file")?;
    let fps = value_t!(matches, "fps", f32).unwrap_or_else(|e| e.exit());
    let n_frames = if matches.is_present("frames") {
        value_t!(matches, "frames", usize).unwrap_or_else(|e| e.exit())
    } else {
        (std::f32::consts::PI * fps).ceil() as usize
    };
    let loops = value_t!(matches, "loops", u16).unwrap_or_else(|e| e.exit());
    let identical = match matches.value_of("identical") {
        Some("extend") => IdenticalFrames::ExtendDelay,
        Some("reject") => IdenticalFrames::Reject,
        _ => IdenticalFrames::EncodePixel,
    };
    let frames = orbit::render_frames(fps, n_frames)
        .iter()
        .map(Frame::with_raster)
        .collect::<Result<Vec<_>, _>>()?;
    let enc = FileEncoder::create(path)
        .with_fps(fps)
        .with_loop_count(loops)
        .with_identical_frames(identical);
    let steps = enc.encode(&orbit::palette(), &frames)?;
    show_steps(out, matches, &steps, fps, loops)
}

/// Show a table of encoded steps
fn show_steps(
    out: &mut StandardStream,
    matches: &ArgMatches,
    steps: &[Step],
    fps: f32,
    loops: u16,
) -> Result<(), Box<dyn Error>> {
    let mut magenta = ColorSpec::new();
    magenta.set_fg(Some(Color::Magenta));
    let mut yellow = ColorSpec::new();
    yellow.set_fg(Some(Color::Yellow)).set_intense(true);
    let mut dflt = ColorSpec::new();
    dflt.set_fg(Some(Color::White));
    let mut bold = ColorSpec::new();
    bold.set_fg(Some(Color::White))
        .set_intense(true)
        .set_bold(true);
    let n_frames: usize = steps.iter().map(|s| usize::from(s.span())).sum();
    let frame_digits = digits(n_frames).max(3);
    let size_digits = 4.max(1 + digits(orbit::WIDTH) + digits(orbit::HEIGHT));
    out.set_color(&magenta)?;
    if let Some(path) = matches.value_of_os("output") {
        writeln!(out, "{:?}", path)?;
    }
    out.set_color(&bold)?;
    write!(out, "GIF89a, frames: {}, steps: {}", n_frames, steps.len())?;
    write!(out, ", repeat: ")?;
    if loops == 0 {
        writeln!(out, "∞")?;
    } else {
        writeln!(out, "{}", loops)?;
    }
    out.set_color(&yellow)?;
    write!(out, "{:>w$}", "Fr#", w = frame_digits)?;
    write!(out, "  Delay")?;
    write!(out, " {:>w$}", "Size", w = size_digits)?;
    writeln!(out, " {:>w$}", "X,Y", w = size_digits)?;
    let mut number = 0;
    for step in steps {
        let region = step.region();
        out.set_color(&bold)?;
        write!(out, "{:>w$}", number, w = frame_digits)?;
        let d = step.delay_time_cs(fps);
        if step.span() > 1 {
            out.set_color(&yellow)?;
        } else {
            out.set_color(&dflt)?;
        }
        write!(out, " {:6.2}", f32::from(d) / 100.0)?;
        if region.width == orbit::WIDTH && region.height == orbit::HEIGHT {
            out.set_color(&dflt)?;
        } else {
            out.set_color(&bold)?;
        }
        write!(
            out,
            " {:>w$}",
            &format!("{}x{}", region.width, region.height),
            w = size_digits
        )?;
        if region.left == 0 && region.top == 0 {
            out.set_color(&dflt)?;
        } else {
            out.set_color(&bold)?;
        }
        writeln!(
            out,
            " {:>w$}",
            &format!("{},{}", region.left, region.top),
            w = size_digits
        )?;
        number += usize::from(step.span());
    }
    Ok(())
}

/// Calculate digits in a number
fn digits<T: Into<usize>>(v: T) -> usize {
    let v = v.into();
    match v {
        0..=9 => 1,
        10..=99 => 2,
        100..=999 => 3,
        1000..=9999 => 4,
        _ => 5,
    }
}
