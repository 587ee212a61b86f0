use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::warn;

use k197_lib::capture::{CaptureLine, parse_capture, read_capture};
use k197_lib::mode::ModeFlags;
use k197_lib::segment::{decode_segment, has_dot};
use k197_lib::units::Unit;
use k197_lib::{Charset, Packet, get_digits, get_units};

/// Print the status bytes of each packet in binary, with the flags they set.
///
/// Useful when mapping a new range or annunciator: run the meter through
/// its modes and watch which bits move.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Capture dump to read. Reads stdin when omitted.
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt().with_writer(std::io::stderr).with_target(false).init();

    let captures = load(cli.file.as_deref())?;
    for capture in &captures {
        print_packet(capture.line, &capture.packet);
    }
    if captures.is_empty() {
        warn!("No packets in input");
    }
    Ok(())
}

fn load(file: Option<&Path>) -> Result<Vec<CaptureLine>> {
    match file {
        Some(path) => read_capture(path).with_context(|| format!("Failed to decode {:?}", path)),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            parse_capture(&text).context("Failed to parse capture dump")
        }
    }
}

fn print_packet(line: usize, packet: &Packet) {
    let flags = ModeFlags::from_packet(packet);
    let merged = packet.merged_units();

    println!("── line {} ──{}", line, if packet.is_aligned() { "" } else { " (not aligned)" });
    println!("  mode   {:08b}  {}", packet.mode_byte(), mode_labels(&flags).join(" "));
    println!("  units  {:08b}", packet.units_byte());
    println!(
        "  unit2  {:08b}  {}",
        packet.units2_byte(),
        [(flags.cal, "CAL"), (flags.remote, "RMT")]
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, name)| *name)
            .collect::<Vec<_>>()
            .join(" ")
    );
    println!(
        "  merged {:08b}  {}",
        merged.raw(),
        Unit::decode(merged).map_or_else(|| "-".to_string(), |unit| unit.to_string())
    );
    println!("  digits {}", hex::encode_upper(packet.digit_codes()));
    let glyphs: Vec<String> = packet
        .digit_codes()
        .iter()
        .map(|&code| {
            let dot = if has_dot(code) { "." } else { "" };
            format!("{:>2}", format!("{}{}", dot, decode_segment(code)))
        })
        .collect();
    println!("         {}", glyphs.join(""));
    println!(
        "  => {:?} {:?}",
        get_digits(packet, Charset::Unicode),
        get_units(packet, Charset::Unicode)
    );
}

fn mode_labels(flags: &ModeFlags) -> Vec<&'static str> {
    [
        (flags.negative, "NEG"),
        (flags.battery, "BAT"),
        (flags.rcl, "RCL"),
        (flags.ac, "AC"),
        (flags.db, "dB"),
        (flags.sto, "STO"),
        (flags.rel, "REL"),
        (flags.auto, "AUTO"),
    ]
    .into_iter()
    .filter(|(on, _)| *on)
    .map(|(_, name)| name)
    .collect()
}
