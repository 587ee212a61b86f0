use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use serde::Serialize;
use std::fs::File;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::signal;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use k197_lib::busy::{BusyConfig, BusyIndicator};
use k197_lib::capture::CaptureLine;
use k197_lib::format::{LcdLayout, lcd_bytes, plot_value};
use k197_lib::framer::PacketFramer;
use k197_lib::reading::Measurement;
use k197_lib::{Charset, DecodedReading, Packet};

/// Decode Keithley 197(a) display-bus captures into readable readings.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Capture dumps to decode (raw byte streams with --raw). Reads stdin when empty.
    files: Vec<PathBuf>,
    /// Treat input as a raw bus byte stream and split it on the command preamble.
    #[arg(long)]
    raw: bool,
    /// Output layout.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Console)]
    format: OutputFormat,
    /// Glyph set for Ω and μ.
    #[arg(short, long, value_enum, default_value_t = CharsetArg::Unicode)]
    charset: CharsetArg,
    /// Animate the busy indicator in the corner of the LCD layout.
    #[arg(long)]
    busy: bool,
    /// Busy indicator frame interval while readings change, in milliseconds.
    #[arg(long, default_value_t = BusyConfig::default().active_ms)]
    busy_active_ms: u64,
    /// Busy indicator frame interval while the reading is steady, in milliseconds.
    #[arg(long, default_value_t = BusyConfig::default().idle_ms)]
    busy_idle_ms: u64,
    /// Optional path to a file to write logs to, in addition to stderr.
    #[arg(short, long)]
    log_file: Option<PathBuf>,
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One line per packet: mode | digits units
    Console,
    /// The two rows of a 16x2 character LCD
    Lcd,
    /// One JSON object per packet
    Json,
    /// `time_ms,value` pairs for plotting
    Plot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CharsetArg {
    Unicode,
    Lcd,
}

impl From<CharsetArg> for Charset {
    fn from(arg: CharsetArg) -> Self {
        match arg {
            CharsetArg::Unicode => Charset::Unicode,
            CharsetArg::Lcd => Charset::Lcd,
        }
    }
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    timestamp_ms: Option<f64>,
    #[serde(flatten)]
    reading: &'a DecodedReading,
    value: Option<f64>,
    /// Reading in V, A or Ω
    si_value: Option<f64>,
    si_unit: Option<&'static str>,
    aligned: bool,
}

impl<'a> JsonRecord<'a> {
    fn new(packet: &Packet, reading: &'a DecodedReading, timestamp_ms: Option<f64>) -> Self {
        let measurement = Measurement::from_packet(packet);
        Self {
            timestamp_ms,
            reading,
            value: plot_value(&reading.digits),
            si_value: measurement.map(|m| m.si_value()),
            si_unit: measurement.map(|m| m.base_symbol()),
            aligned: packet.is_aligned(),
        }
    }
}

fn setup_logging(log_file_path: Option<&PathBuf>, verbosity: &Verbosity<InfoLevel>) -> Result<Option<WorkerGuard>> {
    // stdout carries the decoded readings
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    let (file_layer, guard) = if let Some(path) = log_file_path {
        let log_file =
            File::create(path).with_context(|| format!("Failed to create log file at: {:?}", path))?;
        let (non_blocking_writer, guard) = tracing_appender::non_blocking(log_file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking_writer)
            .with_ansi(false)
            .with_target(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    let filter = EnvFilter::builder()
        .with_default_directive(verbosity.tracing_level_filter().into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    if let Some(path) = log_file_path {
        info!("Logging to file: {:?}", path);
    }

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = setup_logging(cli.log_file.as_ref(), &cli.verbose)?;

    tokio::select! {
        res = run(cli) => {
            if let Err(e) = res {
                error!("Decoding failed: {:?}", e);
                process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            info!("Ctrl+C received, shutting down.");
        }
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let mut output = Output::new(&cli);

    if cli.files.is_empty() {
        debug!("Reading from stdin");
        decode_stream(tokio::io::stdin(), cli.raw, &mut output).await?;
    } else {
        for path in &cli.files {
            info!(?path, "Decoding capture");
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open capture {:?}", path))?;
            decode_stream(file, cli.raw, &mut output)
                .await
                .with_context(|| format!("Failed to read capture {:?}", path))?;
        }
    }

    output.finish();
    Ok(())
}

async fn decode_stream<R: AsyncRead + Unpin>(reader: R, raw: bool, output: &mut Output) -> Result<()> {
    if raw {
        decode_raw(reader, output).await
    } else {
        decode_dump(reader, output).await
    }
}

async fn decode_dump<R: AsyncRead + Unpin>(reader: R, output: &mut Output) -> Result<()> {
    let mut lines = BufReader::new(reader).lines();
    let mut line_number = 0;
    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        match CaptureLine::parse(line_number, &line) {
            Ok(Some(capture)) => output.emit(&capture.packet, capture.timestamp_ms),
            Ok(None) => {}
            Err(e) => {
                warn!("Skipping line: {}", e);
                output.skipped += 1;
            }
        }
    }
    Ok(())
}

async fn decode_raw<R: AsyncRead + Unpin>(mut reader: R, output: &mut Output) -> Result<()> {
    let mut framer = PacketFramer::new();
    let mut buf = vec![0u8; 4096];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        framer.push(&buf[..n]);
        while let Some(packet) = framer.next_packet() {
            output.emit(&packet, None);
        }
    }
    if framer.buffered() > 0 {
        debug!(bytes = framer.buffered(), "Incomplete packet at end of stream");
    }
    output.discarded += framer.discarded();
    Ok(())
}

/// Renders packets in the selected layout and keeps the run statistics.
struct Output {
    format: OutputFormat,
    charset: Charset,
    layout: LcdLayout,
    busy: Option<(BusyIndicator, BusyConfig)>,
    started: Instant,
    previous: Option<DecodedReading>,
    packets: usize,
    corrupted: usize,
    unaligned: usize,
    skipped: usize,
    discarded: usize,
}

impl Output {
    fn new(cli: &Cli) -> Self {
        let busy = cli.busy.then(|| {
            let config = BusyConfig {
                active_ms: cli.busy_active_ms,
                idle_ms: cli.busy_idle_ms,
            };
            (BusyIndicator::new(Duration::ZERO), config)
        });
        Self {
            format: cli.format,
            charset: cli.charset.into(),
            layout: LcdLayout::default(),
            busy,
            started: Instant::now(),
            previous: None,
            packets: 0,
            corrupted: 0,
            unaligned: 0,
            skipped: 0,
            discarded: 0,
        }
    }

    fn emit(&mut self, packet: &Packet, timestamp_ms: Option<f64>) {
        self.packets += 1;
        if !packet.is_aligned() {
            self.unaligned += 1;
            debug!(%packet, "Packet does not start with the command preamble");
        }

        let reading = DecodedReading::decode(packet, self.charset);
        if reading.is_corrupted() {
            self.corrupted += 1;
            warn!(digits = %reading.digits, "Unknown segment pattern, capture may be out of phase");
        }

        match self.format {
            OutputFormat::Console => match timestamp_ms {
                Some(t) => println!("{:>10.1} {}", t, reading),
                None => println!("{}", reading),
            },
            OutputFormat::Lcd => {
                let [top, bottom] = self.lcd_lines(&reading);
                if self.charset == Charset::Lcd {
                    debug!(top = %rom_hex(&top), bottom = %rom_hex(&bottom), "LCD ROM bytes");
                }
                println!("┌────────────────┐");
                println!("│{}│", top);
                println!("│{}│", bottom);
                println!("└────────────────┘");
            }
            OutputFormat::Json => {
                let record = JsonRecord::new(packet, &reading, timestamp_ms);
                match serde_json::to_string(&record) {
                    Ok(json) => println!("{}", json),
                    Err(e) => error!("Failed to serialize reading: {}", e),
                }
            }
            OutputFormat::Plot => {
                if let Some(value) = plot_value(&reading.digits) {
                    let t = timestamp_ms.unwrap_or_else(|| self.started.elapsed().as_secs_f64() * 1000.0);
                    println!("{:.1},{}", t, value);
                }
            }
        }

        self.previous = Some(reading);
    }

    fn lcd_lines(&mut self, reading: &DecodedReading) -> [String; 2] {
        let Some((indicator, config)) = self.busy.as_mut() else {
            return self.layout.lines(reading);
        };
        let idle = self.previous.as_ref() == Some(reading);
        *indicator = indicator.step(self.started.elapsed(), idle, config);
        self.layout.lines_with_busy(reading, indicator.glyph)
    }

    fn finish(&self) {
        info!(
            packets = self.packets,
            corrupted = self.corrupted,
            unaligned = self.unaligned,
            skipped_lines = self.skipped,
            discarded_bytes = self.discarded,
            "Finished decoding"
        );
    }
}

/// Hex dump of a row as the character ROM codes a controller would receive.
fn rom_hex(line: &str) -> String {
    hex::encode_upper(lcd_bytes(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use k197_lib::constants::{COMMAND_PREAMBLE, PACKET_SIZE};

    fn packet(mode: u8, digits: [u8; 6], units: u8) -> Packet {
        let mut bytes = [0u8; PACKET_SIZE];
        bytes[..8].copy_from_slice(&COMMAND_PREAMBLE);
        bytes[8] = mode;
        bytes[9..15].copy_from_slice(&digits);
        bytes[15] = units;
        Packet::new(bytes)
    }

    #[test]
    fn json_record_carries_si_value() {
        // 1.23456 mV, AUTO
        let packet = packet(0b0000_0001, [0xC0, 0x7A | 0x04, 0x7A, 0xF8, 0xD1, 0xB9], 0b0000_1001);
        let reading = DecodedReading::decode(&packet, Charset::Unicode);
        let json = serde_json::to_value(JsonRecord::new(&packet, &reading, Some(12.5))).unwrap();

        assert_eq!(json["digits"], " 1.22345");
        assert_eq!(json["units"], "mV   ");
        assert_eq!(json["value"], 1.22345);
        assert_eq!(json["si_unit"], "V");
        assert!((json["si_value"].as_f64().unwrap() - 0.00122345).abs() < 1e-12);
        assert_eq!(json["timestamp_ms"], 12.5);
        assert_eq!(json["aligned"], true);
    }

    #[test]
    fn json_record_without_unit() {
        let packet = packet(0, [0xEB; 6], 0);
        let reading = DecodedReading::decode(&packet, Charset::Unicode);
        let json = serde_json::to_value(JsonRecord::new(&packet, &reading, None)).unwrap();

        assert_eq!(json["value"], 0.0);
        assert!(json["si_value"].is_null());
        assert!(json["si_unit"].is_null());
    }

    #[test]
    fn rom_hex_uses_lcd_glyphs() {
        assert_eq!(rom_hex(" k\u{f4} "), "206BF420");
        assert_eq!(rom_hex("μA"), "E441");
    }
}
