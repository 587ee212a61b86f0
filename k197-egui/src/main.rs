use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};
use k197_lib::capture::CaptureLine;
use k197_lib::format::plot_value;
use k197_lib::{Charset, DecodedReading};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[derive(Debug, Clone)]
struct DataPoint {
    timestamp: f64,
    value: f64,
}

/// A decoded packet on its way from the reader task to the UI.
#[derive(Debug, Clone)]
struct Sample {
    timestamp_ms: Option<f64>,
    reading: DecodedReading,
}

struct PlotterApp {
    data_points: VecDeque<DataPoint>,
    data_receiver: mpsc::UnboundedReceiver<Sample>,
    start_time: Instant,
    last_reading: Option<DecodedReading>,
    corrupted: usize,
    max_points: usize,
}

impl PlotterApp {
    fn new(data_receiver: mpsc::UnboundedReceiver<Sample>) -> Self {
        Self {
            data_points: VecDeque::new(),
            data_receiver,
            start_time: Instant::now(),
            last_reading: None,
            corrupted: 0,
            max_points: 1000,
        }
    }

    fn update_data(&mut self) {
        while let Ok(sample) = self.data_receiver.try_recv() {
            let timestamp = sample
                .timestamp_ms
                .map(|ms| ms / 1000.0)
                .unwrap_or_else(|| self.start_time.elapsed().as_secs_f64());

            if sample.reading.is_corrupted() {
                self.corrupted += 1;
            }

            // the meter's own units, scaling is left to the reader of the chart
            if let Some(value) = plot_value(&sample.reading.digits) {
                self.data_points.push_back(DataPoint { timestamp, value });
                if self.data_points.len() > self.max_points {
                    self.data_points.pop_front();
                }
            }

            self.last_reading = Some(sample.reading);
        }
    }

    fn unit_label(&self) -> String {
        self.last_reading
            .as_ref()
            .map(|r| r.units.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| "value".to_string())
    }
}

impl eframe::App for PlotterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_data();

        ctx.request_repaint_after(Duration::from_millis(50));

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Keithley 197 Reading");

            match &self.last_reading {
                Some(reading) => {
                    ui.monospace(&reading.mode);
                    ui.label(
                        egui::RichText::new(format!("{} {}", reading.digits, reading.units))
                            .monospace()
                            .size(32.0),
                    );
                }
                None => {
                    ui.colored_label(egui::Color32::RED, "Waiting for packets on stdin...");
                }
            }

            ui.separator();

            let unit = self.unit_label();
            Plot::new("reading_plot")
                .legend(egui_plot::Legend::default())
                .show_axes([true, true])
                .show_grid(true)
                .allow_boxed_zoom(true)
                .allow_drag(true)
                .allow_scroll(true)
                .height(300.0)
                .x_axis_label("Time (s)")
                .y_axis_label(unit.clone())
                .show(ui, |plot_ui| {
                    if !self.data_points.is_empty() {
                        let points: PlotPoints = self.data_points.iter().map(|p| [p.timestamp, p.value]).collect();
                        let line = Line::new(unit, points).color(egui::Color32::GREEN).width(2.0);
                        plot_ui.line(line);
                    }
                });

            ui.separator();

            ui.horizontal(|ui| {
                ui.label(format!("Data points: {}", self.data_points.len()));
                if self.corrupted > 0 {
                    ui.colored_label(egui::Color32::YELLOW, format!("Corrupted packets: {}", self.corrupted));
                }
                if ui.button("Clear").clicked() {
                    self.data_points.clear();
                    self.corrupted = 0;
                    info!("Data cleared by user");
                }
            });
        });
    }
}

async fn stdin_reader_task(tx: mpsc::UnboundedSender<Sample>) {
    info!("Reading capture dump from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut line_number = 0;

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        };
        line_number += 1;

        let capture = match CaptureLine::parse(line_number, &line) {
            Ok(Some(capture)) => capture,
            Ok(None) => continue,
            Err(e) => {
                warn!("Skipping line: {}", e);
                continue;
            }
        };

        let sample = Sample {
            timestamp_ms: capture.timestamp_ms,
            reading: DecodedReading::decode(&capture.packet, Charset::Unicode),
        };
        if tx.send(sample).is_err() {
            warn!("UI receiver dropped, stopping reader");
            break;
        }
    }

    info!("Reader task terminated");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    info!("Starting K197 plotter");

    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(stdin_reader_task(tx));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 600.0])
            .with_title("K197 Plotter"),
        ..Default::default()
    };

    let app = PlotterApp::new(rx);

    eframe::run_native("K197 Plotter", options, Box::new(|_cc| Ok(Box::new(app))))
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}
