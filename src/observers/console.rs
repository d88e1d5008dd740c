//! Live console table of the latest pose per device.
//!
//! Rows are fixed to the tracking set order. The table is redrawn in place
//! with ANSI cursor movement, at most once per refresh interval.

use super::TickObserver;
use crate::core::types::{RotationMode, TickReport};
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

const ADDRESS_WIDTH: usize = 22;
const VALUE_WIDTH: usize = 9;

pub struct ConsoleTable<W: Write> {
    out: W,
    rows: Vec<Arc<str>>,
    mode: RotationMode,
    refresh: Duration,
    last_draw: Option<Instant>,
    header_drawn: bool,
    /// Use ANSI escapes to redraw in place (off for non-terminals)
    in_place: bool,
}

impl<W: Write> ConsoleTable<W> {
    pub fn new(out: W, rows: Vec<Arc<str>>, mode: RotationMode, refresh: Duration) -> Self {
        Self {
            out,
            rows,
            mode,
            refresh,
            last_draw: None,
            header_drawn: false,
            in_place: true,
        }
    }

    /// Append each frame instead of redrawing
    pub fn append_only(mut self) -> Self {
        self.in_place = false;
        self
    }

    fn header(&self) -> String {
        let columns: &[&str] = match self.mode {
            RotationMode::Euler => &["X", "Y", "Z", "Yaw", "Pitch", "Roll"],
            RotationMode::Quaternion => &["X", "Y", "Z", "W", "QX", "QY", "QZ"],
        };
        let mut line = format!("{:<width$}", "OSC address", width = ADDRESS_WIDTH);
        for c in columns {
            line.push_str(&format!("{:<width$}", c, width = VALUE_WIDTH));
        }
        line.trim_end().to_string()
    }

    fn row(&self, address: &str, report: &TickReport) -> String {
        let mut line = format!("{:<width$}", address, width = ADDRESS_WIDTH);
        match report.sample_for(address) {
            Some(sample) => {
                for v in sample.values() {
                    line.push_str(&format!("{:<width$.4}", v, width = VALUE_WIDTH));
                }
            }
            None => line.push_str("--"),
        }
        line.trim_end().to_string()
    }

    fn draw(&mut self, report: &TickReport) -> std::io::Result<()> {
        if !self.header_drawn {
            writeln!(self.out, "{}", self.header())?;
            self.header_drawn = true;
        } else if self.in_place && !self.rows.is_empty() {
            write!(self.out, "\x1b[{}A", self.rows.len())?;
        }

        let lines: Vec<String> = self.rows.iter().map(|a| self.row(a, report)).collect();
        for line in lines {
            if self.in_place {
                write!(self.out, "\x1b[2K")?;
            }
            writeln!(self.out, "{}", line)?;
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TickObserver for ConsoleTable<W> {
    fn on_tick(&mut self, report: &TickReport) {
        let now = Instant::now();
        if let Some(last) = self.last_draw {
            if now.duration_since(last) < self.refresh {
                return;
            }
        }
        self.last_draw = Some(now);

        if let Err(e) = self.draw(report) {
            log::debug!("Console redraw failed: {}", e);
        }
    }
}
