//! Consumers of the latest per station table.

use std::io::Write;

use crate::{analytics::LatestReading, errors::SnapshotErr};

/// Something that turns the latest per station table into a visualization.
pub trait ReportSink {
    /// Render the table. Rows arrive warmest first.
    fn render(&mut self, table: &[LatestReading]) -> Result<(), SnapshotErr>;
}

/// Horizontal bar chart of the latest temperature per station, written as text.
#[derive(Debug)]
pub struct BarChart<W: Write> {
    out: W,
    width: usize,
}

impl<W: Write> BarChart<W> {
    const TITLE: &'static str = "Latest Recorded Temperature for Each Weather Station";
    const DEFAULT_WIDTH: usize = 40;

    /// Chart written to `out`.
    pub fn new(out: W) -> Self {
        BarChart {
            out,
            width: Self::DEFAULT_WIDTH,
        }
    }

    /// Set the length in characters of the longest bar.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Get the writer back.
    pub fn into_inner(self) -> W {
        self.out
    }

    // Bars start at the lower of zero and the coldest reading.
    fn scale(table: &[LatestReading]) -> (f64, f64) {
        table
            .iter()
            .filter_map(|row| row.measurement.temperature)
            .fold((0.0_f64, 0.0_f64), |(lo, hi), t| (lo.min(t), hi.max(t)))
    }
}

impl<W: Write> ReportSink for BarChart<W> {
    fn render(&mut self, table: &[LatestReading]) -> Result<(), SnapshotErr> {
        writeln!(self.out, "{}", Self::TITLE)?;

        if table.is_empty() {
            writeln!(self.out, "  (no stations)")?;
            return Ok(());
        }

        let names: Vec<String> = table
            .iter()
            .map(|row| row.station.display_name())
            .collect();
        let name_width = names.iter().map(|name| name.chars().count()).max().unwrap_or(0);

        let (lo, hi) = Self::scale(table);
        let span = hi - lo;

        for (name, row) in names.iter().zip(table) {
            match row.measurement.temperature {
                Some(t) => {
                    let len = if span > 0.0 {
                        ((t - lo) / span * self.width as f64).round() as usize
                    } else {
                        0
                    };
                    writeln!(
                        self.out,
                        "{:<nw$} | {:<bw$} {:>5.1} °C",
                        name,
                        "#".repeat(len),
                        t,
                        nw = name_width,
                        bw = self.width
                    )?;
                }
                None => writeln!(
                    self.out,
                    "{:<nw$} | {:<bw$}   n/a",
                    name,
                    "",
                    nw = name_width,
                    bw = self.width
                )?,
            }
        }

        self.out.flush()?;
        Ok(())
    }
}
