/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};

/// Measures the phases of a docgen run.
pub struct StopWatch {
    last_instant: Instant,
    metrics: Vec<Metric>,
    lwidth: usize,
}

impl StopWatch {
    pub fn start() -> Self {
        Self {
            last_instant: Instant::now(),
            metrics: vec![],
            lwidth: 0,
        }
    }

    pub fn record(&mut self, what: &'static str) {
        let now = Instant::now();
        let duration = now - self.last_instant;
        self.last_instant = now;
        self.lwidth = usize::max(self.lwidth, what.len());
        self.metrics.push(Metric {
            name: what,
            duration,
        });
    }

    pub fn total(&self) -> Duration {
        self.metrics.iter().map(|metric| metric.duration).sum()
    }

    pub fn write_stats_to(&self, to_file: &Path) -> io::Result<()> {
        let file = File::create(to_file)?;
        let mut writer = BufWriter::new(file);
        self.write_stats(&mut writer)?;
        writer.flush()
    }

    pub fn write_stats(&self, writer: &mut impl Write) -> io::Result<()> {
        let total = self.total();
        let rwidth = log10(total.as_millis());
        let total_metric = Metric {
            name: "total",
            duration: total,
        };

        for metric in self.metrics.iter() {
            Self::write_metric(writer, metric, self.lwidth, rwidth)?;
        }
        writeln!(writer, "{}", "-".repeat(self.lwidth + rwidth + 5))?;
        Self::write_metric(writer, &total_metric, self.lwidth, rwidth)
    }

    fn write_metric(
        writer: &mut impl Write,
        metric: &Metric,
        lwidth: usize,
        rwidth: usize,
    ) -> io::Result<()> {
        writeln!(
            writer,
            "{: >l$}: {: >r$} ms",
            metric.name,
            metric.duration.as_millis(),
            l = lwidth,
            r = rwidth,
        )
    }
}

fn log10(n: u128) -> usize {
    std::iter::successors(Some(n), |&n| (n >= 10).then_some(n / 10)).count()
}

struct Metric {
    name: &'static str,
    duration: Duration,
}
