use std::io::{self, Write};

use crate::format::{bytes_to_gb, format_time_left, pad_label};
use crate::sampler::{ProviderError, Render, Tick};
use crate::system::snapshot::Sample;

const LABEL_WIDTH: usize = 12;
const SEPARATOR_WIDTH: usize = 30;

/// Human-readable renderer: one block of emoji-labelled lines per tick.
pub struct TextRenderer<W> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_tick(&mut self, tick: Tick<'_>) -> io::Result<()> {
        match tick {
            Tick::Sample { sample, .. } => write_sample(&mut self.out, sample)?,
            Tick::Gap { index, error } => match error {
                ProviderError::Transient(reason) => {
                    writeln!(self.out, "⚠️  Sample #{index} unavailable: {reason}")?
                }
                ProviderError::Fatal(_) => {
                    writeln!(self.out, "⚠️  Sample #{index} unavailable: {error}")?
                }
            },
        }
        writeln!(self.out, "{}", "-".repeat(SEPARATOR_WIDTH))?;
        self.out.flush()
    }
}

fn line(out: &mut impl Write, label: &str, value: &str) -> io::Result<()> {
    writeln!(out, "{}: {value}", pad_label(label, LABEL_WIDTH))
}

fn usage(used: u64, total: u64, percent: f64) -> String {
    format!(
        "{:.1}GB / {:.1}GB ({percent:.1}%)",
        bytes_to_gb(used),
        bytes_to_gb(total)
    )
}

fn write_sample(out: &mut impl Write, sample: &Sample) -> io::Result<()> {
    writeln!(out, "⏰ {}", sample.timestamp().format("%H:%M:%S"))?;
    line(out, "🔥 CPU usage", &format!("{:.1}%", sample.cpu_percent()))?;
    line(
        out,
        "💾 Memory",
        &usage(
            sample.memory_used_bytes(),
            sample.memory_total_bytes(),
            sample.memory_percent(),
        ),
    )?;
    line(
        out,
        "💽 Disk",
        &usage(
            sample.disk_used_bytes(),
            sample.disk_total_bytes(),
            sample.disk_percent(),
        ),
    )?;
    if let Some(battery) = sample.battery() {
        let label = if battery.charging {
            "🔌 Charging"
        } else {
            "🔋 Battery"
        };
        line(
            out,
            label,
            &format!(
                "{:.0}% ({})",
                battery.percent,
                format_time_left(battery.secs_left)
            ),
        )?;
    }
    Ok(())
}

impl<W: Write> Render for TextRenderer<W> {
    fn render(&mut self, tick: Tick<'_>) {
        if let Err(err) = self.write_tick(tick) {
            tracing::warn!(index = tick.index(), error = %err, "failed to write sample");
        }
    }
}
