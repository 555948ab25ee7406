use std::io::{self, Write};

use serde::Serialize;

use crate::sampler::{Render, Tick};
use crate::system::snapshot::Sample;

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum JsonTick<'a> {
    Sample {
        index: u64,
        #[serde(flatten)]
        sample: &'a Sample,
    },
    Gap {
        index: u64,
        error: String,
    },
}

/// JSON-lines renderer: one object per tick.
pub struct JsonRenderer<W> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_tick(&mut self, tick: Tick<'_>) -> io::Result<()> {
        let record = match tick {
            Tick::Sample { index, sample } => JsonTick::Sample { index, sample },
            Tick::Gap { index, error } => JsonTick::Gap {
                index,
                error: error.to_string(),
            },
        };
        serde_json::to_writer(&mut self.out, &record)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl<W: Write> Render for JsonRenderer<W> {
    fn render(&mut self, tick: Tick<'_>) {
        if let Err(err) = self.write_tick(tick) {
            tracing::warn!(index = tick.index(), error = %err, "failed to write sample");
        }
    }
}
