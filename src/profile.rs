/// Per-frame timing trace (`--cpuprofile`).
///
/// One CSV line per frame: frame number, time spent in the update step and
/// time spent drawing, both in microseconds.

use std::io::{self, Write};
use std::time::Duration;

pub struct FrameTrace<W: Write> {
    out: W,
    frames: u64,
}

impl<W: Write> FrameTrace<W> {
    /// Writes the CSV header immediately.
    pub fn new(mut out: W) -> io::Result<Self> {
        writeln!(out, "frame,update_us,draw_us")?;
        Ok(Self { out, frames: 0 })
    }

    pub fn record(&mut self, frame: u64, update: Duration, draw: Duration) -> io::Result<()> {
        self.frames += 1;
        writeln!(
            self.out,
            "{},{},{}",
            frame,
            update.as_micros(),
            draw.as_micros()
        )
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Flush and hand back the writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
