//! Paced text reveal driven by elapsed time.
//!
//! The typewriter never reads a clock. Callers feed it elapsed time through
//! [`Typewriter::advance`] and ask [`Typewriter::time_until_next`] when to
//! call again, which keeps it deterministic under test.

use std::time::Duration;

/// Delimiter that splits narration into separately paced segments.
pub const SEGMENT_DELIMITER: char = '\\';

/// Delay before writing continues after a pause ends.
pub const RESUME_GRACE: Duration = Duration::from_millis(50);

/// The text as it reads once fully written: segments on separate lines.
pub fn format_text(text: &str) -> String {
    text.replace(SEGMENT_DELIMITER, "\n")
}

/// Reveals text one unit at a time.
#[derive(Debug, Clone)]
pub struct Typewriter {
    segments: Vec<Vec<String>>,
    segment: usize,
    unit: usize,
    revealed: String,
    speed: Duration,
    line_break_delay: Duration,
    until_next: Duration,
    paused: bool,
    finished: bool,
}

impl Typewriter {
    /// Start writing `text`. The first unit is revealed immediately.
    pub fn new(text: &str, speed: Duration, line_break_delay: Duration, word_mode: bool) -> Self {
        let segments = text
            .split(SEGMENT_DELIMITER)
            .map(|segment| split_units(segment, word_mode))
            .collect();
        let mut writer = Self {
            segments,
            segment: 0,
            unit: 0,
            revealed: String::new(),
            speed,
            line_break_delay,
            until_next: Duration::ZERO,
            paused: false,
            finished: false,
        };
        writer.step();
        writer
    }

    /// The full text, as it will read once finished.
    pub fn full_text(&self) -> String {
        self.segments
            .iter()
            .map(|units| units.concat())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Text revealed so far.
    pub fn text(&self) -> &str {
        &self.revealed
    }

    /// Whether the whole text is revealed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Change the pace for the remaining units.
    pub fn set_speed(&mut self, speed: Duration) {
        self.speed = speed;
    }

    /// Feed elapsed time. Returns whether any text was revealed.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        if self.finished || self.paused {
            return false;
        }
        if self.speed.is_zero() {
            self.skip();
            return true;
        }

        let mut remaining = elapsed;
        let mut changed = false;
        while !self.finished && remaining >= self.until_next {
            remaining -= self.until_next;
            self.step();
            changed = true;
        }
        if !self.finished {
            self.until_next -= remaining;
        }
        changed
    }

    /// Reveal everything at once.
    pub fn skip(&mut self) {
        self.revealed = self.full_text();
        self.segment = self.segments.len();
        self.paused = false;
        self.finished = true;
    }

    /// Halt progress until [`resume`](Self::resume).
    pub fn pause(&mut self) {
        if !self.finished {
            self.paused = true;
        }
    }

    /// Continue writing after a short grace period.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.until_next = RESUME_GRACE;
        }
    }

    /// Time until the next unit appears. `None` when finished or paused.
    pub fn time_until_next(&self) -> Option<Duration> {
        if self.finished || self.paused {
            None
        } else {
            Some(self.until_next)
        }
    }

    /// Reveal the next unit and schedule the one after it.
    ///
    /// Entering a new segment writes a line break first. An empty segment
    /// reveals only that line break.
    fn step(&mut self) {
        let Some(units) = self.segments.get(self.segment) else {
            self.finished = true;
            return;
        };
        if self.unit == 0 && self.segment > 0 {
            self.revealed.push('\n');
        }
        if let Some(unit) = units.get(self.unit) {
            self.revealed.push_str(unit);
            self.unit += 1;
        }
        if self.unit < units.len() {
            self.until_next = self.speed;
            return;
        }

        self.segment += 1;
        self.unit = 0;
        if self.segment >= self.segments.len() {
            self.finished = true;
        } else {
            self.until_next = self.line_break_delay;
        }
    }
}

fn split_units(segment: &str, word_mode: bool) -> Vec<String> {
    if word_mode {
        segment.split_inclusive(' ').map(str::to_string).collect()
    } else {
        segment.chars().map(String::from).collect()
    }
}
