use crate::history::Record;
use chrono::Utc;

/// Coarse lifecycle state of a typing session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Completed,
}

/// Classification of a single passage position against the typed buffer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Judgment {
    Correct,
    Incorrect,
    Current,
    Untouched,
}

/// Classifies every passage character against the typed buffer.
///
/// Pure projection of `(passage, typed)`, generated lazily and recomputed
/// by the caller on every input change. Positions past the typed buffer are
/// `Untouched`, except the next position to type, which is `Current`.
pub fn classify<'a>(passage: &'a str, typed: &str) -> impl Iterator<Item = (char, Judgment)> + 'a {
    let typed: Vec<char> = typed.chars().collect();
    passage.chars().enumerate().map(move |(idx, expected)| {
        let judgment = match typed.get(idx) {
            Some(&c) if c == expected => Judgment::Correct,
            Some(_) => Judgment::Incorrect,
            None if idx == typed.len() => Judgment::Current,
            None => Judgment::Untouched,
        };
        (expected, judgment)
    })
}

/// Read-only projection of a session for presentation
#[derive(Clone, Copy, Debug)]
pub struct SessionView<'a> {
    pub phase: Phase,
    pub passage: &'a str,
    pub typed: &'a str,
    pub remaining_secs: u32,
    pub wpm: u32,
    pub accuracy: u32,
    pub correct_chars: u32,
    pub incorrect_chars: u32,
}

/// One timed typing attempt, from start to completion.
///
/// The session owns all of its transient state and performs no I/O; on
/// completion it hands a finished [`Record`] to the caller by value.
#[derive(Debug)]
pub struct Session {
    pub phase: Phase,
    pub passage: String,
    pub time_limit_secs: u32,
    pub elapsed_secs: u32,
    typed: String,
    total_typed: u32,
    correct_chars: u32,
    result: Option<Record>,
}

impl Session {
    pub fn new(time_limit_secs: u32) -> Self {
        Self {
            phase: Phase::Idle,
            passage: String::new(),
            time_limit_secs,
            elapsed_secs: 0,
            typed: String::new(),
            total_typed: 0,
            correct_chars: 0,
            result: None,
        }
    }

    /// Begins a fresh attempt against `passage`.
    ///
    /// Allowed from `Idle` or `Completed`; a no-op while `Running`. Resets
    /// the typed buffer, the clock, the counters and any prior result.
    pub fn start(&mut self, passage: String) {
        if self.phase == Phase::Running {
            return;
        }

        self.passage = passage;
        self.typed.clear();
        self.elapsed_secs = 0;
        self.total_typed = 0;
        self.correct_chars = 0;
        self.result = None;
        self.phase = Phase::Running;
    }

    /// Replaces the typed buffer wholesale and rescans correctness.
    ///
    /// The buffer is the input surface's current content, so corrections
    /// and backspacing arrive here as shorter replacements. Characters
    /// typed past the end of the passage count as typed but never as
    /// correct. A buffer exactly equal to the passage completes the
    /// session. Ignored unless `Running`.
    pub fn update_input(&mut self, buffer: &str) -> Option<Record> {
        if self.phase != Phase::Running {
            return None;
        }

        self.typed.clear();
        self.typed.push_str(buffer);
        self.total_typed = self.typed.chars().count() as u32;
        self.correct_chars = self
            .typed
            .chars()
            .zip(self.passage.chars())
            .filter(|(typed, expected)| typed == expected)
            .count() as u32;

        if self.typed == self.passage {
            return Some(self.complete());
        }
        None
    }

    /// Advances the clock by one second; completes on the deadline.
    /// Ignored unless `Running`, so late ticks cannot mutate a dead session.
    pub fn tick(&mut self) -> Option<Record> {
        if self.phase != Phase::Running {
            return None;
        }

        self.elapsed_secs += 1;
        if self.elapsed_secs >= self.time_limit_secs {
            return Some(self.complete());
        }
        None
    }

    fn complete(&mut self) -> Record {
        self.phase = Phase::Completed;
        let record = Record {
            wpm: self.wpm(),
            accuracy: self.accuracy(),
            correct_chars: self.correct_chars,
            incorrect_chars: self.incorrect_chars(),
            time_taken: self.elapsed_secs,
            date: Utc::now(),
        };
        self.result = Some(record.clone());
        record
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn remaining_secs(&self) -> u32 {
        self.time_limit_secs - self.elapsed_secs
    }

    pub fn correct_chars(&self) -> u32 {
        self.correct_chars
    }

    pub fn incorrect_chars(&self) -> u32 {
        self.total_typed - self.correct_chars
    }

    /// Percentage of typed characters that matched, 0 when nothing typed
    pub fn accuracy(&self) -> u32 {
        if self.total_typed == 0 {
            return 0;
        }
        ((self.correct_chars as f64 / self.total_typed as f64) * 100.0).round() as u32
    }

    /// Correct characters per minute over the active time, at five
    /// characters per word; 0 before the first whole second has elapsed
    pub fn wpm(&self) -> u32 {
        if self.elapsed_secs == 0 {
            return 0;
        }
        (self.correct_chars as f64 / 5.0 / (self.elapsed_secs as f64 / 60.0)).round() as u32
    }

    /// The record produced by the last completion, if any
    pub fn last_result(&self) -> Option<&Record> {
        self.result.as_ref()
    }

    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            phase: self.phase,
            passage: &self.passage,
            typed: &self.typed,
            remaining_secs: self.remaining_secs(),
            wpm: self.wpm(),
            accuracy: self.accuracy(),
            correct_chars: self.correct_chars,
            incorrect_chars: self.incorrect_chars(),
        }
    }
}
