//! Daily check-in window expressed as minute-of-day bounds.
//!
//! The window is evaluated against whatever clock value the caller passes,
//! in that value's own timezone; no conversion happens here.

use chrono::{DateTime, TimeZone, Timelike};
use serde::Serialize;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OperatingWindow {
    open_minute: u32,
    close_minute: u32,
}

impl OperatingWindow {
    /// Open around the clock.
    pub const ALWAYS: OperatingWindow = OperatingWindow {
        open_minute: 0,
        close_minute: MINUTES_PER_DAY,
    };

    /// `[open_minute, close_minute)`; bounds above 1440 are clamped. When
    /// `open_minute > close_minute` the window wraps past midnight.
    pub fn new(open_minute: u32, close_minute: u32) -> Self {
        Self {
            open_minute: open_minute.min(MINUTES_PER_DAY),
            close_minute: close_minute.min(MINUTES_PER_DAY),
        }
    }

    pub fn open_minute(&self) -> u32 {
        self.open_minute
    }

    pub fn close_minute(&self) -> u32 {
        self.close_minute
    }

    pub fn permits<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> bool {
        let minute = at.hour() * 60 + at.minute();
        if self.open_minute <= self.close_minute {
            self.open_minute <= minute && minute < self.close_minute
        } else {
            minute >= self.open_minute || minute < self.close_minute
        }
    }
}

impl Default for OperatingWindow {
    fn default() -> Self {
        Self::ALWAYS
    }
}
