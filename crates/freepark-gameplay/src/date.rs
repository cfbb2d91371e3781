//! In-game calendar dates.
//!
//! Dates are stored in savegames in a compressed 32 bit form:
//! bits 0-4 hold the day, bits 5-8 the month and the rest the year.

use freepark_common::{LoadResult, LoadingError};
use std::fmt;

/// Days in each month; the game calendar has no leap years.
const DAYS_IN_MONTH: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A day in the game calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    /// Year, starting at 1.
    pub year: u32,
    /// Month, 1 to 12.
    pub month: u8,
    /// Day of the month, starting at 1.
    pub day: u8,
}

impl Default for Date {
    fn default() -> Self {
        Self { year: 1, month: 1, day: 1 }
    }
}

impl Date {
    /// Creates a date from day, month and year.
    #[must_use]
    pub const fn new(day: u8, month: u8, year: u32) -> Self {
        Self { year, month, day }
    }

    /// Whether the date exists in the calendar.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
            && self.day >= 1
            && self.day <= DAYS_IN_MONTH[usize::from(self.month - 1)]
            && self.year < (1 << 23)
    }

    /// Compressed form for storage. Only calendar days can be compressed.
    pub fn compress(&self) -> LoadResult<u32> {
        if !self.is_valid() {
            return Err(LoadingError::Invalid(format!("date {self:?} cannot be stored")));
        }
        Ok((self.year << 9) | (u32::from(self.month) << 5) | u32::from(self.day))
    }

    /// Decode a compressed date.
    pub fn decompress(value: u32) -> LoadResult<Self> {
        let date = Self {
            year: value >> 9,
            month: ((value >> 5) & 0xF) as u8,
            day: (value & 0x1F) as u8,
        };
        if !date.is_valid() {
            return Err(LoadingError::Invalid(format!("compressed date {value:#x} is not a calendar day")));
        }
        Ok(date)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let month = MONTH_NAMES
            .get(usize::from(self.month).wrapping_sub(1))
            .copied()
            .unwrap_or("???");
        write!(f, "{} {month} {}", self.day, self.year)
    }
}
