//! The scenario being played: park limits, finances and objectives.

use crate::date::Date;
use crate::objective::{ContainerObjective, GuestsObjective, Objective, ParkRatingObjective, TimeoutPolicy};
use crate::persist::Persistent;
use freepark_common::{LoadResult, Tag};
use freepark_fileio::{Loader, Saver};
use tracing::debug;

/// Scenario pattern.
pub const TAG_SCNO: Tag = Tag(*b"SCNO");
/// Currently supported version of the SCNO pattern.
pub const CURRENT_VERSION_SCNO: u32 = 3;

/// Name of the scenario used when none is loaded.
pub const DEFAULT_SCENARIO_NAME: &str = "Default scenario";
/// Description of the scenario used when none is loaded.
pub const DEFAULT_SCENARIO_DESCR: &str = "Build the park of your dreams, without any restrictions.";

/// Scenario settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    /// Name of the scenario.
    pub name: String,
    /// Description of the scenario.
    pub descr: String,
    /// What must be achieved to win.
    pub objective: ContainerObjective,
    /// Guest spawn probability at zero popularity (0..1024).
    pub spawn_lowest: u16,
    /// Guest spawn probability at full popularity (0..1024).
    pub spawn_highest: u16,
    /// Maximum number of guests in the park.
    pub max_guests: u32,
    /// Maximum loan.
    pub max_loan: u32,
    /// Loan interest in tenths of a percent per year.
    pub interest: u16,
    /// Whether the park may charge an entrance fee.
    pub allow_entrance_fee: bool,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::default_scenario()
    }
}

impl Scenario {
    /// The default scenario, with randomised objectives.
    #[must_use]
    pub fn default_scenario() -> Self {
        Self::default_with_rng(&mut fastrand::Rng::new())
    }

    /// The default scenario, drawing its objectives from `rng`.
    #[must_use]
    pub fn default_with_rng(rng: &mut fastrand::Rng) -> Self {
        let objective = ContainerObjective::new(
            TimeoutPolicy::Exact,
            Date::new(31, 10, 1),
            vec![
                Objective::Guests(GuestsObjective::new(rng.u32(0..120) + 60)),
                Objective::ParkRating(ParkRatingObjective::new(500 + rng.u16(0..30) * 10)),
            ],
        );
        Self {
            name: DEFAULT_SCENARIO_NAME.to_string(),
            descr: DEFAULT_SCENARIO_DESCR.to_string(),
            objective,
            spawn_lowest: 200,
            spawn_highest: 600,
            max_guests: 3000,
            max_loan: 3_000_000,
            interest: 25,
            allow_entrance_fee: true,
        }
    }

    /// Probability (0..1024) of a new guest arriving at the given popularity (0..1024).
    #[must_use]
    pub fn spawn_probability(&self, popularity: u32) -> u32 {
        let low = i64::from(self.spawn_lowest);
        let increment = i64::from(self.spawn_highest) - low;
        let value = low + increment * i64::from(popularity.min(1024)) / 1024;
        u32::try_from(value.max(0)).unwrap_or(0)
    }
}

impl Persistent for Scenario {
    fn load(&mut self, ldr: &mut Loader<'_>) -> LoadResult<()> {
        let version = ldr.open_pattern(TAG_SCNO)?;
        match version {
            0 => {
                debug!("Scenario version 0, using the default scenario");
                *self = Self::default_scenario();
            },
            1..=CURRENT_VERSION_SCNO => {
                self.name = ldr.get_text()?;
                self.descr = if version >= 2 {
                    ldr.get_text()?
                } else {
                    DEFAULT_SCENARIO_DESCR.to_string()
                };
                self.objective = ContainerObjective::default();
                self.objective.load(ldr)?;
                self.spawn_lowest = ldr.get_word()?;
                self.spawn_highest = ldr.get_word()?;
                self.max_guests = ldr.get_long()?;
                if version <= 2 {
                    // Initial money and initial loan, no longer used.
                    ldr.get_long()?;
                    ldr.get_long()?;
                }
                self.max_loan = ldr.get_long()?;
                self.interest = ldr.get_word()?;
                self.allow_entrance_fee = version == 1 || ldr.get_byte()? != 0;
            },
            _ => return Err(ldr.version_mismatch(version, CURRENT_VERSION_SCNO)),
        }
        ldr.close_pattern()
    }

    fn save(&self, svr: &mut Saver) -> LoadResult<()> {
        svr.start_pattern(TAG_SCNO, CURRENT_VERSION_SCNO);
        svr.put_text(&self.name)?;
        svr.put_text(&self.descr)?;
        self.objective.save(svr)?;
        svr.put_word(self.spawn_lowest);
        svr.put_word(self.spawn_highest);
        svr.put_long(self.max_guests);
        svr.put_long(self.max_loan);
        svr.put_word(self.interest);
        svr.put_byte(u8::from(self.allow_entrance_fee));
        svr.end_pattern()
    }
}
