//! Scenario objectives.
//!
//! Objectives form a closed polymorphic family. In a savegame each objective
//! inside a container is written as a one byte [`ObjectiveType`] followed by
//! the pattern of that variant; every variant pattern starts with the shared
//! `OJAO` state pattern.
//!
//! Decoding is a straight state machine: read the discriminant, construct the
//! empty variant, let it load its pattern (recursing into children for
//! containers). An unknown discriminant is a loading error.

use crate::date::Date;
use crate::persist::Persistent;
use freepark_common::{LoadResult, LoadingError, Tag};
use freepark_fileio::{Loader, Saver};

/// Shared objective state pattern.
pub const TAG_OJAO: Tag = Tag(*b"OJAO");
/// Container objective pattern.
pub const TAG_OJCN: Tag = Tag(*b"OJCN");
/// Empty objective pattern.
pub const TAG_OJ00: Tag = Tag(*b"OJ00");
/// Guest count objective pattern.
pub const TAG_OJGU: Tag = Tag(*b"OJGU");
/// Park rating objective pattern.
pub const TAG_OJRT: Tag = Tag(*b"OJRT");

/// Currently supported version of the OJAO pattern.
pub const CURRENT_VERSION_OJAO: u32 = 1;
/// Currently supported version of the OJCN pattern.
pub const CURRENT_VERSION_OJCN: u32 = 1;
/// Currently supported version of the OJ00 pattern.
pub const CURRENT_VERSION_OJ00: u32 = 1;
/// Currently supported version of the OJGU pattern.
pub const CURRENT_VERSION_OJGU: u32 = 1;
/// Currently supported version of the OJRT pattern.
pub const CURRENT_VERSION_OJRT: u32 = 1;

/// Discriminant of an objective variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ObjectiveType {
    /// A collection of objectives with a timeout.
    Container = 0,
    /// No objective at all.
    None = 1,
    /// Reach a number of guests.
    Guests = 2,
    /// Reach a park rating.
    ParkRating = 3,
}

impl ObjectiveType {
    /// All discriminants, in numeric order.
    pub const ALL: [Self; 4] = [Self::Container, Self::None, Self::Guests, Self::ParkRating];
}

impl TryFrom<u8> for ObjectiveType {
    type Error = LoadingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Container),
            1 => Ok(Self::None),
            2 => Ok(Self::Guests),
            3 => Ok(Self::ParkRating),
            _ => Err(LoadingError::UnknownDiscriminant {
                family: "objective",
                value,
            }),
        }
    }
}

/// What happens when a container's timeout date passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TimeoutPolicy {
    /// No time limit.
    #[default]
    None = 0,
    /// Win as soon as the objectives are met before the date.
    Before = 1,
    /// The objectives are evaluated on the date.
    Exact = 2,
}

impl TryFrom<u8> for TimeoutPolicy {
    type Error = LoadingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Before),
            2 => Ok(Self::Exact),
            _ => Err(LoadingError::Invalid(format!("unknown objective timeout policy {value}"))),
        }
    }
}

/// Grace period before a failing objective loses the game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropPolicy {
    /// Days an objective may stay unfulfilled (0 = no limit).
    pub days_after_drop: u32,
    /// Days the objective has been unfulfilled.
    pub drop_counter: u32,
}

/// State shared by every objective variant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectiveState {
    /// Whether the objective is currently met.
    pub is_fulfilled: bool,
    /// Grace period bookkeeping.
    pub drop_policy: DropPolicy,
}

impl Persistent for ObjectiveState {
    fn load(&mut self, ldr: &mut Loader<'_>) -> LoadResult<()> {
        let version = ldr.open_pattern(TAG_OJAO)?;
        ldr.check_supported(version, CURRENT_VERSION_OJAO)?;
        if version >= 1 {
            self.is_fulfilled = ldr.get_byte()? != 0;
            self.drop_policy.days_after_drop = ldr.get_long()?;
            self.drop_policy.drop_counter = ldr.get_long()?;
        } else {
            *self = Self::default();
        }
        ldr.close_pattern()
    }

    fn save(&self, svr: &mut Saver) -> LoadResult<()> {
        svr.start_pattern(TAG_OJAO, CURRENT_VERSION_OJAO);
        svr.put_byte(u8::from(self.is_fulfilled));
        svr.put_long(self.drop_policy.days_after_drop);
        svr.put_long(self.drop_policy.drop_counter);
        svr.end_pattern()
    }
}

/// A set of objectives that must all be met, with an optional deadline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerObjective {
    /// Shared state.
    pub state: ObjectiveState,
    /// Deadline handling.
    pub timeout_policy: TimeoutPolicy,
    /// Deadline.
    pub timeout_date: Date,
    /// Child objectives, in file order.
    pub objectives: Vec<Objective>,
}

impl ContainerObjective {
    /// Creates a container holding `objectives`.
    #[must_use]
    pub fn new(timeout_policy: TimeoutPolicy, timeout_date: Date, objectives: Vec<Objective>) -> Self {
        Self {
            state: ObjectiveState::default(),
            timeout_policy,
            timeout_date,
            objectives,
        }
    }
}

impl Persistent for ContainerObjective {
    fn load(&mut self, ldr: &mut Loader<'_>) -> LoadResult<()> {
        let version = ldr.open_pattern(TAG_OJCN)?;
        ldr.check_supported(version, CURRENT_VERSION_OJCN)?;
        self.state.load(ldr)?;
        self.objectives.clear();
        if version >= 1 {
            self.timeout_policy = TimeoutPolicy::try_from(ldr.get_byte()?)?;
            self.timeout_date = Date::decompress(ldr.get_long()?)?;
            let count = ldr.get_long()?;
            for _ in 0..count {
                self.objectives.push(Objective::load_next(ldr)?);
            }
        } else {
            self.timeout_policy = TimeoutPolicy::None;
            self.timeout_date = Date::default();
        }
        ldr.close_pattern()
    }

    fn save(&self, svr: &mut Saver) -> LoadResult<()> {
        let timeout_date = self.timeout_date.compress()?;
        svr.start_pattern(TAG_OJCN, CURRENT_VERSION_OJCN);
        self.state.save(svr)?;
        svr.put_byte(self.timeout_policy as u8);
        svr.put_long(timeout_date);
        let count = u32::try_from(self.objectives.len())
            .map_err(|_| LoadingError::Invalid(format!("{} objectives do not fit a count", self.objectives.len())))?;
        svr.put_long(count);
        for objective in &self.objectives {
            objective.save_tagged(svr)?;
        }
        svr.end_pattern()
    }
}

/// The empty objective.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoObjective {
    /// Shared state.
    pub state: ObjectiveState,
}

impl Persistent for NoObjective {
    fn load(&mut self, ldr: &mut Loader<'_>) -> LoadResult<()> {
        let version = ldr.open_pattern(TAG_OJ00)?;
        ldr.check_supported(version, CURRENT_VERSION_OJ00)?;
        self.state.load(ldr)?;
        ldr.close_pattern()
    }

    fn save(&self, svr: &mut Saver) -> LoadResult<()> {
        svr.start_pattern(TAG_OJ00, CURRENT_VERSION_OJ00);
        self.state.save(svr)?;
        svr.end_pattern()
    }
}

/// Have at least a number of guests in the park.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestsObjective {
    /// Shared state.
    pub state: ObjectiveState,
    /// Required guest count.
    pub nr_guests: u32,
}

impl GuestsObjective {
    /// Creates an unfulfilled guest count objective.
    #[must_use]
    pub fn new(nr_guests: u32) -> Self {
        Self { state: ObjectiveState::default(), nr_guests }
    }
}

impl Persistent for GuestsObjective {
    fn load(&mut self, ldr: &mut Loader<'_>) -> LoadResult<()> {
        let version = ldr.open_pattern(TAG_OJGU)?;
        ldr.check_supported(version, CURRENT_VERSION_OJGU)?;
        self.state.load(ldr)?;
        self.nr_guests = if version >= 1 { ldr.get_long()? } else { 0 };
        ldr.close_pattern()
    }

    fn save(&self, svr: &mut Saver) -> LoadResult<()> {
        svr.start_pattern(TAG_OJGU, CURRENT_VERSION_OJGU);
        self.state.save(svr)?;
        svr.put_long(self.nr_guests);
        svr.end_pattern()
    }
}

/// Have at least a given park rating.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParkRatingObjective {
    /// Shared state.
    pub state: ObjectiveState,
    /// Required rating.
    pub rating: u16,
}

impl ParkRatingObjective {
    /// Creates an unfulfilled park rating objective.
    #[must_use]
    pub fn new(rating: u16) -> Self {
        Self { state: ObjectiveState::default(), rating }
    }
}

impl Persistent for ParkRatingObjective {
    fn load(&mut self, ldr: &mut Loader<'_>) -> LoadResult<()> {
        let version = ldr.open_pattern(TAG_OJRT)?;
        ldr.check_supported(version, CURRENT_VERSION_OJRT)?;
        self.state.load(ldr)?;
        self.rating = if version >= 1 { ldr.get_word()? } else { 0 };
        ldr.close_pattern()
    }

    fn save(&self, svr: &mut Saver) -> LoadResult<()> {
        svr.start_pattern(TAG_OJRT, CURRENT_VERSION_OJRT);
        self.state.save(svr)?;
        svr.put_word(self.rating);
        svr.end_pattern()
    }
}

/// Any objective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Objective {
    /// See [`ContainerObjective`].
    Container(ContainerObjective),
    /// See [`NoObjective`].
    None(NoObjective),
    /// See [`GuestsObjective`].
    Guests(GuestsObjective),
    /// See [`ParkRatingObjective`].
    ParkRating(ParkRatingObjective),
}

impl Objective {
    /// Default-constructed variant for a discriminant.
    #[must_use]
    pub fn empty(kind: ObjectiveType) -> Self {
        match kind {
            ObjectiveType::Container => Self::Container(ContainerObjective::default()),
            ObjectiveType::None => Self::None(NoObjective::default()),
            ObjectiveType::Guests => Self::Guests(GuestsObjective::default()),
            ObjectiveType::ParkRating => Self::ParkRating(ParkRatingObjective::default()),
        }
    }

    /// Discriminant of this variant.
    #[must_use]
    pub fn kind(&self) -> ObjectiveType {
        match self {
            Self::Container(_) => ObjectiveType::Container,
            Self::None(_) => ObjectiveType::None,
            Self::Guests(_) => ObjectiveType::Guests,
            Self::ParkRating(_) => ObjectiveType::ParkRating,
        }
    }

    /// Shared state of the variant.
    #[must_use]
    pub fn state(&self) -> &ObjectiveState {
        match self {
            Self::Container(o) => &o.state,
            Self::None(o) => &o.state,
            Self::Guests(o) => &o.state,
            Self::ParkRating(o) => &o.state,
        }
    }

    /// Mutable shared state of the variant.
    pub fn state_mut(&mut self) -> &mut ObjectiveState {
        match self {
            Self::Container(o) => &mut o.state,
            Self::None(o) => &mut o.state,
            Self::Guests(o) => &mut o.state,
            Self::ParkRating(o) => &mut o.state,
        }
    }

    /// Read a discriminant and the objective it announces.
    pub fn load_next(ldr: &mut Loader<'_>) -> LoadResult<Self> {
        let kind = ObjectiveType::try_from(ldr.get_byte()?)?;
        let mut objective = Self::empty(kind);
        objective.load(ldr)?;
        Ok(objective)
    }

    /// Write the discriminant followed by the objective.
    pub fn save_tagged(&self, svr: &mut Saver) -> LoadResult<()> {
        svr.put_byte(self.kind() as u8);
        self.save(svr)
    }

    /// English description, one line per leaf objective.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::None(_) => "No objective".to_string(),
            Self::Guests(o) => format!("Have at least {} guests in the park", o.nr_guests),
            Self::ParkRating(o) => format!("Reach a park rating of at least {}", o.rating),
            Self::Container(o) => {
                let mut text = String::new();
                for child in &o.objectives {
                    text.push_str(&child.describe());
                    text.push('\n');
                }
                text.push_str(&match o.timeout_policy {
                    TimeoutPolicy::Before => format!("Complete before {}", o.timeout_date),
                    TimeoutPolicy::Exact => format!("Objectives are evaluated on {}", o.timeout_date),
                    TimeoutPolicy::None => "No time limit".to_string(),
                });
                if o.state.drop_policy.days_after_drop > 0 {
                    text.push_str(" (strict)");
                }
                text
            },
        }
    }
}

impl Persistent for Objective {
    fn load(&mut self, ldr: &mut Loader<'_>) -> LoadResult<()> {
        match self {
            Self::Container(o) => o.load(ldr),
            Self::None(o) => o.load(ldr),
            Self::Guests(o) => o.load(ldr),
            Self::ParkRating(o) => o.load(ldr),
        }
    }

    fn save(&self, svr: &mut Saver) -> LoadResult<()> {
        match self {
            Self::Container(o) => o.save(svr),
            Self::None(o) => o.save(svr),
            Self::Guests(o) => o.save(svr),
            Self::ParkRating(o) => o.save(svr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fulfilled(mut objective: Objective) -> Objective {
        objective.state_mut().is_fulfilled = true;
        objective
    }

    fn two_child_container() -> ContainerObjective {
        ContainerObjective::new(
            TimeoutPolicy::None,
            Date::default(),
            vec![
                Objective::Guests(GuestsObjective::new(100)),
                fulfilled(Objective::ParkRating(ParkRatingObjective::new(500))),
            ],
        )
    }

    fn encode(container: &ContainerObjective) -> Vec<u8> {
        let mut svr = Saver::new();
        container.save(&mut svr).expect("save");
        svr.finish().expect("finish")
    }

    fn decode(bytes: &[u8]) -> LoadResult<ContainerObjective> {
        let mut ldr = Loader::new(bytes);
        let mut container = ContainerObjective::default();
        container.load(&mut ldr)?;
        ldr.finish()?;
        Ok(container)
    }

    #[test]
    fn test_container_round_trip_preserves_order() {
        let container = two_child_container();
        let restored = decode(&encode(&container)).expect("decode");
        assert_eq!(restored, container);
        assert_eq!(restored.objectives[0].kind(), ObjectiveType::Guests);
        assert_eq!(restored.objectives[1].kind(), ObjectiveType::ParkRating);
        assert!(restored.objectives[1].state().is_fulfilled);
    }

    #[test]
    fn test_corrupted_tail_reports_last_field() {
        let mut bytes = encode(&two_child_container());
        bytes.truncate(bytes.len() - 3);
        let err = decode(&bytes).expect_err("corrupt");
        assert!(matches!(err, LoadingError::ShortRead { missing: 3, .. }));
        assert_eq!(err.to_string(), "Length mismatch at end of pattern OJCN (3 bytes missing)");
    }

    #[test]
    fn test_truncation_at_every_prefix_fails() {
        let bytes = encode(&two_child_container());
        for len in 0..bytes.len() {
            assert!(decode(&bytes[..len]).is_err(), "prefix of {len} bytes decoded");
        }
    }

    #[test]
    fn test_unknown_discriminant() {
        let mut svr = Saver::new();
        svr.put_byte(7);
        let bytes = svr.finish().expect("finish");
        let err = Objective::load_next(&mut Loader::new(&bytes)).expect_err("unknown");
        assert!(matches!(err, LoadingError::UnknownDiscriminant { value: 7, .. }));
        assert_eq!(err.to_string(), "Unknown objective type 7");
    }

    #[test]
    fn test_every_saved_discriminant_is_loadable() {
        for kind in ObjectiveType::ALL {
            let objective = Objective::empty(kind);
            let mut svr = Saver::new();
            objective.save_tagged(&mut svr).expect("save");
            let bytes = svr.finish().expect("finish");
            let restored = Objective::load_next(&mut Loader::new(&bytes)).expect("load");
            assert_eq!(restored.kind(), kind);
            assert_eq!(restored, objective);
            assert_eq!(ObjectiveType::try_from(kind as u8).expect("known"), kind);
        }
    }

    #[test]
    fn test_future_version_rejected() {
        let mut svr = Saver::new();
        svr.start_pattern(TAG_OJGU, CURRENT_VERSION_OJGU + 1);
        ObjectiveState::default().save(&mut svr).expect("state");
        svr.put_long(5);
        svr.end_pattern().expect("end");
        let bytes = svr.finish().expect("finish");

        let mut objective = Objective::empty(ObjectiveType::Guests);
        let err = objective.load(&mut Loader::new(&bytes)).expect_err("too new");
        assert!(matches!(err, LoadingError::VersionMismatch { found: 2, supported: 1, .. }));
    }

    #[test]
    fn test_invalid_timeout_policy() {
        let mut bytes = encode(&two_child_container());
        // OJCN header (8) + OJAO pattern (8 + 9 + 4) precede the policy byte.
        bytes[29] = 9;
        assert!(matches!(decode(&bytes), Err(LoadingError::Invalid(_))));
    }

    #[test]
    fn test_unstorable_timeout_date_is_not_written() {
        for date in [Date::new(31, 2, 1), Date::new(1, 1, (1 << 23) + 5)] {
            let container = ContainerObjective::new(TimeoutPolicy::Before, date, Vec::new());
            let mut svr = Saver::new();
            assert!(matches!(container.save(&mut svr), Err(LoadingError::Invalid(_))));
            assert!(svr.is_empty());
        }
    }

    #[test]
    fn test_nested_containers() {
        let inner = ContainerObjective::new(
            TimeoutPolicy::Before,
            Date::new(1, 6, 3),
            vec![Objective::None(NoObjective::default())],
        );
        let outer = ContainerObjective::new(
            TimeoutPolicy::Exact,
            Date::new(31, 10, 1),
            vec![Objective::Container(inner), Objective::Guests(GuestsObjective::new(1))],
        );
        assert_eq!(decode(&encode(&outer)).expect("decode"), outer);
    }

    #[test]
    fn test_describe() {
        let mut container = two_child_container();
        container.timeout_policy = TimeoutPolicy::Exact;
        container.timeout_date = Date::new(31, 10, 1);
        let text = Objective::Container(container).describe();
        assert_eq!(
            text,
            "Have at least 100 guests in the park\n\
             Reach a park rating of at least 500\n\
             Objectives are evaluated on 31 Oct 1"
        );
    }

    fn leaf_strategy() -> impl Strategy<Value = Objective> {
        let state = (any::<bool>(), any::<u32>(), any::<u32>()).prop_map(|(f, d, c)| ObjectiveState {
            is_fulfilled: f,
            drop_policy: DropPolicy { days_after_drop: d, drop_counter: c },
        });
        prop_oneof![
            state.clone().prop_map(|state| Objective::None(NoObjective { state })),
            (state.clone(), any::<u32>()).prop_map(|(state, nr_guests)| Objective::Guests(GuestsObjective { state, nr_guests })),
            (state, any::<u16>()).prop_map(|(state, rating)| Objective::ParkRating(ParkRatingObjective { state, rating })),
        ]
    }

    fn objective_strategy() -> impl Strategy<Value = Objective> {
        leaf_strategy().prop_recursive(3, 16, 4, |inner| {
            (0u8..3, 1u8..=28, 1u8..=12, 1u32..5000, proptest::collection::vec(inner, 0..4)).prop_map(
                |(policy, day, month, year, objectives)| {
                    let policy = TimeoutPolicy::try_from(policy).unwrap_or_default();
                    Objective::Container(ContainerObjective::new(policy, Date::new(day, month, year), objectives))
                },
            )
        })
    }

    proptest! {
        #[test]
        fn prop_objective_round_trip(objective in objective_strategy()) {
            let mut svr = Saver::new();
            objective.save_tagged(&mut svr).expect("save");
            let bytes = svr.finish().expect("finish");
            let mut ldr = Loader::new(&bytes);
            let restored = Objective::load_next(&mut ldr).expect("load");
            prop_assert_eq!(restored, objective);
            prop_assert_eq!(ldr.remaining(), 0);
        }
    }
}
