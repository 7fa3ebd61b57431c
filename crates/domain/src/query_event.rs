use std::time::Duration;

/// Disposition of a resolved query. The ordinal doubles as the index into
/// [`UnitCounters::by_result`](crate::stats_unit::UnitCounters); `NotFiltered`
/// contributes to a unit's total but owns no category slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterResult {
    NotFiltered,
    Filtered,
    SafeBrowsing,
    SafeSearch,
    Parental,
}

impl FilterResult {
    pub const COUNT: usize = 5;

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Maps a stored ordinal back to a result, rejecting out-of-range values.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::NotFiltered),
            1 => Some(Self::Filtered),
            2 => Some(Self::SafeBrowsing),
            3 => Some(Self::SafeSearch),
            4 => Some(Self::Parental),
            _ => None,
        }
    }
}

/// A single resolved query as reported by the resolution pipeline. Events are
/// folded into the current unit's counters and never stored individually.
#[derive(Debug, Clone)]
pub struct QueryEvent {
    pub domain: String,
    pub client: String,
    pub result: FilterResult,
    pub elapsed: Duration,
}
