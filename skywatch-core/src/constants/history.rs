//! History Sizing

/// Default number of readings kept in the rolling history.
///
/// At the station's one-minute reporting cadence this is one hour of data,
/// enough for the default trend windows with room to widen them.
pub const DEFAULT_HISTORY_CAPACITY: usize = 60;
