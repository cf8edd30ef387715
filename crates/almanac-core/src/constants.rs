/// Default number of days before "now" covered by an expansion window.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 1;

/// Default number of days after "now" covered by an expansion window.
pub const DEFAULT_LOOKAHEAD_DAYS: i64 = 30;

/// Hard ceiling on anchor periods examined by a single expansion.
///
/// Bounds the work done for any rule shape, including ones whose candidate
/// sets are always empty.
pub const DEFAULT_MAX_ITERATIONS: usize = 50_000;

/// Default lifetime of a cached expansion, in seconds.
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;

/// Default number of expansions kept before LRU eviction.
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 64;

/// Status token marking a cancelled event or occurrence.
pub const STATUS_CANCELLED: &str = "CANCELLED";
