//! Stable application-wide constants.
//!
//! Values here are default fallbacks for env-var-based configuration and
//! fixed keys shared with stored data. They should rarely change.

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "3000";

// --- Persistence ---

/// Key under which the serialized vacation list is stored.
pub const VACATIONS_KEY: &str = "vacationsData";
/// Key under which the index of the most recently viewed/saved vacation is stored.
pub const VACATION_INDEX_KEY: &str = "vacationIndex";
/// Directory for the file store, used when no Redis URL is configured. Overridden by `DATA_DIR`.
pub const DEFAULT_DATA_DIR: &str = "data";

// --- Draft plans ---

/// Draft plans not touched for this long are discarded: 2 hours. Overridden by `DRAFT_PLAN_TTL`.
pub const DEFAULT_DRAFT_PLAN_TTL_SECONDS: u64 = 7_200;
/// Upper bound on concurrently open draft plans. Overridden by `DRAFT_PLAN_MAX_ENTRIES`.
pub const DEFAULT_DRAFT_PLAN_MAX_ENTRIES: u64 = 1_000;
/// A plan needs at least this many stopovers before it can be saved as a vacation.
pub const MIN_STOPOVERS_TO_SAVE: usize = 2;

// --- Geocoding ---

/// Default number of POIs returned by a nearby search. Overridden by `POI_SEARCH_LIMIT`.
pub const DEFAULT_POI_SEARCH_LIMIT: u32 = 10;
/// Mapbox caps geocoding results per request.
pub const MAX_POI_SEARCH_LIMIT: u32 = 10;
