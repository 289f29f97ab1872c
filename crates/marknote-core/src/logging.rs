//! Structured logging schema and field name constants for marknote.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized names across every
//! subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, per-operation outcomes |
//! | TRACE | Per-row iteration, high-volume data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "database", "filter", "auth", "convert"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "documents", "tags", "users", "pool"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "create", "list", "search", "attach"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Id of the user whose data is being operated on.
pub const OWNER_ID: &str = "owner_id";

/// Document UUID being operated on.
pub const DOCUMENT_ID: &str = "document_id";

/// Tag UUID being operated on.
pub const TAG_ID: &str = "tag_id";

/// Search term (trimmed) supplied by the caller.
pub const TERM: &str = "term";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of rows returned by a list or search.
pub const RESULT_COUNT: &str = "result_count";

/// Number of rows affected by a write.
pub const ROWS_AFFECTED: &str = "rows_affected";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
