//! Placeholder values substituted for missing upstream data.
//!
//! Shared by the row-source boundary, the aggregator and the Q&A engine so
//! the literals live in exactly one place.

/// Customer name used when the source row has no customer column value.
pub const UNKNOWN_CUSTOMER: &str = "Unknown Customer";

/// Author name used when neither the row nor the query names an author.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Wire literal of the "not applicable / no answer" verdict.
pub const NOT_APPLICABLE: &str = "-";
