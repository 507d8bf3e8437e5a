//! Display-only label normalization.
//!
//! The clustering pipeline tags rows it could not place with a sentinel
//! category. Users see it as "General". Filtering and export always use the
//! raw stored value.

/// Sentinel category value stored in the data.
pub const UNCLUSTERED: &str = "Unclustered";

/// User-facing name for the sentinel category.
pub const GENERAL: &str = "General";

/// Map a stored label to the name shown to the user.
pub fn display_label(label: &str) -> &str {
    if label == UNCLUSTERED {
        GENERAL
    } else {
        label
    }
}
