/// Label key used for the per-target metric dimension when none is configured.
pub const DEFAULT_TARGET_LABEL: &str = "test_name";

/// Label value of the implicit target used when discovery is disabled (whole-suite mode).
pub const ANONYMOUS_TARGET: &str = "all";
