//! Engine-wide constants
//!
//! Single source of truth for the numbers the mutators and the
//! orchestrator share.

/// Random mutator step counts
pub mod mutation {
    /// Fewest local mutations attempted per mutant
    pub const MIN_STEPS: usize = 2;
    /// Most local mutations attempted per mutant
    pub const MAX_STEPS: usize = 6;
    /// Category/operation draws before a step is skipped
    pub const MAX_SELECTION_RETRIES: usize = 10;
    /// Share of icon replacements drawn from the primary icon family
    pub const PRIMARY_ICON_FAMILY_SHARE: f64 = 0.7;
    /// Chance that an inserted node is a small container instead of a leaf
    pub const NESTED_INSERT_CHANCE: f64 = 0.2;
}

/// Orchestrator and persistence defaults
pub mod run {
    /// Records per batch file
    pub const BATCH_SIZE: u64 = 100;
    /// Valid items between progress log lines
    pub const PROGRESS_INTERVAL: u64 = 100;
    /// Attempt ceiling per requested document (0 disables the ceiling)
    pub const MAX_ATTEMPTS_PER_ITEM: u64 = 100;
}

/// Theme and size role thresholds
pub mod roles {
    /// Text at or above this size is primary
    pub const PRIMARY_FONT_SIZE: f64 = 24.0;
    /// Text at or above this weight is primary
    pub const PRIMARY_FONT_WEIGHT: u32 = 600;
    /// Text at or above this size is secondary
    pub const SECONDARY_FONT_SIZE: f64 = 16.0;
    /// Text at or above this weight is secondary
    pub const SECONDARY_FONT_WEIGHT: u32 = 500;
    /// Font size at or above which text counts as a title when resizing
    pub const TITLE_FONT_SIZE: f64 = 20.0;
    /// Font size at or above which text counts as a subtitle when resizing
    pub const SUBTITLE_FONT_SIZE: f64 = 16.0;
    /// Icons below this size are small
    pub const SMALL_ICON: f64 = 20.0;
    /// Icons below this size (and not small) are medium
    pub const MEDIUM_ICON: f64 = 32.0;
}
