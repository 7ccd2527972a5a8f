//! Shared constants for the builder crate.

// ── Layout ──────────────────────────────────────────────────────

/// Group class marking a node as a side-by-side row container.
pub const ROW_CLASS: &str = "row";

/// Column class assigned to each side of a two-up split (6 of 12 columns).
pub const COL_SPAN_HALF: &str = "col-span-6";

// ── Keys ────────────────────────────────────────────────────────

/// Infix between the original key and the random suffix of a duplicated key.
pub const COPY_KEY_INFIX: &str = "_copy_";

/// Prefix for keys of fields created from the palette.
pub const NEW_FIELD_KEY_PREFIX: &str = "field";

/// Number of hex characters in a random key suffix.
pub const KEY_SUFFIX_LEN: usize = 8;

/// Separator used to address a path key (`["address", "street"]`) as one string.
pub const KEY_PATH_SEPARATOR: &str = ".";

// ── Store ───────────────────────────────────────────────────────

/// Title a fresh form starts with.
pub const DEFAULT_FORM_TITLE: &str = "Untitled Form";

/// Maximum number of undo entries kept before the oldest is evicted.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

// ── Export ──────────────────────────────────────────────────────

/// File stem used for exports when the form title is blank.
pub const DEFAULT_EXPORT_STEM: &str = "form-settings";

/// Extension of exported documents.
pub const EXPORT_EXTENSION: &str = "json";
