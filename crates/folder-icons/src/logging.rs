//! Logging targets for the folder icon core.
//!
//! Use these in `tracing` directives, e.g. `folder_icons::metadata=debug`.

/// Target names for log filtering.
pub mod targets {
    /// Attribute queries and writes.
    pub const METADATA: &str = "folder_icons::metadata";
    /// Catalog enumeration and delivery.
    pub const CATALOG: &str = "folder_icons::catalog";
    /// Chooser session transitions.
    pub const SESSION: &str = "folder_icons::session";
    /// Existence checks and previews.
    pub const VALIDATOR: &str = "folder_icons::validator";
}
