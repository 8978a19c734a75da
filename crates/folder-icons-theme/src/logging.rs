//! Logging targets for the icon theme layer.
//!
//! This crate logs through `tracing` and never installs a subscriber. Use
//! these targets in `tracing` directives to filter by subsystem.

/// Target names for log filtering.
pub mod targets {
    /// Theme activation and degraded-mode fallbacks.
    pub const THEME: &str = "folder_icons_theme::theme";
    /// `index.theme` discovery.
    pub const LOADER: &str = "folder_icons_theme::loader";
    /// Name lookups.
    pub const RESOLVER: &str = "folder_icons_theme::resolver";
}
