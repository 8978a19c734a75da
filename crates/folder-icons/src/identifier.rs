//! Icon identifiers and their classification.
//!
//! A user-supplied icon is either the name of a theme icon or the path of an
//! image file. The string is canonicalized once, here, and every other
//! component works with the resulting [`IconIdentifier`].

use std::fmt;
use std::path::Path;

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

/// Image formats accepted for path icons, with their leading dot.
pub const SUPPORTED_EXTENSIONS: [&str; 2] = [".svg", ".png"];

const FILE_SCHEME: &str = "file://";

/// Bytes escaped when a path becomes a URI. `/` stays literal.
const URI_PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// An icon chosen for a directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IconIdentifier {
    /// A theme icon key, e.g. `folder-videos`.
    Named(String),
    /// An absolute path to an image file.
    PathRef(String),
}

impl IconIdentifier {
    /// The raw name or path.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::PathRef(path) => path,
        }
    }

    /// Whether this is a theme icon name.
    pub fn is_named(&self) -> bool {
        matches!(self, Self::Named(_))
    }

    /// Whether this is an image path.
    pub fn is_path(&self) -> bool {
        matches!(self, Self::PathRef(_))
    }

    /// The `file://` URI a path icon is persisted as.
    ///
    /// Reserved and non-ASCII bytes are percent-encoded, so [`canonicalize`]
    /// gives back the original path.
    pub fn to_uri(&self) -> Option<String> {
        match self {
            Self::PathRef(path) => Some(format!(
                "{FILE_SCHEME}{}",
                utf8_percent_encode(path, URI_PATH)
            )),
            Self::Named(_) => None,
        }
    }
}

impl fmt::Display for IconIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decode percent escapes and strip a `file://` scheme.
///
/// Strings that are not URIs are returned decoded but otherwise untouched.
pub fn canonicalize(raw: &str) -> String {
    let without_scheme = raw.strip_prefix(FILE_SCHEME).unwrap_or(raw);
    // Drop a `?query` or `#fragment` the way a URI parser would
    let path = if raw.starts_with(FILE_SCHEME) {
        without_scheme
            .split(['?', '#'])
            .next()
            .unwrap_or(without_scheme)
    } else {
        without_scheme
    };
    percent_decode_str(path).decode_utf8_lossy().into_owned()
}

/// Classify a user-supplied string as a theme icon name or an image path.
///
/// Never fails; an empty string classifies as `Named("")`.
pub fn classify(raw: &str) -> IconIdentifier {
    let canonical = canonicalize(raw);
    if canonical.contains('/') {
        IconIdentifier::PathRef(canonical)
    } else {
        IconIdentifier::Named(canonical)
    }
}

/// The lowercase extension of `path`, dot included; empty when there is none.
pub fn extension(path: &str) -> String {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

/// Whether `path` has one of the [`SUPPORTED_EXTENSIONS`].
pub fn has_supported_extension(path: &str) -> bool {
    SUPPORTED_EXTENSIONS.contains(&extension(path).as_str())
}
