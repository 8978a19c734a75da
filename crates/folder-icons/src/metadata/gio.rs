//! Attribute storage through the `gio` command line tool.
//!
//! GVfs keeps `metadata::*` attributes in its own database, so reading and
//! writing them goes through `gio info` and `gio set`. Each attribute is
//! written by its own invocation so that one failure does not hide the
//! outcome of the others.

use std::path::Path;
use std::process::{Command, Output};

use tracing::{debug, trace, warn};

use super::{ANY_ATTRIBUTE, AttributeBackend, AttributeChange, AttributeSet, STANDARD_ICON};
use crate::error::{MetadataError, Result};
use crate::logging::targets;

/// Attributes requested from `gio info`.
const QUERY_ATTRIBUTES: &str = "standard::icon,metadata::*";

/// Backend that shells out to `gio`.
#[derive(Debug, Clone)]
pub struct GioBackend {
    program: String,
}

impl Default for GioBackend {
    fn default() -> Self {
        Self {
            program: "gio".to_string(),
        }
    }
}

impl GioBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different executable in place of `gio`.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The executable invoked.
    pub fn program(&self) -> &str {
        &self.program
    }

    fn run(&self, dir: &Path, attribute: &str, command: &mut Command) -> Result<Output> {
        let output = command.output().map_err(|e| {
            MetadataError::unsupported(dir, format!("failed to run {}: {e}", self.program))
        })?;

        if output.status.success() {
            Ok(output)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(classify_failure(dir, attribute, stderr.trim()))
        }
    }

    fn write(&self, dir: &Path, change: &AttributeChange) -> Result<()> {
        let mut command = Command::new(&self.program);
        match change {
            AttributeChange::Set(key, value) => {
                command.arg("set").arg(dir).arg(key).arg(value);
            }
            AttributeChange::Unset(key) => {
                command.args(["set", "-t", "unset"]).arg(dir).arg(key);
            }
        }
        trace!(target: targets::METADATA, dir = %dir.display(), ?change, "gio set");
        self.run(dir, change.key(), &mut command).map(|_| ())
    }
}

impl AttributeBackend for GioBackend {
    fn query(&self, dir: &Path) -> Result<AttributeSet> {
        if !dir.is_dir() {
            return Err(MetadataError::not_found(dir));
        }

        let mut command = Command::new(&self.program);
        command.args(["info", "-a", QUERY_ATTRIBUTES]).arg(dir);
        let output = self.run(dir, ANY_ATTRIBUTE, &mut command)?;

        let attributes = parse_info(&String::from_utf8_lossy(&output.stdout));
        debug!(
            target: targets::METADATA,
            dir = %dir.display(),
            count = attributes.len(),
            "queried attributes"
        );
        Ok(attributes)
    }

    fn apply(&self, dir: &Path, changes: &[AttributeChange]) -> Vec<(String, MetadataError)> {
        if !dir.is_dir() {
            return vec![(ANY_ATTRIBUTE.to_string(), MetadataError::not_found(dir))];
        }

        let mut failures = Vec::new();
        for change in changes {
            if let Err(err) = self.write(dir, change) {
                warn!(target: targets::METADATA, dir = %dir.display(), attribute = change.key(), error = %err, "attribute write failed");
                failures.push((change.key().to_string(), err));
            }
        }
        failures
    }
}

/// Map `gio` error output onto an error kind.
fn classify_failure(dir: &Path, attribute: &str, stderr: &str) -> MetadataError {
    let lower = stderr.to_lowercase();
    if lower.contains("no such file") {
        MetadataError::not_found(dir)
    } else if lower.contains("not supported") || lower.contains("read-only") {
        MetadataError::unsupported(dir, stderr)
    } else {
        MetadataError::io(dir, attribute, stderr)
    }
}

/// Parse the `attributes:` section of `gio info` output.
///
/// `standard::icon` is a themed icon printed as a comma-separated list of
/// names; only the first, most specific, name is kept.
pub(crate) fn parse_info(output: &str) -> AttributeSet {
    let mut attributes = AttributeSet::new();
    let mut in_attributes = false;

    for line in output.lines() {
        if !in_attributes {
            in_attributes = line.trim_end() == "attributes:";
            continue;
        }
        if !line.starts_with(' ') {
            break;
        }

        let Some((key, value)) = line.trim().split_once(": ") else {
            continue;
        };
        let value = if key == STANDARD_ICON {
            value.split(',').next().unwrap_or(value).trim()
        } else {
            value
        };
        if !value.is_empty() {
            attributes.insert(key, value);
        }
    }

    attributes
}
