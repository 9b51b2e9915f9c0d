//! Component slugs and the export names derived from them.

use std::borrow::Borrow;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// File extensions recognized as component modules.
pub const COMPONENT_EXTENSIONS: [&str; 2] = ["tsx", "jsx"];

/// Suffix tried after the exact candidate name fails to match.
pub const COMPONENT_SUFFIX: &str = "Component";

static COMPONENT_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(tsx|jsx)$").expect("Invalid component file regex"));

/// URL path segment identifying one component page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Create a slug from a string. No validation is applied; an empty slug
    /// is representable so the resolver can reject it.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Derive a slug from a component file name by stripping its extension.
    ///
    /// Returns `None` for files without a component extension, and for a
    /// bare extension such as `.tsx`.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        if !COMPONENT_FILE_RE.is_match(file_name) {
            return None;
        }

        let stem = COMPONENT_FILE_RE.replace(file_name, "");
        if stem.is_empty() {
            return None;
        }

        Some(Self(stem.into_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Upper-camel-case export name expected for this slug.
    ///
    /// `agent-card` becomes `AgentCard`. Only the first character of each
    /// hyphen-separated segment is changed.
    pub fn candidate_name(&self) -> String {
        self.0.split('-').map(capitalize).collect()
    }

    /// Candidate name with the `Component` suffix appended.
    pub fn suffixed_candidate_name(&self) -> String {
        format!("{}{}", self.candidate_name(), COMPONENT_SUFFIX)
    }

    /// Human readable label, used for navigation entries.
    pub fn title(&self) -> String {
        self.0
            .split('-')
            .filter(|s| !s.is_empty())
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Slug {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Slug {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Slug {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Capitalize first letter of a string.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
