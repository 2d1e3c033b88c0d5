use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ANONYMOUS_TARGET;

/// One independently runnable unit of test work.
///
/// The name doubles as the metric label value. The location is the resolved path
/// the runner invocation is scoped to; the anonymous target has none and runs the whole suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<PathBuf>,
}

impl Target {
    /// Create a target discovered at `location`.
    pub fn new<N, L>(name: N, location: L) -> Self
    where
        N: Into<String>,
        L: Into<PathBuf>,
    {
        Self {
            name: name.into(),
            location: Some(location.into()),
        }
    }

    /// The implicit target used when no discovery is configured.
    pub fn anonymous() -> Self {
        Self {
            name: ANONYMOUS_TARGET.to_string(),
            location: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    /// Returns `true` for the whole-suite target, which must not be scoped.
    pub fn is_anonymous(&self) -> bool {
        self.location.is_none()
    }
}
