#![forbid(unsafe_code)]

//! Policy-as-data configuration for sortable lists.
//!
//! [`ListPolicy`] gathers every tunable of a list (axis, capacity, hover
//! behaviour, gesture threshold, flash length, drag kinds) in one struct
//! that can be loaded from TOML or JSON.
//!
//! # Loading
//!
//! ```toml
//! # sortkit.toml
//! axis = "horizontal"
//! max_items = 5
//! sticky_targets = true
//! allowed_edges = ["left", "right"]
//! drag_threshold = 3
//! flash_duration_ms = 700
//! ```
//!
//! ```rust,ignore
//! let policy = ListPolicy::from_toml_file("sortkit.toml")?;
//! let policy = ListPolicy::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! `ListPolicy::default()` is a horizontal reference-image strip: at most
//! five items, sticky targets, left/right edges only.

#[cfg(feature = "policy-config")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "policy-config")]
use serde::{Deserialize, Serialize};
use sortkit_core::edge::{AllowedEdges, Axis, Edge};
use sortkit_core::gesture::GestureConfig;
use sortkit_core::item::DragKind;
use sortkit_core::session::SessionConfig;

/// Tunable parameters for one sortable list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct ListPolicy {
    /// Layout direction.
    pub axis: Axis,
    /// Maximum number of items. Appends past this fail.
    pub max_items: usize,
    /// Keep the last hovered target when the pointer leaves into a gap.
    pub sticky_targets: bool,
    /// Sides targets may report. Empty means the pair along `axis`.
    pub allowed_edges: Vec<Edge>,
    /// Manhattan distance (cells) before a press becomes a drag.
    pub drag_threshold: u16,
    /// Whether Escape cancels a drag.
    pub cancel_on_escape: bool,
    /// Length of the post-move highlight.
    pub flash_duration_ms: u64,
    /// Drag kind carried by this list's items.
    pub kind: String,
    /// Drag-kind patterns the list accepts. Empty accepts every kind.
    pub accepts: Vec<String>,
    /// Item length along the axis, for strip layouts.
    pub item_extent: u16,
    /// Cells between items, for strip layouts.
    pub gap: u16,
}

impl Default for ListPolicy {
    fn default() -> Self {
        Self {
            axis: Axis::Horizontal,
            max_items: 5,
            sticky_targets: true,
            allowed_edges: vec![Edge::Left, Edge::Right],
            drag_threshold: 3,
            cancel_on_escape: true,
            flash_duration_ms: 700,
            kind: DragKind::DEFAULT.to_string(),
            accepts: vec![DragKind::DEFAULT.to_string()],
            item_extent: 8,
            gap: 1,
        }
    }
}

impl ListPolicy {
    /// Load from a TOML string.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, PolicyConfigError> {
        toml::from_str(s).map_err(PolicyConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, PolicyConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(PolicyConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "policy-config")]
    pub fn from_json_str(s: &str) -> Result<Self, PolicyConfigError> {
        serde_json::from_str(s).map_err(PolicyConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PolicyConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(PolicyConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Load from a file, picking the format from its extension (`.json`,
    /// anything else is read as TOML).
    #[cfg(feature = "policy-config")]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PolicyConfigError> {
        let path = path.as_ref();
        if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        {
            Self::from_json_file(path)
        } else {
            Self::from_toml_file(path)
        }
    }

    /// Serialize as TOML.
    #[cfg(feature = "policy-config")]
    pub fn to_toml_string(&self) -> Result<String, PolicyConfigError> {
        toml::to_string(self).map_err(PolicyConfigError::TomlSerialize)
    }

    /// Check every parameter. An empty list means the policy is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_items == 0 {
            errors.push("max_items must be > 0".into());
        }

        if !self.allowed_edges.is_empty()
            && !self
                .allowed_edges
                .iter()
                .any(|edge| edge.axis() == self.axis)
        {
            errors.push(format!(
                "allowed_edges must include an edge along the {} axis",
                self.axis
            ));
        }

        if self.kind.trim().is_empty() {
            errors.push("kind must not be empty".into());
        }

        if self.accepts.iter().any(|pattern| pattern.trim().is_empty()) {
            errors.push("accepts must not contain empty patterns".into());
        }

        if !self.accepts.is_empty() {
            let kind = DragKind::new(self.kind.as_str());
            if !self.accepts.iter().any(|pattern| kind.matches(pattern)) {
                errors.push(format!(
                    "accepts {:?} does not match the list's own kind {:?}",
                    self.accepts, self.kind
                ));
            }
        }

        if self.item_extent == 0 {
            errors.push("item_extent must be > 0".into());
        }

        errors
    }

    /// Return the policy if it validates.
    pub fn validated(self) -> Result<Self, PolicyConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(PolicyConfigError::Validation(errors))
        }
    }

    /// Session settings derived from this policy.
    #[must_use]
    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig {
            axis: self.axis,
            sticky_targets: self.sticky_targets,
        }
    }

    /// Gesture settings derived from this policy.
    #[must_use]
    pub fn to_gesture_config(&self) -> GestureConfig {
        GestureConfig {
            drag_threshold: self.drag_threshold,
            cancel_on_escape: self.cancel_on_escape,
        }
    }

    /// Allowed edges as a set, or `None` when targets use the axis pair.
    #[must_use]
    pub fn allowed_edge_set(&self) -> Option<AllowedEdges> {
        let set: AllowedEdges = self.allowed_edges.iter().copied().collect();
        if set.is_empty() || set == AllowedEdges::along(self.axis) {
            None
        } else {
            Some(set)
        }
    }

    /// Drag kind carried by the list's items.
    #[must_use]
    pub fn drag_kind(&self) -> DragKind {
        DragKind::new(self.kind.as_str())
    }

    /// Post-move highlight length.
    #[must_use]
    pub fn flash_duration(&self) -> Duration {
        Duration::from_millis(self.flash_duration_ms)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a list policy.
#[derive(Debug)]
pub enum PolicyConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "policy-config")]
    Toml(toml::de::Error),
    /// TOML serialization error.
    #[cfg(feature = "policy-config")]
    TomlSerialize(toml::ser::Error),
    /// JSON parse error.
    #[cfg(feature = "policy-config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for PolicyConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "policy-config")]
            Self::TomlSerialize(e) => write!(f, "TOML serialize error: {e}"),
            #[cfg(feature = "policy-config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for PolicyConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "policy-config")]
            Self::TomlSerialize(e) => Some(e),
            #[cfg(feature = "policy-config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
