//! Upload status shared by records, addresses and custom fields

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Progress of one entity through a single upload pass.
///
/// `Unset` is written as JSON `null` so result files stay compatible with the
/// cleaning pipeline output, which leaves `upload_status` empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UploadStatus {
    /// Not yet touched in this pass
    #[default]
    Unset,
    /// Work has started
    Processing,
    /// Entity and every sub-entity were created
    Success,
    /// Entity was created but some sub-entities were not
    Partial,
    /// Entity could not be created
    Failed,
}

impl UploadStatus {
    /// Wire name, `None` for [`UploadStatus::Unset`]
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            Self::Unset => None,
            Self::Processing => Some("processing"),
            Self::Success => Some("success"),
            Self::Partial => Some("partial"),
            Self::Failed => Some("failed"),
        }
    }

    /// Whether no further automatic transition happens in this run
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Partial | Self::Failed)
    }

    /// Whether moving from `self` to `next` keeps the pass monotonic.
    ///
    /// Terminal values only ever move to themselves.
    pub fn can_transition_to(&self, next: UploadStatus) -> bool {
        match (self, next) {
            (current, next) if *current == next => true,
            (Self::Unset, _) => true,
            (Self::Processing, next) => next.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or("unset"))
    }
}

impl std::str::FromStr for UploadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "unset" => Ok(Self::Unset),
            "processing" => Ok(Self::Processing),
            "success" => Ok(Self::Success),
            "partial" => Ok(Self::Partial),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown upload status '{}'", other)),
        }
    }
}

impl Serialize for UploadStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_str() {
            Some(name) => serializer.serialize_str(name),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for UploadStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(Self::Unset),
            Some(value) => value.parse().map_err(de::Error::custom),
        }
    }
}
