//! Retag progress tracking

use std::fmt;

/// Stages of a single retag run, in the order they are reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Init,
    Validated,
    SessionReady,
    DigestResolved,
    TagRemoved,
    TagApplied,
    Reported,
    /// Terminal; reached from any stage when a step errors
    Failed,
}

impl Stage {
    /// The stage that follows this one, if any
    pub fn next(self) -> Option<Stage> {
        match self {
            Self::Init => Some(Self::Validated),
            Self::Validated => Some(Self::SessionReady),
            Self::SessionReady => Some(Self::DigestResolved),
            Self::DigestResolved => Some(Self::TagRemoved),
            Self::TagRemoved => Some(Self::TagApplied),
            Self::TagApplied => Some(Self::Reported),
            Self::Reported | Self::Failed => None,
        }
    }

    /// Whether the registry has been modified without the tag being reattached
    pub fn leaves_tag_unbound(self) -> bool {
        self == Self::TagRemoved
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Validated => "validated",
            Self::SessionReady => "session-ready",
            Self::DigestResolved => "digest-resolved",
            Self::TagRemoved => "tag-removed",
            Self::TagApplied => "tag-applied",
            Self::Reported => "reported",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
