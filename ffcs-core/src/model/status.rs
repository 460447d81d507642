//! Per-stage workflow status and the rules for moving it.
//!
//! Each of the three treatment stages keeps its own status on the well,
//! moving `null/pending -> exported`, with soaking additionally reaching
//! `done` once the Echo transfer is confirmed.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WorkflowStatus {
    Pending,
    Exported,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Stage {
    Soak,
    Cryo,
    Redesolve,
}

impl Stage {
    #[must_use]
    pub fn status_field(self) -> &'static str {
        match self {
            Self::Soak => "soakStatus",
            Self::Cryo => "cryoStatus",
            Self::Redesolve => "redesolveStatus",
        }
    }

    #[must_use]
    pub fn export_time_field(self) -> &'static str {
        match self {
            Self::Soak => "soakExportTime",
            Self::Cryo => "cryoExportTime",
            Self::Redesolve => "redesolveExportTime",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Transition {
    /// Treatment parameters were attached to the well.
    SetPending,
    /// Treatment parameters were removed from the well.
    Clear,
    Export,
    /// The Echo confirmed the transfer. Soaking only.
    Complete,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TransitionPolicy {
    /// Every status only ever moves forward, and never twice.
    #[default]
    Forward,
    /// Like `Forward`, but an export or completion may be re-applied.
    AllowRepeat,
}

impl TransitionPolicy {
    /// The status a well lands in after `transition`, given its current
    /// status for `stage`.
    ///
    /// # Errors
    /// [`Error::Transition`] if the move is not permitted.
    pub fn check(
        self,
        stage: Stage,
        from: Option<WorkflowStatus>,
        transition: Transition,
    ) -> Result<Option<WorkflowStatus>> {
        use WorkflowStatus::{Done, Exported, Pending};

        let repeat = self == Self::AllowRepeat;

        let to = match (transition, from) {
            (Transition::SetPending, None | Some(Pending)) => Some(Some(Pending)),
            (Transition::Clear, None | Some(Pending)) => Some(None),
            (Transition::Export, None | Some(Pending)) => Some(Some(Exported)),
            (Transition::Export, Some(Exported)) if repeat => Some(Some(Exported)),
            (Transition::Complete, Some(Exported)) if stage == Stage::Soak => Some(Some(Done)),
            (Transition::Complete, Some(Done)) if stage == Stage::Soak && repeat => Some(Some(Done)),
            _ => None,
        };

        to.ok_or_else(|| Error::Transition {
            stage: stage.to_string(),
            from: from.map_or_else(|| "null".to_string(), |s| s.to_string()),
            attempted: transition.to_string(),
        })
    }
}
