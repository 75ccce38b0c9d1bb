//! Stage names and terminal outcomes

use crate::error::PipelineError;
use crate::runtime::InstallOptions;
use std::fmt;
use std::path::PathBuf;

/// The stages, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageName {
    Validate,
    SafetyCheck,
    Configure,
    Render,
    Install,
}

/// Fixed stage order
pub const STAGES: [StageName; 5] = [
    StageName::Validate,
    StageName::SafetyCheck,
    StageName::Configure,
    StageName::Render,
    StageName::Install,
];

impl StageName {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageName::Validate => "validate",
            StageName::SafetyCheck => "safety-check",
            StageName::Configure => "configure",
            StageName::Render => "render",
            StageName::Install => "install",
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a stage tells the controller to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Abort(AbortReason),
}

/// Orderly, expected reasons to stop early
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AbortReason {
    InvalidName,
    UserDeclined,
}

/// What a completed run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub element_name: String,
    pub project_dir: PathBuf,
    /// Files written, relative to `project_dir`, in render order
    pub files: Vec<PathBuf>,
    pub include_tests: bool,
    pub install: InstallOptions,
}

/// How a run ended
#[derive(Debug)]
pub enum TerminalStatus {
    Completed(Summary),
    AbortedByUser,
    AbortedByValidation,
    Failed(PipelineError),
}

impl TerminalStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, TerminalStatus::Completed(_))
    }

    /// Process exit status for this outcome
    pub fn exit_code(&self) -> u8 {
        match self {
            TerminalStatus::Completed(_) => 0,
            TerminalStatus::AbortedByUser => 1,
            TerminalStatus::AbortedByValidation => 2,
            TerminalStatus::Failed(_) => 1,
        }
    }
}

impl AbortReason {
    pub(crate) fn status(self) -> TerminalStatus {
        match self {
            AbortReason::InvalidName => TerminalStatus::AbortedByValidation,
            AbortReason::UserDeclined => TerminalStatus::AbortedByUser,
        }
    }
}
