//! Stages of a single alt-text generation run.

use std::fmt;

/// Where a run currently is.
///
/// Runs move forward one stage at a time and end in `Done` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Acquiring,
    Encoding,
    Requesting,
    Aggregating,
    Done,
    Failed,
}

impl Stage {
    /// Move to `next`, logging the transition.
    pub(crate) fn advance(&mut self, next: Stage) {
        tracing::debug!("{self} -> {next}");
        *self = next;
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Acquiring => "acquiring",
            Stage::Encoding => "encoding",
            Stage::Requesting => "requesting",
            Stage::Aggregating => "aggregating",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}
