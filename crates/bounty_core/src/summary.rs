use crate::PlatformOutcome;

/// Counters for the end-of-run status line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub platforms_checked: usize,
    pub platforms_failed: usize,
    pub programs_seen: usize,
    pub changes: usize,
    pub delisted: usize,
}

impl RunSummary {
    pub(crate) fn from_outcomes(outcomes: &[PlatformOutcome], changes: usize) -> Self {
        let mut summary = Self {
            changes,
            ..Self::default()
        };
        for outcome in outcomes {
            match outcome {
                PlatformOutcome::Checked {
                    programs, delisted, ..
                } => {
                    summary.platforms_checked += 1;
                    summary.programs_seen += programs;
                    summary.delisted += delisted.len();
                }
                PlatformOutcome::Failed { .. } => summary.platforms_failed += 1,
            }
        }
        summary
    }
}
