//! Observation port for enrichment outcomes.
//!
//! The coordinator reports what happened to each prediction through this
//! port instead of logging directly, so tests can assert on outcomes and
//! production can emit structured `tracing` events.

use super::PredictionError;

/// Which predictor an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredictorKind {
    Age,
    Gender,
    Nationality,
}

impl PredictorKind {
    /// All predictors, in dispatch order.
    pub const ALL: [Self; 3] = [Self::Age, Self::Gender, Self::Nationality];

    /// Stable label used in log fields.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Gender => "gender",
            Self::Nationality => "nationality",
        }
    }
}

/// Final state of one prediction for one draft.
#[derive(Debug, Clone, PartialEq)]
pub enum EnrichmentOutcome {
    /// The prediction was written into the draft.
    Applied,
    /// The service answered but had no prediction for the name.
    NoPrediction,
    /// The call failed; the field stays unset.
    Failed(PredictionError),
    /// The call did not settle before the enrichment deadline.
    TimedOut,
    /// The call settled after the draft was closed; its result was dropped.
    Discarded,
    /// The worker task panicked; the field stays unset.
    Panicked,
}

/// One observation emitted by the enrichment coordinator.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentEvent {
    pub predictor: PredictorKind,
    /// First name the predictor was asked about.
    pub name: String,
    pub outcome: EnrichmentOutcome,
}

/// Sink for enrichment observations.
///
/// Implementations are invoked from worker tasks and must not block.
#[cfg_attr(test, mockall::automock)]
pub trait EnrichmentObserver: Send + Sync {
    /// Record one outcome.
    fn observe(&self, event: &EnrichmentEvent);
}

/// Observer that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEnrichmentObserver;

impl EnrichmentObserver for NoOpEnrichmentObserver {
    fn observe(&self, _event: &EnrichmentEvent) {}
}
