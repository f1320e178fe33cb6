//! `tracing`-backed enrichment observer.
//!
//! Outcomes that leave a field unset through a fault are warnings. Empty
//! predictions are informational and applied predictions are debug noise.

use tracing::{debug, info, warn};

use crate::domain::ports::{EnrichmentEvent, EnrichmentObserver, EnrichmentOutcome};

/// Emits one structured log event per enrichment outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEnrichmentObserver;

impl EnrichmentObserver for TracingEnrichmentObserver {
    fn observe(&self, event: &EnrichmentEvent) {
        let predictor = event.predictor.as_str();
        let name = event.name.as_str();
        match &event.outcome {
            EnrichmentOutcome::Applied => debug!(predictor, name, "prediction applied"),
            EnrichmentOutcome::NoPrediction => {
                info!(predictor, name, "predictor returned no prediction");
            }
            EnrichmentOutcome::Failed(error) => {
                warn!(predictor, name, error = %error, "prediction failed");
            }
            EnrichmentOutcome::TimedOut => {
                warn!(predictor, name, "prediction timed out");
            }
            EnrichmentOutcome::Discarded => {
                warn!(predictor, name, "prediction arrived after enrichment closed");
            }
            EnrichmentOutcome::Panicked => {
                warn!(predictor, name, "prediction task panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Smoke coverage; the observer must accept every outcome.
    use super::*;
    use crate::domain::ports::{PredictionError, PredictorKind};
    use rstest::rstest;

    #[rstest]
    #[case(EnrichmentOutcome::Applied)]
    #[case(EnrichmentOutcome::NoPrediction)]
    #[case(EnrichmentOutcome::Failed(PredictionError::transport("refused")))]
    #[case(EnrichmentOutcome::TimedOut)]
    #[case(EnrichmentOutcome::Discarded)]
    #[case(EnrichmentOutcome::Panicked)]
    fn observes_every_outcome(#[case] outcome: EnrichmentOutcome) {
        TracingEnrichmentObserver.observe(&EnrichmentEvent {
            predictor: PredictorKind::Gender,
            name: "Ivan".to_owned(),
            outcome,
        });
    }
}
