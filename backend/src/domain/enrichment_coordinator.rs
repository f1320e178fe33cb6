//! Concurrent enrichment of user drafts.
//!
//! The coordinator asks the age, gender and nationality predictors about the
//! same name at once and merges whichever answers arrive into the draft.
//! Enrichment is best effort: any subset of predictors may fail or time out
//! and the caller still gets a draft back.
//!
//! Worker tasks share one draft behind a whole-draft mutex. When the
//! coordinator stops waiting (all tasks settled, or the deadline passed) it
//! closes the draft, so a result that lands afterwards is discarded rather
//! than merged. Outstanding calls are aborted at the same time, and dropping
//! the `enrich` future aborts them as well.
//!
//! Workers run on the runtime given to
//! [`EnrichmentCoordinator::on_runtime`], so a multi-thread runtime puts the
//! three calls on separate threads even when the caller is a single-threaded
//! actix worker. Without one they run on the caller's runtime.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::{self, JoinSet};
use tracing::error;

use super::ports::{
    AgePrediction, EnrichmentEvent, EnrichmentObserver, EnrichmentOutcome, GenderPrediction,
    NamePredictor, NationalityPrediction, PredictionError, PredictorKind,
};
use super::{TraceId, UserDraft};

/// The single draft field a prediction fills.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DraftField {
    Age(u32),
    Gender(String),
    CountryCode(String),
}

impl DraftField {
    fn write(self, draft: &mut UserDraft) {
        match self {
            Self::Age(age) => draft.set_age(age),
            Self::Gender(gender) => draft.set_gender(gender),
            Self::CountryCode(code) => draft.set_country_code(code),
        }
    }
}

trait IntoDraftField {
    /// `Ok(None)` when the service had nothing to say about the name.
    fn into_draft_field(self) -> Result<Option<DraftField>, PredictionError>;
}

impl IntoDraftField for AgePrediction {
    fn into_draft_field(self) -> Result<Option<DraftField>, PredictionError> {
        Ok(self.checked()?.age.map(DraftField::Age))
    }
}

impl IntoDraftField for GenderPrediction {
    fn into_draft_field(self) -> Result<Option<DraftField>, PredictionError> {
        Ok(self
            .gender
            .filter(|gender| !gender.trim().is_empty())
            .map(DraftField::Gender))
    }
}

impl IntoDraftField for NationalityPrediction {
    fn into_draft_field(self) -> Result<Option<DraftField>, PredictionError> {
        Ok(self
            .first_country()
            .map(|code| DraftField::CountryCode(code.to_owned())))
    }
}

struct DraftSlot {
    draft: UserDraft,
    open: bool,
}

/// Draft shared between the coordinator and its worker tasks.
#[derive(Clone)]
struct SharedDraft(Arc<Mutex<DraftSlot>>);

impl SharedDraft {
    fn new(draft: UserDraft) -> Self {
        Self(Arc::new(Mutex::new(DraftSlot { draft, open: true })))
    }

    /// Write one field. Returns `false` once the draft has been closed.
    fn merge(&self, field: DraftField) -> bool {
        let mut slot = self.lock();
        if !slot.open {
            return false;
        }
        field.write(&mut slot.draft);
        true
    }

    /// Stop accepting writes and hand back the draft as it stands.
    fn close(&self) -> UserDraft {
        let mut slot = self.lock();
        slot.open = false;
        slot.draft.clone()
    }

    fn lock(&self) -> MutexGuard<'_, DraftSlot> {
        // Writers only ever set one optional field, so a poisoned draft is
        // still consistent.
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Fans a draft out to the three predictors and joins the results.
#[derive(Clone)]
pub struct EnrichmentCoordinator {
    age: Arc<dyn NamePredictor<AgePrediction>>,
    gender: Arc<dyn NamePredictor<GenderPrediction>>,
    nationality: Arc<dyn NamePredictor<NationalityPrediction>>,
    observer: Arc<dyn EnrichmentObserver>,
    runtime: Option<Handle>,
}

impl EnrichmentCoordinator {
    /// Coordinate the given predictors, reporting outcomes to `observer`.
    pub fn new(
        age: Arc<dyn NamePredictor<AgePrediction>>,
        gender: Arc<dyn NamePredictor<GenderPrediction>>,
        nationality: Arc<dyn NamePredictor<NationalityPrediction>>,
        observer: Arc<dyn EnrichmentObserver>,
    ) -> Self {
        Self {
            age,
            gender,
            nationality,
            observer,
            runtime: None,
        }
    }

    /// Run worker tasks on `runtime` instead of the caller's runtime.
    #[must_use]
    pub fn on_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Enrich `draft` using the draft's first name, waiting at most `timeout`.
    ///
    /// Never fails. Predictions that fail, come back empty, or miss the
    /// deadline leave their field unset and are reported to the observer.
    /// Total latency is that of the slowest predictor, capped by `timeout`.
    pub async fn enrich(&self, draft: UserDraft, timeout: Duration) -> UserDraft {
        let name = draft.name().as_str().to_owned();
        let shared = SharedDraft::new(draft);

        let mut workers = Workers::new(self.runtime.clone());
        workers.spawn(
            PredictorKind::Age,
            predict_into(
                PredictorKind::Age,
                Arc::clone(&self.age),
                name.clone(),
                shared.clone(),
                Arc::clone(&self.observer),
            ),
        );
        workers.spawn(
            PredictorKind::Gender,
            predict_into(
                PredictorKind::Gender,
                Arc::clone(&self.gender),
                name.clone(),
                shared.clone(),
                Arc::clone(&self.observer),
            ),
        );
        workers.spawn(
            PredictorKind::Nationality,
            predict_into(
                PredictorKind::Nationality,
                Arc::clone(&self.nationality),
                name.clone(),
                shared.clone(),
                Arc::clone(&self.observer),
            ),
        );

        let mut settled = Vec::with_capacity(PredictorKind::ALL.len());
        let joined = tokio::time::timeout(timeout, async {
            while let Some(result) = workers.tasks.join_next().await {
                match result {
                    Ok(kind) => settled.push(kind),
                    Err(err) => {
                        let Some(kind) = workers.kinds.get(&err.id()).copied() else {
                            error!(error = %err, name = %name, "unknown enrichment task failed");
                            continue;
                        };
                        error!(
                            error = %err,
                            name = %name,
                            predictor = kind.as_str(),
                            "enrichment task failed"
                        );
                        let outcome = if err.is_panic() {
                            EnrichmentOutcome::Panicked
                        } else {
                            EnrichmentOutcome::Failed(PredictionError::transport(
                                "enrichment task cancelled",
                            ))
                        };
                        settled.push(kind);
                        self.observer.observe(&EnrichmentEvent {
                            predictor: kind,
                            name: name.clone(),
                            outcome,
                        });
                    }
                }
            }
        })
        .await;

        let draft = shared.close();
        if joined.is_err() {
            workers.tasks.abort_all();
            for kind in PredictorKind::ALL {
                if !settled.contains(&kind) {
                    self.observer.observe(&EnrichmentEvent {
                        predictor: kind,
                        name: name.clone(),
                        outcome: EnrichmentOutcome::TimedOut,
                    });
                }
            }
        }
        draft
    }
}

/// Worker tasks of one enrichment, keyed back to their predictor.
struct Workers {
    tasks: JoinSet<PredictorKind>,
    kinds: HashMap<task::Id, PredictorKind>,
    runtime: Option<Handle>,
}

impl Workers {
    fn new(runtime: Option<Handle>) -> Self {
        Self {
            tasks: JoinSet::new(),
            kinds: HashMap::with_capacity(PredictorKind::ALL.len()),
            runtime,
        }
    }

    fn spawn<F>(&mut self, kind: PredictorKind, work: F)
    where
        F: std::future::Future<Output = PredictorKind> + Send + 'static,
    {
        let work = TraceId::propagate(work);
        let handle = match &self.runtime {
            Some(runtime) => self.tasks.spawn_on(work, runtime),
            None => self.tasks.spawn(work),
        };
        self.kinds.insert(handle.id(), kind);
    }
}

async fn predict_into<P>(
    kind: PredictorKind,
    predictor: Arc<dyn NamePredictor<P>>,
    name: String,
    draft: SharedDraft,
    observer: Arc<dyn EnrichmentObserver>,
) -> PredictorKind
where
    P: IntoDraftField + Send + 'static,
{
    let field = predictor
        .predict(&name)
        .await
        .and_then(IntoDraftField::into_draft_field);
    let outcome = match field {
        Ok(Some(field)) => {
            if draft.merge(field) {
                EnrichmentOutcome::Applied
            } else {
                EnrichmentOutcome::Discarded
            }
        }
        Ok(None) => EnrichmentOutcome::NoPrediction,
        Err(error) => EnrichmentOutcome::Failed(error),
    };
    observer.observe(&EnrichmentEvent {
        predictor: kind,
        name,
        outcome,
    });
    kind
}
