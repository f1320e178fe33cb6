//! Driven port for name-based demographic predictors.
//!
//! Each predictor answers one question about a first name (likely age,
//! gender or nationality). Predictions are best effort: a remote service may
//! have no answer for a name, which is a successful empty prediction rather
//! than an error.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::check_age;

define_port_error! {
    /// Failures raised while asking a remote predictor about a name.
    pub enum PredictionError {
        /// The request never produced a response (connect failure, timeout,
        /// or cancellation).
        Transport { message: String } => "prediction transport failed: {message}",
        /// The remote service answered with a non-success status.
        RemoteRejected { status: u16, body: String } =>
            "prediction service rejected the request with status {status}: {body}",
        /// The response body could not be decoded.
        Decode { message: String } => "prediction response decode failed: {message}",
    }
}

/// Predicted age for a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AgePrediction {
    /// `None` when the service has no data for the name.
    pub age: Option<u32>,
}

impl AgePrediction {
    /// Reject a predicted age no user record can hold.
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError::Decode`] when the age exceeds
    /// [`crate::domain::MAX_AGE`].
    pub fn checked(self) -> Result<Self, PredictionError> {
        match self.age.map(check_age).transpose() {
            Ok(_) => Ok(self),
            Err(err) => Err(PredictionError::decode(err.to_string())),
        }
    }
}

/// Predicted gender for a name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenderPrediction {
    /// `None` when the service has no data for the name.
    pub gender: Option<String>,
}

/// One candidate nationality with its probability.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryProbability {
    pub country_code: String,
    pub probability: f64,
}

/// Candidate nationalities for a name, in the order the service returned them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NationalityPrediction {
    pub countries: Vec<CountryProbability>,
}

impl NationalityPrediction {
    /// The country listed first by the service.
    ///
    /// The list is never re-sorted by probability: the service's own order is
    /// authoritative.
    ///
    /// # Examples
    /// ```
    /// use namesake::domain::ports::{CountryProbability, NationalityPrediction};
    ///
    /// let prediction = NationalityPrediction {
    ///     countries: vec![
    ///         CountryProbability { country_code: "UA".into(), probability: 0.3 },
    ///         CountryProbability { country_code: "RU".into(), probability: 0.7 },
    ///     ],
    /// };
    /// assert_eq!(prediction.first_country(), Some("UA"));
    /// ```
    pub fn first_country(&self) -> Option<&str> {
        self.countries
            .first()
            .map(|country| country.country_code.as_str())
    }
}

/// A remote lookup keyed by first name.
///
/// Implementations must be cheap to share across tasks; the enrichment
/// coordinator calls all predictors concurrently through `Arc<dyn ...>`.
#[async_trait]
pub trait NamePredictor<P>: Send + Sync {
    /// Ask the remote service about `name`. No retries are attempted.
    async fn predict(&self, name: &str) -> Result<P, PredictionError>;
}

/// Predictor that always reports "no prediction".
///
/// Useful for local runs without credentials for the remote services.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureNamePredictor;

#[async_trait]
impl<P> NamePredictor<P> for FixtureNamePredictor
where
    P: Default + Send + 'static,
{
    async fn predict(&self, _name: &str) -> Result<P, PredictionError> {
        Ok(P::default())
    }
}
