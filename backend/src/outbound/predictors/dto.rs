//! DTOs for decoding predictor JSON responses.
//!
//! Each response shape decodes into its transport DTO first and is then
//! mapped into the matching domain prediction. Fields the domain ignores
//! (`count`, `name`, gender `probability`) are not declared. Mapping fails
//! for values a user record cannot hold.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::ports::{
    AgePrediction, CountryProbability, GenderPrediction, NationalityPrediction, PredictionError,
};

/// Wire shape mapped into a domain prediction.
pub trait PredictionDto: DeserializeOwned {
    /// Domain prediction produced by this response.
    type Prediction: Send + 'static;

    fn into_prediction(self) -> Result<Self::Prediction, PredictionError>;
}

/// `{"count": 1, "name": "ivan", "age": 30}`; `age` is `null` for unknown names.
#[derive(Debug, Deserialize)]
pub struct AgifyResponse {
    #[serde(default)]
    age: Option<u32>,
}

impl PredictionDto for AgifyResponse {
    type Prediction = AgePrediction;

    fn into_prediction(self) -> Result<AgePrediction, PredictionError> {
        AgePrediction { age: self.age }.checked()
    }
}

/// `{"count": 1, "name": "ivan", "gender": "male", "probability": 0.99}`.
#[derive(Debug, Deserialize)]
pub struct GenderizeResponse {
    #[serde(default)]
    gender: Option<String>,
}

impl PredictionDto for GenderizeResponse {
    type Prediction = GenderPrediction;

    fn into_prediction(self) -> Result<GenderPrediction, PredictionError> {
        Ok(GenderPrediction {
            gender: self.gender,
        })
    }
}

/// `{"count": 1, "name": "ivan", "country": [{"country_id": "RU", "probability": 0.7}]}`.
#[derive(Debug, Deserialize)]
pub struct NationalizeResponse {
    #[serde(default)]
    country: Vec<CountryDto>,
}

#[derive(Debug, Deserialize)]
struct CountryDto {
    country_id: String,
    #[serde(default)]
    probability: f64,
}

impl PredictionDto for NationalizeResponse {
    type Prediction = NationalityPrediction;

    fn into_prediction(self) -> Result<NationalityPrediction, PredictionError> {
        Ok(NationalityPrediction {
            countries: self
                .country
                .into_iter()
                .map(|country| CountryProbability {
                    country_code: country.country_id,
                    probability: country.probability,
                })
                .collect(),
        })
    }
}
