//! Name predictor outbound adapters.
//!
//! One generic reqwest adapter, [`HttpNamePredictor`], serves the age,
//! gender and nationality services; the DTO type parameter selects the
//! response shape.

pub mod dto;
mod http_predictor;

pub use http_predictor::{HttpNamePredictor, MAX_BODY_BYTES, PredictorEndpoint};

use dto::{AgifyResponse, GenderizeResponse, NationalizeResponse};

/// Age predictor backed by an agify-compatible service.
pub type AgifyPredictor = HttpNamePredictor<AgifyResponse>;
/// Gender predictor backed by a genderize-compatible service.
pub type GenderizePredictor = HttpNamePredictor<GenderizeResponse>;
/// Nationality predictor backed by a nationalize-compatible service.
pub type NationalizePredictor = HttpNamePredictor<NationalizeResponse>;
