//! Predictor HTTP adapter against a stub service over a real socket.

mod support;

use std::time::{Duration, Instant};

use namesake::domain::ports::{
    AgePrediction, GenderPrediction, NamePredictor, NationalityPrediction, PredictionError,
};
use namesake::outbound::predictors::{AgifyPredictor, GenderizePredictor, NationalizePredictor};
use rstest::rstest;

use support::{API_TOKEN, spawn_stub_predictors};

const TIMEOUT: Duration = Duration::from_secs(2);

#[actix_web::test]
async fn decodes_each_service_shape() {
    let stub = spawn_stub_predictors();

    let age: AgePrediction = AgifyPredictor::new(stub.endpoint("agify"), TIMEOUT)
        .expect("client")
        .predict("Ivan")
        .await
        .expect("age prediction");
    let gender: GenderPrediction = GenderizePredictor::new(stub.endpoint("genderize"), TIMEOUT)
        .expect("client")
        .predict("Ivan")
        .await
        .expect("gender prediction");
    let nationality: NationalityPrediction =
        NationalizePredictor::new(stub.endpoint("nationalize"), TIMEOUT)
            .expect("client")
            .predict("Ivan")
            .await
            .expect("nationality prediction");

    assert_eq!(age.age, Some(42));
    assert_eq!(gender.gender.as_deref(), Some("male"));
    assert_eq!(nationality.first_country(), Some("UA"));
    assert_eq!(nationality.countries.len(), 2);
    stub.stop().await;
}

#[actix_web::test]
async fn null_answer_is_an_empty_prediction() {
    let stub = spawn_stub_predictors();

    let age = AgifyPredictor::new(stub.endpoint("agify"), TIMEOUT)
        .expect("client")
        .predict("Nobody")
        .await
        .expect("empty prediction is not an error");

    assert_eq!(age, AgePrediction { age: None });
    stub.stop().await;
}

#[actix_web::test]
async fn sends_bearer_token_and_encoded_name() {
    let stub = spawn_stub_predictors();

    let reflected = GenderizePredictor::new(stub.endpoint("echo"), TIMEOUT)
        .expect("client")
        .predict("Анна Мария")
        .await
        .expect("echo prediction");

    assert_eq!(
        reflected.gender.as_deref(),
        Some(format!("Bearer {API_TOKEN}|Анна Мария").as_str())
    );
    stub.stop().await;
}

#[rstest]
#[case::wrong_token("agify", "wrong-token", 401)]
#[case::rate_limited("rejects", API_TOKEN, 429)]
#[actix_web::test]
async fn non_success_status_is_remote_rejection(
    #[case] path: &str,
    #[case] token: &str,
    #[case] expected: u16,
) {
    let stub = spawn_stub_predictors();

    let err = AgifyPredictor::new(stub.endpoint_with_token(path, token), TIMEOUT)
        .expect("client")
        .predict("Ivan")
        .await
        .expect_err("rejected");

    match err {
        PredictionError::RemoteRejected { status, body } => {
            assert_eq!(status, expected);
            assert!(!body.contains('\n'));
        }
        other => panic!("expected remote rejection, got {other:?}"),
    }
    stub.stop().await;
}

#[actix_web::test]
async fn oversized_body_is_a_decode_error() {
    let stub = spawn_stub_predictors();

    let err = AgifyPredictor::new(stub.endpoint("huge"), TIMEOUT)
        .expect("client")
        .predict("Ivan")
        .await
        .expect_err("body over the cap");

    assert!(
        matches!(&err, PredictionError::Decode { message } if message.contains("exceeds")),
        "unexpected error: {err:?}"
    );
    stub.stop().await;
}

#[actix_web::test]
async fn slow_service_times_out_as_transport_error() {
    let stub = spawn_stub_predictors();
    let started = Instant::now();

    let err = AgifyPredictor::new(stub.endpoint("slow"), Duration::from_millis(200))
        .expect("client")
        .predict("Ivan")
        .await
        .expect_err("timed out");

    assert!(matches!(err, PredictionError::Transport { .. }));
    assert!(started.elapsed() < support::STALL);
    stub.stop().await;
}

#[actix_web::test]
async fn unreachable_service_is_a_transport_error() {
    let stub = spawn_stub_predictors();
    let endpoint = stub.endpoint("agify");
    stub.stop().await;

    let err = AgifyPredictor::new(endpoint, TIMEOUT)
        .expect("client")
        .predict("Ivan")
        .await
        .expect_err("connection refused");

    assert!(matches!(err, PredictionError::Transport { .. }));
}
