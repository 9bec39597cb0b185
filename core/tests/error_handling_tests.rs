// tests/error_handling_tests.rs
mod common;

use common::*;
use shopfront_core::{ContextData, Pipeline, PipelineControl, PipelineError};
use serial_test::serial;

#[tokio::test]
#[serial]
async fn test_pipeline_run_catches_handler_missing() {
  setup_tracing();
  let pipeline = Pipeline::<TestContext, TestError>::new(&[("missing", false, None)]);
  let result = pipeline.run(ContextData::new(TestContext::default())).await;
  match result.unwrap_err() {
    TestError::Engine(s) => {
      assert!(s.contains("HandlerMissing"));
      assert!(s.contains("missing"));
    }
    other => panic!("Expected TestError::Engine(HandlerMissing), got {:?}", other),
  }
}

#[tokio::test]
#[serial]
async fn test_pipeline_with_engine_error_type() {
  setup_tracing();
  let mut failing = Pipeline::<TestContext, PipelineError>::new(&[("fail_task", false, None)]);
  failing.on_root("fail_task", |_ctx| {
    Box::pin(async move { Err(PipelineError::Internal("Intentional".to_string())) })
  });
  match failing.run(ContextData::new(TestContext::default())).await.unwrap_err() {
    PipelineError::Internal(s) => assert_eq!(s, "Intentional"),
    other => panic!("Expected PipelineError::Internal, got {:?}", other),
  }
}

#[tokio::test]
#[serial]
async fn test_anyhow_errors_are_wrapped_as_handler_errors() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, PipelineError>::new(&[("io", false, None)]);
  pipeline.on_root("io", |_ctx: ContextData<TestContext>| {
    Box::pin(async move {
      let parsed: Result<i32, _> = "not a number".parse::<i32>();
      parsed.map_err(anyhow::Error::from)?;
      Ok::<PipelineControl, PipelineError>(PipelineControl::Continue)
    })
  });

  let err = pipeline.run(ContextData::new(TestContext::default())).await.unwrap_err();
  assert!(matches!(err, PipelineError::HandlerError { .. }));
  assert!(err.to_string().contains("invalid digit"));
}
