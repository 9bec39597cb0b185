// core/src/lib.rs

//! Shared foundation for the shopfront server and client.
//!
//! - [`pipeline`]: a small async step-pipeline engine. Server workflows
//!   (signup, login, cart mutations) are declared as ordered named steps
//!   operating on a shared [`ContextData`], and dispatched through a
//!   [`PipelineRegistry`] keyed by context type.
//! - [`money`]: integer-cent prices that travel as two-decimal JSON numbers.
//! - [`wire`]: JSON request/response shapes of the REST surface, plus the
//!   error body and its normalization into a single readable message.

pub mod error;
pub mod money;
pub mod pipeline;
pub mod wire;

pub use crate::error::PipelineError;
pub use crate::money::{Money, MoneyError};
pub use crate::pipeline::{
  ContextData, Handler, Pipeline, PipelineControl, PipelineRegistry, PipelineResult, SkipCondition, StepDef,
};
