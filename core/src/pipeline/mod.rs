// core/src/pipeline/mod.rs

//! Ordered, named async steps over a shared context.
//!
//! A [`Pipeline<TData, Err>`] is declared with its step list up front and
//! handlers are attached per step with `on_root`. Each handler receives a
//! clone of the [`ContextData<TData>`] handle and returns [`PipelineControl`]
//! to continue or halt the run.

pub mod context_data;
pub mod control;
pub mod definition;
pub mod execution;
pub mod hooks;
pub mod registry;
pub mod step;

pub use context_data::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use definition::Pipeline;
pub use hooks::Handler;
pub use registry::PipelineRegistry;
pub use step::{SkipCondition, StepDef};
