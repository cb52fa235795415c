// verdant/src/pipeline/mod.rs

//! A small named-step pipeline engine.
//!
//! A pipeline is an ordered list of named steps over a shared, lockable
//! context. Each step has one or more async handlers; a handler either lets
//! the run continue or stops it early. Workflows such as checkout fulfillment
//! are declared as pipelines so each decision point gets its own step name in
//! the trace.

pub mod context;
pub mod control;
pub mod definition;
pub mod execution;

pub use context::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use definition::{Handler, Pipeline, PipelineError};
