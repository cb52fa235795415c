// verdant/src/lib.rs

//! Verdant: the domain core of a small plant storefront.
//!
//! Sellers list plants, buyers pay for them through a hosted checkout page,
//! and a completed payment is turned into an order exactly once. This crate
//! holds everything that does not touch the network or a database:
//!
//!  - Plant and order models with their JSON wire shape.
//!  - Store, payment gateway and identity contracts (async traits).
//!  - A small named-step pipeline engine with a shared, lockable context.
//!  - The checkout session builder and the fulfillment pipeline.
//!  - [`MemoryStore`], an in-process implementation of every store contract.
//!
//! Concrete adapters (Postgres, Stripe, Firebase) live in `verdant-server`.

pub mod checkout;
pub mod error;
pub mod identity;
pub mod memory;
pub mod models;
pub mod payment;
pub mod pipeline;
pub mod store;
pub mod storefront;

pub use crate::checkout::{CheckoutBackends, CheckoutRequest, CheckoutSettings, FulfillmentOutcome};
pub use crate::error::{GatewayError, IdentityError, StoreError, VerdantError, VerdantResult};
pub use crate::identity::{IdentityVerifier, VerifiedCaller};
pub use crate::memory::MemoryStore;
pub use crate::payment::PaymentGateway;
pub use crate::pipeline::{ContextData, Pipeline, PipelineControl, PipelineResult};
pub use crate::storefront::Storefront;
