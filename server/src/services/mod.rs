// verdant-server/src/services/mod.rs

pub mod firebase;
pub mod stripe;

pub use firebase::FirebaseVerifier;
pub use stripe::StripeGateway;
