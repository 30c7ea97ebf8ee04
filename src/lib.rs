//! Rostrum - edition lifecycle and content resolution
//!
//! Client-side core for a recurring multi-year conference platform. The
//! remote content service owns durable storage; this crate mirrors its
//! contract: which yearly edition is active, how a request with or
//! without an explicit year resolves to one edition's content, and how
//! calls to the service tolerate transient failures.

pub mod client;
pub mod config;
pub mod edition;
pub mod interfaces;
pub mod registry;
pub mod resolve;
pub mod utils;
