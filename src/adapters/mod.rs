//! Transport adapter implementations.
//!
//! - `reqwest_transport` - production adapter over HTTP
//! - `mock` - scripted adapter for tests

pub mod mock;
pub mod reqwest_transport;

pub use mock::MockTransport;
pub use reqwest_transport::ReqwestTransport;
