//! Fakes and fixtures shared by gqlvis tests.

pub mod fixtures;
mod transport;

pub use transport::{FakeTransport, Request};
