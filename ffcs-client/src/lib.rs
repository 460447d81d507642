//! Client-side access to the FFCS crystallography database service.

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod transport;
pub mod workflow;

#[cfg(test)]
mod test_util;

pub use client::Client;
pub use error::{Error, Result};
pub use workflow::FragmentChoice;
