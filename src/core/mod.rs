//! Dashboard pipeline and its HTTP surface

pub mod http;
pub mod pipeline;

pub use http::*;
pub use pipeline::*;
