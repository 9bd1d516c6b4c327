//! HTTP Handlers

mod probe;
mod session;

pub use probe::*;
pub use session::*;
