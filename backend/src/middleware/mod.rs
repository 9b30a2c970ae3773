//! Request middleware.
//!
//! Purpose: attach per-request context (trace identifier and request path)
//! used by logging and error rendering.

pub mod trace;

pub use trace::Trace;
