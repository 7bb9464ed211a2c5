//! Shared HTTP and HTML helpers.

pub mod html;
pub mod http;
