//! HTTP boundary for extraction: multipart intake, the two extraction
//! endpoints and the service catalogue.

pub mod handlers;
pub mod models;
pub mod multipart_parser;
