//! # Blogstore Shared
//!
//! Shapes used at the HTTP boundary. They mirror entity fields and carry no
//! mapping or validation metadata; translation to entities happens in the API.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
