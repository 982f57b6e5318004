//! Protocol module for generation request/response structures
//!
//! This module defines the provider-agnostic request and result types that flow
//! between the story layer, the router and the provider adapters.

pub mod types;

pub use types::{
    CallKind, ErrorKind, GenerationRequest, GenerationResult, DEFAULT_MAX_TOKENS,
    DEFAULT_TEMPERATURE, MAX_TEMPERATURE,
};
