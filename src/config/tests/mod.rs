//! Unit tests for configuration loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `field_resolution`: Token, host, organization, and subset resolution
//! - `validation`: Context and credential construction tests

mod helpers;
