//! Client for the calendar service: countdown to a yearly date and solar to lunar conversion.
//!
//! The service is self-hosted; its base URL comes from configuration.

pub mod provider;
pub mod response;

pub use provider::CalendarApiProvider;
