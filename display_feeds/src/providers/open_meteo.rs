//! Open-Meteo forecast API (no key required).

pub mod provider;
pub mod response;

pub use provider::OpenMeteoProvider;
