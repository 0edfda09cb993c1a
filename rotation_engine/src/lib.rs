//! Rotates short cards (prices, weather, calendar) onto a Dot e-ink display.
//!
//! [`scheduler::RotationScheduler`] drives the loop, asking a
//! [`content::ContentSource`] for each card and handing it to a
//! [`sender::DisplaySender`]. Data comes from the `display_feeds` providers.

pub mod clock;
pub mod config;
pub mod content;
pub mod health;
pub mod icons;
pub mod indicator;
pub mod scheduler;
pub mod sender;
