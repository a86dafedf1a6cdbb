//! Domain layer containing business entities and storage contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click tracking event model
//! - [`click_worker`] - Background worker applying click increments
//!
//! # Click Processing Flow
//!
//! 1. [`crate::application::services::RedirectService`] resolves a code
//! 2. A [`click_event::ClickEvent`] is pushed onto a bounded channel
//! 3. [`click_worker::run_click_worker`] applies the increment with retries
//! 4. Failures are logged and counted, never reported to the redirect

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
