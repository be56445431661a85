//! People Lookup Library
//!
//! This library provides a server-rendered people lookup UI backed by a
//! remote REST service: searching a person's profile, editing contact
//! details and sending a message, plus search analytics, communication
//! history and a backend connection probe.
//!
//! # Modules
//!
//! - `api`: HTTP surface (handlers and views).
//! - `core`: Page state, orchestration and shared models/errors.
//! - `integrations`: Backend client and API diagnostics.
//! - `config`: Configuration management.
//! - `diagnostics`: API tester checks.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers and router.
//! - `models`: Backend and presentation data models.
//! - `people_client`: People lookup backend client.
//! - `render`: HTML views.
//! - `session`: Page state container and orchestrators.

pub mod api;
pub mod core;
pub mod integrations;

pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod people_client;
pub mod render;
pub mod session;
