//! Simulation Lead Capture API Library
//!
//! Receives simulation requests from the website form, validates the CPF,
//! stores the lead and answers with a pre-filled message for contacting the
//! business over WhatsApp.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `db`: Database connection and pool management.
//! - `db_storage`: Lead storage operations.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `models`: Request, row and response models.
//! - `routes`: Router and middleware assembly.
//! - `services`: Submission workflow and contact message.
//! - `validation`: CPF validation.

pub mod config;
pub mod db;
pub mod db_storage;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validation;
