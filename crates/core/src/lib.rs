#![warn(clippy::all, missing_docs)]

//! Core domain logic for the estoque terminal app.
//!
//! This crate hosts the product data model, the in-memory inventory
//! store, form validation, navigation routes, and configuration handling
//! used by the terminal UI and any future frontends.

pub mod config;
pub mod inventory;
pub mod models;
pub mod route;

pub use config::AppConfig;
pub use inventory::{Inventory, ZeroPolicy};
pub use models::{Field, Item, ItemDraft, ValidationError, Violation};
pub use route::{Route, RouteError};
