//! Task tracker library
//!
//! This library exposes the application core: task stores, services and
//! the commands a UI shell invokes.

pub mod app;
pub mod backend;
pub mod commands;
pub mod config;
pub mod database;
pub mod error;
pub mod events;
pub mod services;
pub mod store;
