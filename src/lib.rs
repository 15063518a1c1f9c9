//! # AniFriends Backend Library
//!
//! Backend for matching animal shelters with volunteers. Shelters post volunteer
//! recruitments and animal records; volunteers search recruitments, apply, and
//! review the volunteering they attended.
//!
//! ## Architecture
//!
//! Requests flow handler → service → repository:
//!
//! - [`routes`]: axum handlers and the router with its middleware stack
//! - [`services`]: existence and ownership checks, validation, response mapping
//! - [`repository`]: SQL over a shared SQLite pool
//! - [`query`] and [`filter`]: the predicate builder behind the searches
//! - [`cache`]: the recruitment count cache
//! - [`pagination`]: page requests, has-next detection and page info
//!
//! Supporting modules: [`config`], [`db`], [`error`], [`metrics`], [`middleware`],
//! [`models`], [`state`] and [`types`].

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod query;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
