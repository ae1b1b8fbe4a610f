//! Waste collection calendar server.
//!
//! A read-only HTTP API over municipal collection dates and drop-off
//! stations. Routes are generated at startup from a declarative catalog of
//! regions, waste types and query parameters; calendar routes can also be
//! exported as iCalendar feeds.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod feed;
pub mod query;
pub mod routes;
pub mod store;
pub mod web;
