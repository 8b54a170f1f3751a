//! Client for the IT-vendor openings portal.
//!
//! The view-models in [`views`] own the state of each page and drive the
//! backend through [`api::PortalApi`]. [`state::AppState`] wires them to a
//! real HTTP client and a [`presenter::Presenter`]; the `vendor-portal`
//! binary is a thin command-line shell over the same types.

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod models;
pub mod presenter;
pub mod render;
pub mod routes;
pub mod state;
pub mod upload;
pub mod views;
