//! Paging engine for a remotely served, annotated document.
//!
//! Pages are fetched on demand through a [`service::DocumentService`], kept
//! in a never-evicting [`cache::PageStore`] and prefetched around the reading
//! position. Navigation, the side drawer and page swipes are driven through
//! [`app::App`] by a single [`app::Session`] loop.

pub mod app;
pub mod cache;
pub mod config;
pub mod diff;
pub mod error;
pub mod gesture;
pub mod model;
pub mod motion;
pub mod prefetch;
pub mod service;
pub mod settings;
