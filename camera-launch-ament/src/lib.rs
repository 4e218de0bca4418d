#![warn(
    rust_2018_idioms,
    elided_lifetimes_in_paths,
    clippy::all,
    clippy::nursery
)]

//! Package lookup over the ament resource index.
//!
//! An install prefix registers a package by placing a marker file at
//! `<prefix>/share/ament_index/resource_index/packages/<name>`. Prefixes are
//! searched in order and the first registration wins.

pub mod error;
pub mod index;

pub use error::*;
pub use index::*;
