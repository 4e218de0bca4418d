#![warn(
    rust_2018_idioms,
    elided_lifetimes_in_paths,
    clippy::all,
    clippy::nursery
)]

pub mod description;
pub mod error;
pub mod generator;
pub mod params;
pub mod record;

pub use description::*;
pub use error::*;
pub use generator::*;
pub use record::*;
