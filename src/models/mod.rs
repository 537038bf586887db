//! Data models for the badge catalog.
//!
//! `Badge` mirrors the published badge records; the rest are derived views over them.

mod badge;
mod card;
mod catalog;
mod filter;

pub use badge::*;
pub use card::*;
pub use catalog::*;
pub use filter::*;

#[cfg(test)]
pub(crate) use badge::fixtures;
