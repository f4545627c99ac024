//! Route handler modules

pub mod reports;
