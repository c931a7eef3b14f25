//! Readers for third-party table formats

pub mod fold;
