//! Cryptographic helpers for login.

pub mod kdf;

pub use kdf::{KeyDerivation, KeyDeriver};
