//! Session state.

mod store;

pub use store::{Session, SessionStore};
