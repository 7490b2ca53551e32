//! Accounts: registration, login, and token refresh.

pub mod service;
pub mod store;

pub use service::{AccountService, NewAccount};
pub use store::{MemoryUserStore, UserStore};
