//! Async client for the Ladle recipe API.
//!
//! A [`LadleClient`] talks to the server through a [`Transport`] and keeps
//! the bearer token in a shared [`Session`]. Any 401 answer evicts the token,
//! after which [`ApiError::redirect`] points the caller at the login page.

mod admin;
mod auth;
mod categories;
mod client;
pub mod config;
pub mod error;
mod favorites;
mod recipes;
mod reviews;
pub mod session;
pub mod transport;
mod uploads;

pub use auth::LoginOutcome;
pub use client::LadleClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::ApiError;
pub use favorites::FavoriteToggle;
pub use recipes::{DeleteOutcome, RecipeFilter, RecipeSort};
pub use session::{FileTokenStore, MemoryTokenStore, Session, StoredSession, TokenStore};
pub use transport::{
    ApiRequest, ApiResponse, Method, MockResponse, MockTransport, ReqwestTransport, RequestBody,
    Transport,
};
