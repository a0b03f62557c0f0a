//! cafeqa-server: HTTP chat front end for graph question answering.
//!
//! Serves a static chat page and `POST /chat`, which checks the shared
//! token and forwards the message to the question-answering chain.

pub mod app;
pub mod error;
pub mod http;

pub use app::Services;
pub use http::{router, AppState};
