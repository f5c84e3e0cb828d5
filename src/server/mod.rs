pub mod config;
mod http_layers;
pub mod metrics;
mod pages;
pub mod presentation;
mod search;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use http_layers::*;
use search::make_search_routes;
pub use search::{search_artists, MAX_QUERY_CHARS};
pub use server::{make_app, run_server};
