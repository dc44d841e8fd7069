pub mod webhook;

pub use webhook::{AppState, SECRET_TOKEN_HEADER};
