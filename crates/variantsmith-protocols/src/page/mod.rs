//! Page model: the captured element database and generation requests.

mod element;
mod database;
mod request;

pub use element::*;
pub use database::*;
pub use request::*;
