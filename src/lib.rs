pub mod api;
pub mod models;
pub mod pipeline;
pub mod schema;
pub mod ui;
pub mod utils;
