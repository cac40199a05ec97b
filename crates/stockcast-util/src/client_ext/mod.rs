pub mod predict;

pub use reqwest::Client;
