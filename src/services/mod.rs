pub mod sentiment;
pub mod visualization_client;
