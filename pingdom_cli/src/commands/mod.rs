pub mod server;
pub mod version;
