pub mod http_port;
pub mod observer;
pub mod search_backend;
