pub mod http;
pub mod observers;
pub mod pushshift;
pub mod storage;
