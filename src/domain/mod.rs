pub mod api;
pub mod envelope;
pub mod storage;
pub mod todo;
