pub mod file_store;
pub mod http_api;
#[cfg(test)]
pub mod memory_store;
