use crate::error::StoreError;

pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Durable string key-value storage, the local mirror of session state.
pub trait TokenStore: Send + 'static {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}
