use serde::Deserialize;

/// The `{success, message, data}` wrapper every endpoint answers with.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(message: impl Into<String>, data: Option<T>) -> Self {
        Self { success: true, message: message.into(), data }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into(), data: None }
    }

    /// Payload on success, otherwise the server's message, or `fallback` when
    /// the server sent none.
    pub fn into_result(self, fallback: &str) -> Result<Option<T>, String> {
        if self.success {
            Ok(self.data)
        } else if self.message.trim().is_empty() {
            Err(fallback.to_string())
        } else {
            Err(self.message)
        }
    }
}
