use crate::error::DispatchError;
use async_trait::async_trait;
use hlrgw_types::ChatMessage;

/// Fixed sampling temperature for both strategies
pub(crate) const TEMPERATURE: f32 = 0.2;

/// One upstream completion call.
///
/// The strategy behind this trait is selected once at construction from
/// configuration and never re-branched per request. Implementations raise
/// [`DispatchError::EmptyResponse`] when the extracted text is empty.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<String, DispatchError>;
}
