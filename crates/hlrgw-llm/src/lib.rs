pub mod direct;
pub mod error;
pub mod fault;
pub mod gateway;
pub mod provider;
pub mod traits;

pub use direct::DirectBindingClient;
pub use error::DispatchError;
pub use fault::classify_fault;
pub use gateway::OpenAICompatClient;
pub use provider::{ClientFactory, ProviderConfig};
pub use traits::CompletionClient;
