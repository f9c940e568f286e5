pub mod cancel;
pub mod curl;
pub mod send;

pub use cancel::{cancel_pair, CancelSource, CancelToken};
pub use curl::detect_curl;
pub use send::{AssistantClient, SendOptions};
