use crate::config::Config;
use crate::cors::OriginGuard;
use hlrgw_llm::CompletionClient;
use hlrgw_quota::QuotaLedger;
use std::sync::Arc;

/// Shared application state passed to all handlers
///
/// All resources are wrapped in Arc for efficient sharing across async tasks.
/// The completion strategy is selected once at startup and never re-branched
/// per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub origin_guard: Arc<OriginGuard>,
    pub ledger: Arc<QuotaLedger>,
    pub completion: Arc<dyn CompletionClient>,
}

impl AppState {
    pub fn new(
        config: Config,
        ledger: QuotaLedger,
        completion: Arc<dyn CompletionClient>,
    ) -> Self {
        let origin_guard = OriginGuard::from_list(&config.cors.allowed_origins);
        Self {
            config: Arc::new(config),
            origin_guard: Arc::new(origin_guard),
            ledger: Arc::new(ledger),
            completion,
        }
    }
}
