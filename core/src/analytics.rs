/// Page-view analytics sink. Fire-and-forget: implementations swallow their
/// own failures and never block the caller.
pub trait AnalyticsSink: Send + Sync {
    fn log_page(&self, page: &str);
}

/// Records page views as `tracing` events under the `analytics` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAnalytics;

impl AnalyticsSink for TracingAnalytics {
    fn log_page(&self, page: &str) {
        tracing::info!(target: "analytics", page, "page view");
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAnalytics;

impl AnalyticsSink for NoopAnalytics {
    fn log_page(&self, _page: &str) {}
}
