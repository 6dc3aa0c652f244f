use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("gemchat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("gemchat.client.request_errors");

pub(crate) static SESSION_SENDS: Counter = Counter::new("gemchat.session.sends");
pub(crate) static SESSION_RETRIES: Counter = Counter::new("gemchat.session.retries");
pub(crate) static SESSION_RETRIES_EXHAUSTED: Counter =
    Counter::new("gemchat.session.retries_exhausted");
pub(crate) static SESSION_RETRY_BACKOFF: Moments =
    Moments::new("gemchat.session.retry_backoff_seconds");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);

    collector.register_counter(&SESSION_SENDS);
    collector.register_counter(&SESSION_RETRIES);
    collector.register_counter(&SESSION_RETRIES_EXHAUSTED);
    collector.register_moments(&SESSION_RETRY_BACKOFF);
}
