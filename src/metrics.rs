use prometheus::{IntCounter, Registry};
use std::sync::LazyLock;

pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

pub static SESSIONS_CREATED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "gateway_sessions_created_total",
        "Total number of sandbox sessions created",
    )
    .unwrap()
});

pub static KEYS_ISSUED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new("gateway_keys_issued_total", "Total number of API keys issued").unwrap()
});

pub static KEYS_ROTATED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "gateway_keys_rotated_total",
        "Total number of API key rotations",
    )
    .unwrap()
});

pub static CHECKOUTS_CREATED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "gateway_checkouts_created_total",
        "Total number of checkouts created",
    )
    .unwrap()
});

pub static WEBHOOKS_REGISTERED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "gateway_webhooks_registered_total",
        "Total number of webhook registrations",
    )
    .unwrap()
});

pub static FALLBACK_ATTEMPTS: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "gateway_fallback_attempts_total",
        "Times a primary backend route failed and a legacy route was attempted",
    )
    .unwrap()
});

pub static UPSTREAM_ERRORS: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "gateway_upstream_errors_total",
        "Backend calls that surfaced an error to the caller",
    )
    .unwrap()
});

/// Register all metrics with the registry
pub fn register_metrics() {
    REGISTRY
        .register(Box::new(SESSIONS_CREATED.clone()))
        .unwrap();
    REGISTRY.register(Box::new(KEYS_ISSUED.clone())).unwrap();
    REGISTRY.register(Box::new(KEYS_ROTATED.clone())).unwrap();
    REGISTRY
        .register(Box::new(CHECKOUTS_CREATED.clone()))
        .unwrap();
    REGISTRY
        .register(Box::new(WEBHOOKS_REGISTERED.clone()))
        .unwrap();
    REGISTRY
        .register(Box::new(FALLBACK_ATTEMPTS.clone()))
        .unwrap();
    REGISTRY
        .register(Box::new(UPSTREAM_ERRORS.clone()))
        .unwrap();
}
