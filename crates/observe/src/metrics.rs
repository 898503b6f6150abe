use std::sync::OnceLock;

/// Global metrics registry used by all components.
static REGISTRY: OnceLock<prometheus_metric_storage::StorageRegistry> = OnceLock::new();

/// Get the global instance of the metric storage registry.
///
/// The registry is created with default settings on first use, so metrics
/// can be registered from unit tests without any setup. Embedding
/// applications export it through [`prometheus_metric_storage::StorageRegistry::registry`].
pub fn get_storage_registry() -> &'static prometheus_metric_storage::StorageRegistry {
    REGISTRY.get_or_init(prometheus_metric_storage::StorageRegistry::default)
}
