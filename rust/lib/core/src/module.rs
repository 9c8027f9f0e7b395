use axum::Router;

/// A feature module that contributes HTTP routes to the server.
///
/// The binary collects modules and nests each one's router under
/// `/{name}`.
pub trait Module: Send + Sync {
    /// Route prefix and log label.
    fn name(&self) -> &str;

    /// Routes with state already applied.
    fn routes(&self) -> Router;
}
