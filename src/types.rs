use std::future::Future;
use std::pin::Pin;

/// Boxed, `Send` future returned by the object-safe collaborator traits
/// (scripts, command runner, monit client, job supervisors).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
