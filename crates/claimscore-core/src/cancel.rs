//! Cancellation helpers shared by judge and pipeline call sites

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::{EvalError, Result};

/// Run `fut` unless `token` is cancelled first.
///
/// Cancellation wins ties so a cancelled run never starts another call.
pub async fn run_cancellable<T>(
    token: &CancellationToken,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(EvalError::Cancelled),
        result = fut => result,
    }
}
