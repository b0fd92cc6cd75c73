// 数据库调用的取消与超时控制

use crate::data::{DataError, Result};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// 在取消令牌与超时约束下等待数据库调用
///
/// - 令牌先触发：返回 `Cancelled`
/// - 超时先触发：返回 `Timeout`
/// - 调用本身失败：原样返回，由调用方决定如何归类
pub(crate) async fn guarded<T, F>(
    call: F,
    cancel: &CancellationToken,
    timeout: Duration,
    target: impl Fn() -> String,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(DataError::Cancelled(target())),
        outcome = tokio::time::timeout(timeout, call) => match outcome {
            Ok(result) => result,
            Err(_) => Err(DataError::Timeout {
                target: target(),
                millis: timeout.as_millis() as u64,
            }),
        },
    }
}
