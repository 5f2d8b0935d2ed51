use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Open `url` in the default browser once `delay` has elapsed.
///
/// Fire-and-forget: nothing waits on the handle, and a failure is only
/// logged.
pub fn open_after(url: String, delay: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;

        let target = url.clone();
        match tokio::task::spawn_blocking(move || webbrowser::open(&target)).await {
            Ok(Ok(())) => info!(%url, "opened browser"),
            Ok(Err(err)) => warn!(%url, error = %err, "failed to open browser"),
            Err(err) => warn!(%url, error = %err, "browser task panicked"),
        }
    })
}
