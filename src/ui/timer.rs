/// Wait without blocking the UI thread
pub async fn sleep_ms(ms: u32) {
    #[cfg(feature = "hydrate")]
    gloo_timers::future::TimeoutFuture::new(ms).await;

    #[cfg(not(feature = "hydrate"))]
    tokio::time::sleep(std::time::Duration::from_millis(ms.into())).await;
}
