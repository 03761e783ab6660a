use std::sync::Arc;

use nekoinbox_core::{config::Config, delivery::HttpDeliveryClient, messaging::port::SubmissionSink};

#[tokio::main]
async fn main() -> Result<(), nekoinbox_core::Error> {
    nekoinbox_core::logging::init("nekoinbox")?;

    let cfg = Arc::new(Config::load()?);
    cfg.warn_if_incomplete();

    // One pooled client for the whole process; per-attempt timeouts come from the policy.
    let http = reqwest::Client::builder()
        .timeout(cfg.delivery_timeout)
        .build()
        .map_err(|e| nekoinbox_core::Error::External(format!("http client build failed: {e}")))?;

    let sink: Option<Arc<dyn SubmissionSink>> = cfg.backend().map(|backend| {
        let client = HttpDeliveryClient::new(http.clone(), &backend, cfg.delivery_policy());
        tracing::info!(url = %client.url(), "delivering submissions to backend");
        Arc::new(client) as Arc<dyn SubmissionSink>
    });

    nekoinbox_telegram::router::run_polling(cfg, sink)
        .await
        .map_err(|e| nekoinbox_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
