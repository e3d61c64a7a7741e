use std::sync::Arc;

use anyhow::Context;

use stockguard_api::app::{AppHooks, build_app};
use stockguard_api::settings::Settings;
use stockguard_events::{Notifier, TracingNotifier};
use stockguard_infra::SubmissionHooks;
use stockguard_infra::record_store::{HttpRecordStore, RecordStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stockguard_observability::init();

    let settings = Settings::from_env()?;

    let store: Arc<dyn RecordStore> = Arc::new(HttpRecordStore::new(&settings.store)?);
    let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);
    let hooks: AppHooks = SubmissionHooks::new(store, settings.guard.clone(), notifier)?;

    let app = build_app(Arc::new(hooks));

    let listener = tokio::net::TcpListener::bind(&settings.bind)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        dataset = %settings.guard.inventory_dataset,
        "listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
