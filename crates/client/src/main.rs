use account_registration_client::{
    form::{FormSettings, FormView, RegistrationForm},
    handler::{ConsoleNavigator, ConsolePresenter},
    runtime::FormRuntime,
    state::AppState,
};
use anyhow::{Context, Result};
use dotenv::dotenv;
use shared::{
    config::Config,
    domain::request::RegisterRequest,
    schema::RegistrationSchema,
    utils::init_logger,
};
use std::{sync::Arc, time::Duration};
use tokio::sync::watch;
use tracing::{info, warn};

const LOOKUP_WAIT: Duration = Duration::from_secs(10);
const LOOKUP_WAIT_MARGIN: Duration = Duration::from_secs(1);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv().ok();

    init_logger("account-registration");

    let config = Config::init().context("Failed to load configuration")?;

    let path = std::env::args()
        .nth(1)
        .context("Usage: account-registration <record.json>")?;
    let raw = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read {path}"))?;
    let record: RegisterRequest =
        serde_json::from_str(&raw).with_context(|| format!("Failed to parse {path}"))?;

    let state = AppState::new(config)
        .await
        .context("Failed to create AppState")?;

    let form = RegistrationForm::new(
        RegistrationSchema::default(),
        FormSettings::from(&state.config),
    );
    let (runtime, handle) = FormRuntime::new(
        form,
        &state.di_container,
        Arc::new(ConsoleNavigator),
        Arc::new(ConsolePresenter),
    );
    let form_task = tokio::spawn(runtime.run());
    let mut views = handle.subscribe();

    let zip_code = record.address.zip_code.clone();
    for (field, value) in record.fields() {
        handle.set_field(field, value)?;
    }

    let lookup_wait = state.config.lookup_timeout.unwrap_or(LOOKUP_WAIT) + LOOKUP_WAIT_MARGIN;
    if !handle.wait_for_lookup(&zip_code, lookup_wait).await {
        warn!("Address lookup for {zip_code} did not settle, submitting the address as given");
    }
    handle.submit()?;

    wait_until_settled(&mut views).await;
    // the runtime already stopped if it navigated away
    let _ = handle.shutdown();

    let final_view = form_task.await.context("Form runtime panicked")?;

    if let Some(message) = final_view.state.failure_message() {
        warn!("Registration failed: {message}");
    } else if !final_view.field_errors.is_empty() {
        warn!(
            "Registration blocked by {} invalid field(s)",
            final_view.field_errors.len()
        );
    } else {
        info!("Registration finished");
    }

    info!("Metrics:\n{}", state.encode_metrics().await?);

    Ok(())
}

/// Returns once the submission failed or was blocked by validation, or the
/// runtime stopped after navigating away.
async fn wait_until_settled(views: &mut watch::Receiver<FormView>) {
    let _ = views
        .wait_for(|view| view.state.is_failure() || !view.field_errors.is_empty())
        .await;
}
