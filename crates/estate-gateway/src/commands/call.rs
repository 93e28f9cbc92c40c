use anyhow::Context;
use estate_core::{ContractCall, OperationName};
use estate_gateway::{logging, Gateway, GatewayConfig};
use std::path::Path;
use tracing::debug;

pub async fn run(
    config_path: Option<&Path>,
    verbose: bool,
    operation: &str,
    args: &[String],
) -> anyhow::Result<()> {
    let config = GatewayConfig::load(config_path).context("Failed to load configuration")?;
    logging::init(&config.logging.filter, verbose)?;

    config
        .require_persistent_ledger()
        .context("Refusing to run a call against a throwaway ledger")?;

    let name: OperationName = operation.parse()?;
    let call = ContractCall::from_args(name, args)?;
    debug!(operation = %name, query = name.is_query(), "dispatching call");

    let gateway = Gateway::connect(&config)
        .await
        .context("Failed to connect gateway")?;
    let outcome = gateway.lifecycle().dispatch(call).await;
    gateway.close();

    println!("{}", serde_json::to_string_pretty(&outcome?)?);
    Ok(())
}
