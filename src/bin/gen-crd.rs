use kube::CustomResourceExt;
use servegroup::crd::model_serving::ModelServing;
use tracing::info;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays a clean manifest
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Use: cargo run --bin gen-crd | python3 -c "import sys,json,yaml; print(yaml.dump(json.load(sys.stdin), default_flow_style=False))"
    // to convert to YAML
    let crd = ModelServing::crd();
    let name = crd.metadata.name.clone().unwrap_or_default();

    let json_output = serde_json::to_string_pretty(&crd)?;
    println!("{}", json_output);

    info!(crd = %name, "Generated CustomResourceDefinition");
    Ok(())
}
