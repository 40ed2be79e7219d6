#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = prepflow_rust::run().await {
        eprintln!("prepflow-rust fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
