#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = icfes_prep_rust::run().await {
        eprintln!("icfes-prep-rust fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
