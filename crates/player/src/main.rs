//! Covey player - headless composition root binary.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    covey_player::runner::run().await
}
