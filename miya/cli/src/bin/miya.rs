//! Miya command line tooling

use clap::Parser;
use mcli::cmd::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app = App::parse();
    app.run().await
}
