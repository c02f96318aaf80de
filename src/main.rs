use employee_crud::{collection, config, employee, seed};

use anyhow::Context;
use tokio::io::{self, AsyncBufReadExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    employee::define_class_maps().context("failed to register class maps")?;

    let connection: config::ConnectionString = config::DEFAULT_CONNECTION_STRING.parse()?;
    let database = collection::Database::connect(&connection);
    println!("Connection has been established.");
    tracing::info!(%connection, "connected");

    let demonstration = seed::run(&database)
        .await
        .with_context(|| format!("demonstration against {connection} failed"))?;
    tracing::info!(
        count = demonstration.count,
        remaining = demonstration.remaining,
        "demonstration finished"
    );

    let mut line = String::new();
    io::BufReader::new(io::stdin())
        .read_line(&mut line)
        .await
        .context("failed to read from stdin")?;
    Ok(())
}
