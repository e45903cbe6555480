//! MongoDB client factory for the bookstore service.

use std::time::Duration;

use anyhow::Context;
use bookstore_kernel::settings::DatabaseSettings;
use mongodb::{bson::doc, options::ClientOptions, Client, Database};

/// Build the client options described by `settings`.
///
/// The server-selection timeout bounds how long the first operation waits
/// for a reachable server; it is the only database timeout in the service.
pub async fn client_options(settings: &DatabaseSettings) -> anyhow::Result<ClientOptions> {
    let mut options = ClientOptions::parse(&settings.uri)
        .await
        .with_context(|| "failed to parse MongoDB connection string")?;
    options.app_name = Some(settings.app_name.clone());
    options.server_selection_timeout =
        Some(Duration::from_millis(settings.server_selection_timeout_ms));
    Ok(options)
}

/// Create a client handle for the configured database.
///
/// No network I/O happens here; the driver connects lazily, so use [`ping`]
/// to confirm the server is reachable.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<Database> {
    let options = client_options(settings).await?;
    let client = Client::with_options(options).with_context(|| "failed to create MongoDB client")?;

    tracing::info!(
        target: "bookstore-db",
        database = %settings.name,
        "MongoDB client created"
    );
    Ok(client.database(&settings.name))
}

/// Round-trip a `ping` command to the server.
pub async fn ping(database: &Database) -> mongodb::error::Result<()> {
    database.run_command(doc! { "ping": 1 }, None).await?;
    Ok(())
}
