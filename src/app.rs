//! Bootstrap: build the store, run module lifecycles, serve HTTP.

use anyhow::Context;
use bookstore_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules::{
    self,
    books::{
        seed::{self, SeedOutcome},
        store::{self, SharedBookStore},
    },
};

/// Registry holding every application module over `store`.
pub fn build_registry(store: SharedBookStore) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store);
    registry
}

/// Run the HTTP service until Ctrl+C or SIGTERM.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        backend = ?settings.database.backend,
        db = %settings.database.name,
        "bookstore bootstrap starting"
    );

    let store = store::from_settings(&settings.database)
        .await
        .with_context(|| "failed to create book store")?;
    let registry = build_registry(store);
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;
    tracing::info!(
        modules = registry.module_count(),
        "bookstore bootstrap complete"
    );

    let served =
        bookstore_http::start_server(&registry, &settings, bookstore_http::shutdown_signal()).await;

    registry.stop_modules().await?;
    served
}

/// Seed the configured store once, without serving.
///
/// Unlike startup seeding, an unreachable database is an error here.
pub async fn seed_once(settings: &Settings) -> anyhow::Result<SeedOutcome> {
    let store = store::from_settings(&settings.database)
        .await
        .with_context(|| "failed to create book store")?;
    store
        .ping()
        .await
        .with_context(|| "database unreachable")?;

    let outcome = seed::seed(store.as_ref(), settings.seed.mode)
        .await
        .with_context(|| "error populating database")?;
    tracing::info!(?outcome, "seeding finished");
    Ok(outcome)
}
