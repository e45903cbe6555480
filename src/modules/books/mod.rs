pub mod models;
pub mod routes;
pub mod seed;
pub mod store;

use async_trait::async_trait;
use axum::Router;
use bookstore_kernel::{settings::SeedMode, InitCtx, Module};
use serde_json::json;
use tokio::{sync::Mutex, task::JoinHandle};

use seed::SeedOutcome;
use store::SharedBookStore;

/// How the background connect-then-seed step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupOutcome {
    /// The database did not answer; nothing was seeded.
    Unreachable,
    Seeded(SeedOutcome),
    /// The database answered but seeding failed.
    SeedFailed,
}

/// Books module: the route table over the books collection plus startup
/// seeding.
pub struct BooksModule {
    store: SharedBookStore,
    startup: Mutex<Option<JoinHandle<StartupOutcome>>>,
}

impl BooksModule {
    pub fn new(store: SharedBookStore) -> Self {
        Self {
            store,
            startup: Mutex::new(None),
        }
    }

    /// Wait for the task spawned by `start`. `None` if no task is pending.
    pub async fn startup_finished(&self) -> Option<StartupOutcome> {
        let handle = self.startup.lock().await.take()?;
        match handle.await {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                tracing::warn!(module = "books", error = %err, "startup task did not finish");
                None
            }
        }
    }
}

/// Confirm the database is reachable, then seed it. Failures are logged,
/// never returned.
async fn prepare_store(store: SharedBookStore, mode: SeedMode) -> StartupOutcome {
    if let Err(err) = store.ping().await {
        tracing::error!(module = "books", error = %err, "database unreachable; skipping seed");
        return StartupOutcome::Unreachable;
    }
    tracing::info!(module = "books", "database connected");

    match seed::seed(store.as_ref(), mode).await {
        Ok(outcome) => {
            tracing::info!(module = "books", ?outcome, "initial books seeding finished");
            StartupOutcome::Seeded(outcome)
        }
        Err(err) => {
            tracing::error!(module = "books", error = %err, "error populating database");
            StartupOutcome::SeedFailed
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            backend = ?ctx.settings.database.backend,
            collection = %ctx.settings.database.collection,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    /// Spawn the connect-then-seed step and return at once, so the listener
    /// binds while the database is still being reached.
    async fn start(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let task = tokio::spawn(prepare_store(self.store.clone(), ctx.settings.seed.mode));
        *self.startup.lock().await = Some(task);

        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        if let Some(task) = self.startup.lock().await.take() {
            if !task.is_finished() {
                task.abort();
                tracing::warn!(module = self.name(), "startup seeding cancelled");
            }
        }
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

fn json_response(description: &str, schema: serde_json::Value) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": schema
            }
        }
    })
}

fn book_ref() -> serde_json::Value {
    json!({ "$ref": "#/components/schemas/Book" })
}

fn error_ref() -> serde_json::Value {
    json!({ "$ref": "#/components/schemas/ErrorResponse" })
}

fn id_parameter() -> serde_json::Value {
    json!([{
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "string" },
        "description": "24-hex-digit book identifier"
    }])
}

fn openapi_fragment() -> serde_json::Value {
    let not_found = json_response("Book not found", error_ref());
    let bad_request = json_response("Invalid body or identifier", error_ref());
    let server_error = json_response("Storage failure", error_ref());

    let mut paths = json!({
        "/books": {
            "get": {
                "summary": "List books",
                "tags": ["Books"],
                "responses": {
                    "200": json_response("Every stored book", json!({ "type": "array", "items": book_ref() })),
                    "500": server_error
                }
            },
            "post": {
                "summary": "Create a book",
                "tags": ["Books"],
                "requestBody": {
                    "required": true,
                    "content": { "application/json": { "schema": { "$ref": "#/components/schemas/BookInput" } } }
                },
                "responses": {
                    "201": json_response("Created book", book_ref()),
                    "400": bad_request
                }
            }
        },
        "/books/{id}": {
            "get": {
                "summary": "Get a book",
                "tags": ["Books"],
                "parameters": id_parameter(),
                "responses": {
                    "200": json_response("The book", book_ref()),
                    "400": bad_request,
                    "404": not_found,
                    "500": server_error
                }
            },
            "put": {
                "summary": "Update the listed fields of a book",
                "tags": ["Books"],
                "parameters": id_parameter(),
                "requestBody": {
                    "required": true,
                    "content": { "application/json": { "schema": { "$ref": "#/components/schemas/BookInput" } } }
                },
                "responses": {
                    "200": json_response("Updated book", book_ref()),
                    "400": bad_request,
                    "404": not_found
                }
            },
            "delete": {
                "summary": "Delete a book",
                "tags": ["Books"],
                "parameters": id_parameter(),
                "responses": {
                    "200": json_response("Book deleted", error_ref()),
                    "400": bad_request,
                    "404": not_found,
                    "500": server_error
                }
            }
        }
    });

    for book in &seed::INITIAL_BOOKS {
        paths[book.path] = json!({
            "get": {
                "summary": format!("Get \"{}\"", book.name),
                "tags": ["Books"],
                "responses": {
                    "200": json_response("The book", book_ref()),
                    "404": not_found,
                    "500": server_error
                }
            }
        });
    }

    let text = json!({ "type": "string" });
    json!({
        "paths": paths,
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string", "description": "Unique identifier for the book" },
                        "name": { "type": "string", "description": "Title of the book" },
                        "img": { "type": "string", "description": "Cover art URL" },
                        "summary": { "type": "string", "description": "Description of the book" }
                    },
                    "required": ["id"]
                },
                "BookInput": {
                    "type": "object",
                    "properties": {
                        "name": text,
                        "img": text,
                        "summary": text
                    }
                }
            }
        }
    })
}

/// Create a new instance of the books module
pub fn create_module(store: SharedBookStore) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(store))
}
