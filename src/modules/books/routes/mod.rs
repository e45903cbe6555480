//! HTTP bindings for the books module. Each handler performs exactly one
//! store call and maps its outcome to a status code and JSON body.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bookstore_http::error::{AppError, MessageBody};

use super::models::{Book, BookDraft, BookField, BookPatch};
use super::seed::INITIAL_BOOKS;
use super::store::{SharedBookStore, StoreError};

const NOT_FOUND_MESSAGE: &str = "Book not found";
const DELETED_MESSAGE: &str = "Book deleted";

type ApiResult<T> = Result<T, AppError>;

/// Build the route table over `store`.
pub fn router(store: SharedBookStore) -> Router {
    let mut router = Router::<SharedBookStore>::new()
        .route("/books", get(list_books).post(create_book))
        .route(
            "/books/{id}",
            get(get_book).put(update_book).delete(delete_book),
        );

    for book in &INITIAL_BOOKS {
        let title = book.name;
        router = router.route(
            book.path,
            get(move |State(store): State<SharedBookStore>| async move {
                find_by_title(store, title).await
            }),
        );
    }

    router.with_state(store)
}

fn not_found() -> AppError {
    AppError::not_found(NOT_FOUND_MESSAGE)
}

/// Create and update report every store failure as a client fault.
fn client_fault(err: StoreError) -> AppError {
    AppError::bad_request(err.to_string())
}

/// Reads and deletes report store failures as server faults, except for
/// malformed identifiers.
fn server_fault(err: StoreError) -> AppError {
    if matches!(err, StoreError::InvalidId(_)) {
        AppError::bad_request(err.to_string())
    } else {
        AppError::Internal(err.into())
    }
}

fn body_fault(rejection: JsonRejection) -> AppError {
    AppError::bad_request(rejection.body_text())
}

async fn create_book(
    State(store): State<SharedBookStore>,
    payload: Result<Json<BookDraft>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Book>)> {
    let Json(draft) = payload.map_err(body_fault)?;
    let book = store.insert(draft).await.map_err(client_fault)?;
    tracing::debug!(id = %book.id, "book created");
    Ok((StatusCode::CREATED, Json(book)))
}

async fn list_books(State(store): State<SharedBookStore>) -> ApiResult<Json<Vec<Book>>> {
    let books = store.find_all().await.map_err(server_fault)?;
    Ok(Json(books))
}

async fn get_book(
    State(store): State<SharedBookStore>,
    Path(id): Path<String>,
) -> ApiResult<Json<Book>> {
    store
        .find_by_id(&id)
        .await
        .map_err(server_fault)?
        .map(Json)
        .ok_or_else(not_found)
}

async fn update_book(
    State(store): State<SharedBookStore>,
    Path(id): Path<String>,
    payload: Result<Json<BookPatch>, JsonRejection>,
) -> ApiResult<Json<Book>> {
    let Json(patch) = payload.map_err(body_fault)?;
    store
        .update_by_id(&id, patch)
        .await
        .map_err(client_fault)?
        .map(Json)
        .ok_or_else(not_found)
}

async fn delete_book(
    State(store): State<SharedBookStore>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageBody>> {
    if store.delete_by_id(&id).await.map_err(server_fault)? {
        tracing::debug!(%id, "book deleted");
        Ok(Json(MessageBody::new(DELETED_MESSAGE)))
    } else {
        Err(not_found())
    }
}

async fn find_by_title(store: SharedBookStore, title: &'static str) -> ApiResult<Json<Book>> {
    store
        .find_one_by(BookField::Name, title)
        .await
        .map_err(server_fault)?
        .map(Json)
        .ok_or_else(not_found)
}
