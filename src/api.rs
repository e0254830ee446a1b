//! HTTP controllers: one router per resource, handlers mapping service
//! outcomes 1:1 onto HTTP responses.

use crate::domain::EntityId;
use crate::repo::{
    PersonFilter, SqliteBookingRepository, SqlitePersonRepository, SqliteRoomRepository,
};
use crate::service::booking::parse_rfc3339;
use crate::service::{
    BookingModel, BookingRequest, BookingService, PersonModel, PersonRequest, PersonService,
    RemoveRoomOptions, RoomModel, RoomRequest, RoomService, ServiceError,
};
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::error;

/// Shared application state. The connection sits behind a mutex because
/// rusqlite connections are not `Sync`; requests take it for the duration of
/// their (synchronous) database work.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::InvalidInput(message) => (StatusCode::BAD_REQUEST, message),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message),
            Self::Conflict(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            Self::Internal(message) => {
                error!("Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}

// ---- people ----

async fn handle_list_people(
    State(state): State<AppState>,
    Query(filter): Query<PersonFilter>,
) -> Result<Json<Vec<PersonModel>>, ServiceError> {
    let conn = state.db.lock().await;
    let service = PersonService::new(SqlitePersonRepository::new(&conn));
    service.list(&filter).map(Json)
}

async fn handle_get_person(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> Result<Json<PersonModel>, ServiceError> {
    let conn = state.db.lock().await;
    let service = PersonService::new(SqlitePersonRepository::new(&conn));
    service.get(id).map(Json)
}

async fn handle_add_person(
    State(state): State<AppState>,
    Json(payload): Json<PersonRequest>,
) -> Result<Json<EntityId>, ServiceError> {
    let conn = state.db.lock().await;
    let service = PersonService::new(SqlitePersonRepository::new(&conn));
    service.add(&payload).map(Json)
}

async fn handle_update_person(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Json(payload): Json<PersonRequest>,
) -> Result<Json<EntityId>, ServiceError> {
    let conn = state.db.lock().await;
    let service = PersonService::new(SqlitePersonRepository::new(&conn));
    service.update(id, &payload).map(Json)
}

async fn handle_remove_person(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> Result<Json<EntityId>, ServiceError> {
    let conn = state.db.lock().await;
    let service = PersonService::new(SqlitePersonRepository::new(&conn));
    service.remove(id).map(Json)
}

pub fn people_api() -> Router<AppState> {
    Router::new()
        .route("/", get(handle_list_people).post(handle_add_person))
        .route(
            "/:id",
            get(handle_get_person)
                .put(handle_update_person)
                .delete(handle_remove_person),
        )
}

// ---- rooms ----

#[derive(Debug, Deserialize)]
pub struct RoomListParams {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityParams {
    #[serde(deserialize_with = "parse_rfc3339")]
    pub start: DateTime<Utc>,
    #[serde(deserialize_with = "parse_rfc3339")]
    pub end: DateTime<Utc>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveRoomsRequest {
    pub room_ids: Vec<EntityId>,
    #[serde(flatten)]
    pub options: RemoveRoomOptions,
}

async fn handle_list_rooms(
    State(state): State<AppState>,
    Query(params): Query<RoomListParams>,
) -> Result<Json<Vec<RoomModel>>, ServiceError> {
    let conn = state.db.lock().await;
    let service = RoomService::new(
        SqliteRoomRepository::new(&conn),
        SqliteBookingRepository::new(&conn),
    );
    service.list(params.name.as_deref()).map(Json)
}

async fn handle_available_rooms(
    State(state): State<AppState>,
    Query(params): Query<AvailabilityParams>,
) -> Result<Json<Vec<RoomModel>>, ServiceError> {
    let conn = state.db.lock().await;
    let service = RoomService::new(
        SqliteRoomRepository::new(&conn),
        SqliteBookingRepository::new(&conn),
    );
    service
        .available(params.start, params.end, params.name.as_deref())
        .map(Json)
}

async fn handle_get_room(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> Result<Json<RoomModel>, ServiceError> {
    let conn = state.db.lock().await;
    let service = RoomService::new(
        SqliteRoomRepository::new(&conn),
        SqliteBookingRepository::new(&conn),
    );
    service.get(id).map(Json)
}

async fn handle_add_room(
    State(state): State<AppState>,
    Json(payload): Json<RoomRequest>,
) -> Result<Json<EntityId>, ServiceError> {
    let conn = state.db.lock().await;
    let service = RoomService::new(
        SqliteRoomRepository::new(&conn),
        SqliteBookingRepository::new(&conn),
    );
    service.add(&payload).map(Json)
}

async fn handle_update_room(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Json(payload): Json<RoomRequest>,
) -> Result<Json<EntityId>, ServiceError> {
    let conn = state.db.lock().await;
    let service = RoomService::new(
        SqliteRoomRepository::new(&conn),
        SqliteBookingRepository::new(&conn),
    );
    service.update(id, &payload).map(Json)
}

async fn handle_remove_room(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    payload: Option<Json<RemoveRoomOptions>>,
) -> Result<Json<EntityId>, ServiceError> {
    let options = payload.map(|Json(options)| options).unwrap_or_default();
    let conn = state.db.lock().await;
    let service = RoomService::new(
        SqliteRoomRepository::new(&conn),
        SqliteBookingRepository::new(&conn),
    );
    service.remove(id, &options).map(Json)
}

async fn handle_remove_rooms(
    State(state): State<AppState>,
    Json(payload): Json<RemoveRoomsRequest>,
) -> Result<Json<Vec<EntityId>>, ServiceError> {
    let conn = state.db.lock().await;
    let service = RoomService::new(
        SqliteRoomRepository::new(&conn),
        SqliteBookingRepository::new(&conn),
    );
    service.remove_many(&payload.room_ids, &payload.options).map(Json)
}

pub fn rooms_api() -> Router<AppState> {
    Router::new()
        .route("/", get(handle_list_rooms).post(handle_add_room))
        .route("/available", get(handle_available_rooms))
        .route("/remove", post(handle_remove_rooms))
        .route(
            "/:id",
            get(handle_get_room)
                .put(handle_update_room)
                .delete(handle_remove_room),
        )
}

// ---- bookings ----

async fn handle_list_bookings(
    State(state): State<AppState>,
) -> Result<Json<Vec<BookingModel>>, ServiceError> {
    let conn = state.db.lock().await;
    let service = BookingService::new(SqliteBookingRepository::new(&conn));
    service.list().map(Json)
}

async fn handle_get_booking(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> Result<Json<BookingModel>, ServiceError> {
    let conn = state.db.lock().await;
    let service = BookingService::new(SqliteBookingRepository::new(&conn));
    service.get(id).map(Json)
}

async fn handle_new_booking(
    State(state): State<AppState>,
    Json(payload): Json<BookingRequest>,
) -> Result<Json<EntityId>, ServiceError> {
    let conn = state.db.lock().await;
    let service = BookingService::new(SqliteBookingRepository::new(&conn));
    service.book(&payload).map(Json)
}

async fn handle_update_booking(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Json(payload): Json<BookingRequest>,
) -> Result<Json<EntityId>, ServiceError> {
    let conn = state.db.lock().await;
    let service = BookingService::new(SqliteBookingRepository::new(&conn));
    service.update(id, &payload).map(Json)
}

async fn handle_delete_booking(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> Result<Json<EntityId>, ServiceError> {
    let conn = state.db.lock().await;
    let service = BookingService::new(SqliteBookingRepository::new(&conn));
    service.remove(id).map(Json)
}

pub fn bookings_api() -> Router<AppState> {
    Router::new()
        .route("/", get(handle_list_bookings).post(handle_new_booking))
        .route(
            "/:id",
            get(handle_get_booking)
                .put(handle_update_booking)
                .delete(handle_delete_booking),
        )
}
