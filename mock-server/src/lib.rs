use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Apartment {
    pub id: i64,
    pub num_app: String,
    pub design: String,
    pub loyer: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApartmentInput {
    pub num_app: String,
    pub design: String,
    pub loyer: f64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Stats {
    pub total: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Default)]
pub struct Store {
    next_id: i64,
    rows: BTreeMap<i64, Apartment>,
}

pub type Db = Arc<RwLock<Store>>;

type ApiError = (StatusCode, Json<serde_json::Value>);

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/apartments", get(list_apartments).post(create_apartment))
        .route("/apartments/stats", get(apartment_stats))
        .route(
            "/apartments/{id}",
            put(update_apartment).delete(delete_apartment),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock apartments service listening");
    }
    axum::serve(listener, app()).await
}

fn failure(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "message": message.into() })))
}

fn not_found(id: i64) -> ApiError {
    failure(StatusCode::NOT_FOUND, format!("apartment {id} not found"))
}

fn validate(input: &ApartmentInput) -> Result<(), ApiError> {
    if input.num_app.is_empty() {
        return Err(failure(StatusCode::BAD_REQUEST, "numApp is required"));
    }
    if input.design.is_empty() {
        return Err(failure(StatusCode::BAD_REQUEST, "design is required"));
    }
    Ok(())
}

async fn list_apartments(State(db): State<Db>) -> Json<Vec<Apartment>> {
    let store = db.read().await;
    Json(store.rows.values().cloned().collect())
}

async fn create_apartment(
    State(db): State<Db>,
    Json(input): Json<ApartmentInput>,
) -> Result<(StatusCode, Json<Apartment>), ApiError> {
    validate(&input)?;
    let mut store = db.write().await;
    store.next_id += 1;
    let apartment = Apartment {
        id: store.next_id,
        num_app: input.num_app,
        design: input.design,
        loyer: input.loyer,
    };
    store.rows.insert(apartment.id, apartment.clone());
    info!(id = apartment.id, "apartment created");
    Ok((StatusCode::CREATED, Json(apartment)))
}

async fn update_apartment(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<ApartmentInput>,
) -> Result<Json<Apartment>, ApiError> {
    validate(&input)?;
    let mut store = db.write().await;
    let apartment = store.rows.get_mut(&id).ok_or_else(|| not_found(id))?;
    apartment.num_app = input.num_app;
    apartment.design = input.design;
    apartment.loyer = input.loyer;
    Ok(Json(apartment.clone()))
}

async fn delete_apartment(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let mut store = db.write().await;
    store
        .rows
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| not_found(id))
}

async fn apartment_stats(State(db): State<Db>) -> Json<Stats> {
    let store = db.read().await;
    Json(compute_stats(store.rows.values()))
}

/// Sum, minimum and maximum rent; all zero when there are no apartments.
pub fn compute_stats<'a>(apartments: impl IntoIterator<Item = &'a Apartment>) -> Stats {
    let mut rents = apartments.into_iter().map(|a| a.loyer).peekable();
    if rents.peek().is_none() {
        return Stats { total: 0.0, min: 0.0, max: 0.0 };
    }
    rents.fold(
        Stats { total: 0.0, min: f64::INFINITY, max: f64::NEG_INFINITY },
        |acc, loyer| Stats {
            total: acc.total + loyer,
            min: acc.min.min(loyer),
            max: acc.max.max(loyer),
        },
    )
}
