//! In-process fake of the remote product API

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use storefront_cli::catalog::{Category, Product, ProductDraft, UploadedFile};

#[derive(Default)]
pub struct FakeDb {
    pub products: Vec<Product>,
    pub uploads: Vec<usize>,
}

pub type Db = Arc<Mutex<FakeDb>>;

pub struct FakeApi {
    pub base_url: String,
    pub db: Db,
}

impl FakeApi {
    pub fn product(&self, id: u64) -> Option<Product> {
        let db = self.db.lock().unwrap();
        db.products.iter().find(|p| p.id == id).cloned()
    }

    pub fn product_count(&self) -> usize {
        self.db.lock().unwrap().products.len()
    }
}

fn category() -> Category {
    Category {
        id: 36,
        name: "Gear".to_string(),
        image: "https://img.example/gear.png".to_string(),
    }
}

/// Headphones ($10), Sneakers ($25.50) and a Watch ($40) without images
pub fn sample_products() -> Vec<Product> {
    let product = |id: u64, title: &str, price: f64, images: Vec<&str>| Product {
        id,
        title: title.to_string(),
        price,
        description: format!("{} for everyday use", title),
        images: images.into_iter().map(String::from).collect(),
        category: Some(category()),
        creation_at: None,
        updated_at: None,
    };

    vec![
        product(1, "Headphones", 10.0, vec!["https://img.example/headphones.jpg"]),
        product(2, "Sneakers", 25.5, vec!["https://img.example/sneakers.jpg"]),
        product(3, "Watch", 40.0, vec![]),
    ]
}

fn missing(id: u64) -> (StatusCode, Json<Value>) {
    // Mirrors the real API, which answers 400 for unknown ids
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "message": format!("Could not find any entity of type \"Product\" matching id {}", id),
        })),
    )
}

fn from_draft(id: u64, draft: ProductDraft) -> Product {
    Product {
        id,
        title: draft.title,
        price: draft.price,
        description: draft.description,
        images: draft.images,
        category: Some(Category {
            id: draft.category_id,
            ..category()
        }),
        creation_at: None,
        updated_at: None,
    }
}

async fn list(State(db): State<Db>) -> Json<Vec<Product>> {
    Json(db.lock().unwrap().products.clone())
}

async fn show(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Product>, (StatusCode, Json<Value>)> {
    let db = db.lock().unwrap();
    db.products
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| missing(id))
}

async fn create(
    State(db): State<Db>,
    Json(draft): Json<ProductDraft>,
) -> Result<(StatusCode, Json<Product>), (StatusCode, Json<Value>)> {
    if draft.price < 0.0 {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"message": ["price must be a positive number"]})),
        ));
    }

    let mut db = db.lock().unwrap();
    let id = db.products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
    let product = from_draft(id, draft);
    db.products.push(product.clone());
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(draft): Json<ProductDraft>,
) -> Result<Json<Product>, StatusCode> {
    let mut db = db.lock().unwrap();
    let slot = db
        .products
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    *slot = from_draft(id, draft);
    Ok(Json(slot.clone()))
}

async fn remove(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<bool>, StatusCode> {
    let mut db = db.lock().unwrap();
    let before = db.products.len();
    db.products.retain(|p| p.id != id);
    if db.products.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(true))
}

async fn upload(State(db): State<Db>, body: Bytes) -> (StatusCode, Json<UploadedFile>) {
    let mut db = db.lock().unwrap();
    db.uploads.push(body.len());
    let filename = format!("upload-{}.png", db.uploads.len());
    (
        StatusCode::CREATED,
        Json(UploadedFile {
            originalname: "image.png".to_string(),
            location: format!("https://files.example/{}", filename),
            filename,
        }),
    )
}

/// Serve the fake API on an ephemeral port; the base URL ends in `/api/v1/`
pub async fn spawn_fake_api(products: Vec<Product>) -> FakeApi {
    let db: Db = Arc::new(Mutex::new(FakeDb {
        products,
        uploads: Vec::new(),
    }));

    let app = Router::new()
        .route("/api/v1/products", get(list).post(create))
        .route(
            "/api/v1/products/:id",
            get(show).put(update).delete(remove),
        )
        .route("/api/v1/files/upload", post(upload))
        .with_state(db.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeApi {
        base_url: format!("http://{}/api/v1/", addr),
        db,
    }
}
