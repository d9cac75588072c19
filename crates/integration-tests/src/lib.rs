//! Integration tests for the Eqori client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p eqori-integration-tests
//! ```
//!
//! Each test starts an in-process [`MockBackend`] speaking the backend's
//! HTTP contract on an ephemeral port and points a real client at it - no
//! external services, no shared state between tests.
//!
//! The mock also reproduces the backend's historical wire drift: flip
//! [`MockBackend::set_legacy_wire`] and generation records are served with
//! the old field spellings (`product_category`, `is_favorited`, ad copy as
//! a JSON-encoded string) so normalization is exercised end to end.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{Path as UrlPath, Query, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::task::JoinHandle;

use eqori_client::{ClientConfig, EqoriClient, NavigationEvents};

/// An in-process stand-in for the Eqori backend.
///
/// Serves the auth, generation, and blog endpoints under `/api` on an
/// ephemeral port, counts every request it sees, and exposes knobs for
/// scripting tokens and wire shapes.
pub struct MockBackend {
    addr: SocketAddr,
    state: Arc<MockState>,
    server: JoinHandle<()>,
}

#[derive(Default)]
struct MockState {
    users: Mutex<Vec<MockUser>>,
    tokens: Mutex<HashMap<String, i64>>,
    generations: Mutex<Vec<MockGeneration>>,
    posts: Mutex<Vec<MockPost>>,
    hits: Mutex<HashMap<String, usize>>,
    scripted_token: Mutex<Option<String>>,
    serve_legacy: AtomicBool,
    next_user_id: AtomicI64,
    next_generation_id: AtomicI64,
    next_post_id: AtomicI64,
}

#[derive(Clone)]
struct MockUser {
    id: i64,
    email: String,
    #[allow(dead_code)]
    username: String,
    password: String,
    created_at: DateTime<Utc>,
}

#[derive(Clone)]
struct MockGeneration {
    id: i64,
    owner: i64,
    brief: Value,
    description: String,
    ad_copy: Vec<String>,
    email_blurb: String,
    is_favorite: bool,
    created_at: DateTime<Utc>,
}

#[derive(Clone)]
struct MockPost {
    id: i64,
    title: String,
    slug: String,
    content: String,
    excerpt: String,
    category: String,
    published_at: DateTime<Utc>,
}

impl MockBackend {
    /// Bind an ephemeral port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound (test environment failure).
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let router = build_router(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// The API root the client should be configured with.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// A client configuration pointing at this backend, with credentials
    /// stored under `data_dir`.
    ///
    /// # Panics
    ///
    /// Panics if the backend address fails to parse as a URL (cannot
    /// happen for a bound socket address).
    #[must_use]
    pub fn config(&self, data_dir: &Path) -> ClientConfig {
        ClientConfig {
            api_base_url: url::Url::parse(&self.base_url()).expect("mock base url"),
            data_dir: data_dir.to_path_buf(),
        }
    }

    /// Wire up a real client against this backend.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn client(&self, data_dir: &Path) -> (EqoriClient, NavigationEvents) {
        EqoriClient::new(self.config(data_dir)).expect("client")
    }

    /// Create an account directly in the backend's state.
    pub fn seed_user(&self, email: &str, password: &str) -> i64 {
        let id = self.state.next_user_id.fetch_add(1, Ordering::SeqCst) + 1;
        lock(&self.state.users).push(MockUser {
            id,
            email: email.to_string(),
            username: email.to_string(),
            password: password.to_string(),
            created_at: Utc::now(),
        });
        id
    }

    /// Publish a blog post directly in the backend's state.
    pub fn seed_post(&self, title: &str, slug: &str, category: &str, content: &str) {
        let id = self.state.next_post_id.fetch_add(1, Ordering::SeqCst) + 1;
        lock(&self.state.posts).push(MockPost {
            id,
            title: title.to_string(),
            slug: slug.to_string(),
            content: content.to_string(),
            excerpt: format!("{title} in brief"),
            category: category.to_string(),
            published_at: Utc::now(),
        });
    }

    /// Make the next successful login issue exactly this token.
    pub fn script_next_token(&self, token: &str) {
        *lock(&self.state.scripted_token) = Some(token.to_string());
    }

    /// Invalidate every issued token: all subsequent authenticated calls
    /// answer 401, simulating server-side expiry.
    pub fn revoke_all_tokens(&self) {
        lock(&self.state.tokens).clear();
    }

    /// Serve generation records with the legacy field spellings.
    pub fn set_legacy_wire(&self, legacy: bool) {
        self.state.serve_legacy.store(legacy, Ordering::SeqCst);
    }

    /// How many requests hit `METHOD /path` so far.
    #[must_use]
    pub fn hits(&self, method: &str, path: &str) -> usize {
        lock(&self.state.hits)
            .get(&format!("{method} {path}"))
            .copied()
            .unwrap_or(0)
    }

    /// Total requests observed across all endpoints.
    #[must_use]
    pub fn total_hits(&self) -> usize {
        lock(&self.state.hits).values().sum()
    }

    /// Number of generation records currently stored.
    #[must_use]
    pub fn generation_count(&self) -> usize {
        lock(&self.state.generations).len()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Router
// ============================================================================

fn build_router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/api/auth/register", axum::routing::post(register))
        .route("/api/auth/login", axum::routing::post(login))
        .route("/api/auth/me", get(me))
        .route("/api/generation/generate", axum::routing::post(generate))
        .route("/api/generation/history", get(history))
        .route(
            "/api/generation/{id}",
            get(get_generation)
                .put(update_generation)
                .delete(delete_generation),
        )
        .route("/api/blog/", get(blog_list))
        .route("/api/blog/categories", get(blog_categories))
        .route("/api/blog/{slug}", get(blog_show))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            count_hits,
        ))
        .with_state(state)
}

async fn count_hits(State(state): State<Arc<MockState>>, req: Request, next: Next) -> Response {
    let key = format!("{} {}", req.method(), req.uri().path());
    *lock(&state.hits).entry(key).or_insert(0) += 1;
    next.run(req).await
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn authorize(state: &MockState, headers: &HeaderMap) -> Result<MockUser, Response> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);

    let Some(token) = token else {
        return Err(detail(
            StatusCode::UNAUTHORIZED,
            "Could not validate credentials",
        ));
    };

    let user_id = lock(&state.tokens).get(&token).copied();
    let Some(user_id) = user_id else {
        return Err(detail(
            StatusCode::UNAUTHORIZED,
            "Could not validate credentials",
        ));
    };

    lock(&state.users)
        .iter()
        .find(|u| u.id == user_id)
        .cloned()
        .ok_or_else(|| {
            detail(
                StatusCode::UNAUTHORIZED,
                "Could not validate credentials",
            )
        })
}

fn user_json(user: &MockUser) -> Value {
    json!({
        "id": user.id,
        "email": user.email,
        "created_at": user.created_at.to_rfc3339(),
    })
}

fn generation_json(generation: &MockGeneration, legacy: bool) -> Value {
    let brief = &generation.brief;
    if legacy {
        json!({
            "id": generation.id,
            "product_name": brief.get("product_name").cloned().unwrap_or(Value::Null),
            "product_category": brief.get("category").cloned().unwrap_or(Value::Null),
            "input_features": brief.get("features").cloned().unwrap_or(Value::Null),
            "input_audience": brief.get("target_audience").cloned().unwrap_or(Value::Null),
            "input_tone": brief.get("tone_of_voice").cloned().unwrap_or(Value::Null),
            "input_keywords": brief.get("seo_keywords").cloned().unwrap_or(Value::Null),
            "product_description": generation.description,
            "social_media_ads": serde_json::to_string(&generation.ad_copy)
                .unwrap_or_default(),
            "email_content": generation.email_blurb,
            "is_favorited": generation.is_favorite,
            "created_at": generation.created_at.to_rfc3339(),
        })
    } else {
        json!({
            "id": generation.id,
            "product_name": brief.get("product_name").cloned().unwrap_or(Value::Null),
            "category": brief.get("category").cloned().unwrap_or(Value::Null),
            "features": brief.get("features").cloned().unwrap_or(Value::Null),
            "target_audience": brief.get("target_audience").cloned().unwrap_or(Value::Null),
            "tone_of_voice": brief.get("tone_of_voice").cloned().unwrap_or(Value::Null),
            "seo_keywords": brief.get("seo_keywords").cloned().unwrap_or(Value::Null),
            "generated_description": generation.description,
            "generated_ad_copy": generation.ad_copy,
            "generated_email_blurb": generation.email_blurb,
            "is_favorite": generation.is_favorite,
            "created_at": generation.created_at.to_rfc3339(),
        })
    }
}

// ============================================================================
// Auth handlers
// ============================================================================

#[derive(Deserialize)]
struct RegisterBody {
    email: String,
    #[serde(default)]
    username: Option<String>,
    password: String,
}

async fn register(State(state): State<Arc<MockState>>, Json(body): Json<RegisterBody>) -> Response {
    let exists = lock(&state.users).iter().any(|u| u.email == body.email);
    if exists {
        return detail(StatusCode::BAD_REQUEST, "Email already registered");
    }

    let id = state.next_user_id.fetch_add(1, Ordering::SeqCst) + 1;
    let user = MockUser {
        id,
        email: body.email,
        username: body.username.unwrap_or_default(),
        password: body.password,
        created_at: Utc::now(),
    };
    let rendered = user_json(&user);
    lock(&state.users).push(user);
    Json(rendered).into_response()
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(State(state): State<Arc<MockState>>, Form(form): Form<LoginForm>) -> Response {
    let user = lock(&state.users)
        .iter()
        .find(|u| u.email == form.username && u.password == form.password)
        .cloned();

    let Some(user) = user else {
        return detail(StatusCode::UNAUTHORIZED, "Incorrect email or password");
    };

    let token = lock(&state.scripted_token)
        .take()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    lock(&state.tokens).insert(token.clone(), user.id);

    Json(json!({ "access_token": token, "token_type": "bearer" })).into_response()
}

async fn me(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    match authorize(&state, &headers) {
        Ok(user) => Json(user_json(&user)).into_response(),
        Err(rejection) => rejection,
    }
}

// ============================================================================
// Generation handlers
// ============================================================================

async fn generate(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(brief): Json<Value>,
) -> Response {
    let user = match authorize(&state, &headers) {
        Ok(user) => user,
        Err(rejection) => return rejection,
    };

    let name = brief
        .get("product_name")
        .and_then(Value::as_str)
        .unwrap_or("your product")
        .to_string();

    let id = state.next_generation_id.fetch_add(1, Ordering::SeqCst) + 1;
    let generation = MockGeneration {
        id,
        owner: user.id,
        brief,
        description: format!("Meet {name}: the upgrade your routine deserves."),
        ad_copy: vec![
            format!("{name} just landed. See why everyone is switching."),
            format!("Less effort, more results. That is {name}."),
            format!("Professionals choose {name}. Join them."),
        ],
        email_blurb: format!("Subject: {name} is here\n\nSay hello to {name}."),
        is_favorite: false,
        created_at: Utc::now(),
    };

    let legacy = state.serve_legacy.load(Ordering::SeqCst);
    let rendered = generation_json(&generation, legacy);
    lock(&state.generations).push(generation);
    Json(rendered).into_response()
}

#[derive(Deserialize)]
struct PageQuery {
    #[serde(default)]
    skip: usize,
    #[serde(default = "default_limit")]
    limit: usize,
}

const fn default_limit() -> usize {
    50
}

async fn history(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(page): Query<PageQuery>,
) -> Response {
    let user = match authorize(&state, &headers) {
        Ok(user) => user,
        Err(rejection) => return rejection,
    };

    let legacy = state.serve_legacy.load(Ordering::SeqCst);
    let mut records: Vec<MockGeneration> = lock(&state.generations)
        .iter()
        .filter(|g| g.owner == user.id)
        .cloned()
        .collect();
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let rendered: Vec<Value> = records
        .into_iter()
        .skip(page.skip)
        .take(page.limit)
        .map(|g| generation_json(&g, legacy))
        .collect();
    Json(rendered).into_response()
}

fn find_generation(state: &MockState, owner: i64, id: i64) -> Option<MockGeneration> {
    lock(&state.generations)
        .iter()
        .find(|g| g.id == id && g.owner == owner)
        .cloned()
}

async fn get_generation(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<i64>,
) -> Response {
    let user = match authorize(&state, &headers) {
        Ok(user) => user,
        Err(rejection) => return rejection,
    };

    let legacy = state.serve_legacy.load(Ordering::SeqCst);
    match find_generation(&state, user.id, id) {
        Some(generation) => Json(generation_json(&generation, legacy)).into_response(),
        None => detail(StatusCode::NOT_FOUND, "Generation not found"),
    }
}

#[derive(Deserialize)]
struct UpdateBody {
    #[serde(default)]
    is_favorite: Option<bool>,
    #[serde(default)]
    generated_description: Option<String>,
    #[serde(default)]
    generated_ad_copy: Option<Vec<String>>,
    #[serde(default)]
    generated_email_blurb: Option<String>,
}

async fn update_generation(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<i64>,
    Json(body): Json<UpdateBody>,
) -> Response {
    let user = match authorize(&state, &headers) {
        Ok(user) => user,
        Err(rejection) => return rejection,
    };

    let legacy = state.serve_legacy.load(Ordering::SeqCst);
    let mut generations = lock(&state.generations);
    let Some(generation) = generations.iter_mut().find(|g| g.id == id && g.owner == user.id)
    else {
        return detail(StatusCode::NOT_FOUND, "Generation not found");
    };

    if let Some(value) = body.is_favorite {
        generation.is_favorite = value;
    }
    if let Some(description) = body.generated_description {
        generation.description = description;
    }
    if let Some(ad_copy) = body.generated_ad_copy {
        generation.ad_copy = ad_copy;
    }
    if let Some(email_blurb) = body.generated_email_blurb {
        generation.email_blurb = email_blurb;
    }

    Json(generation_json(generation, legacy)).into_response()
}

async fn delete_generation(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<i64>,
) -> Response {
    let user = match authorize(&state, &headers) {
        Ok(user) => user,
        Err(rejection) => return rejection,
    };

    let mut generations = lock(&state.generations);
    let before = generations.len();
    generations.retain(|g| !(g.id == id && g.owner == user.id));
    if generations.len() == before {
        return detail(StatusCode::NOT_FOUND, "Generation not found");
    }
    Json(json!({ "message": "Generation deleted successfully" })).into_response()
}

// ============================================================================
// Blog handlers
// ============================================================================

#[derive(Deserialize)]
struct BlogQuery {
    #[serde(default)]
    skip: usize,
    #[serde(default = "default_blog_limit")]
    limit: usize,
    #[serde(default)]
    category: Option<String>,
}

const fn default_blog_limit() -> usize {
    20
}

fn post_summary_json(post: &MockPost) -> Value {
    json!({
        "id": post.id,
        "title": post.title,
        "slug": post.slug,
        "excerpt": post.excerpt,
        "category": post.category,
        "published_at": post.published_at.to_rfc3339(),
    })
}

async fn blog_list(
    State(state): State<Arc<MockState>>,
    Query(query): Query<BlogQuery>,
) -> Response {
    let mut posts: Vec<MockPost> = lock(&state.posts)
        .iter()
        .filter(|p| query.category.as_ref().is_none_or(|c| &p.category == c))
        .cloned()
        .collect();
    posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));

    let rendered: Vec<Value> = posts
        .into_iter()
        .skip(query.skip)
        .take(query.limit)
        .map(|p| post_summary_json(&p))
        .collect();
    Json(rendered).into_response()
}

async fn blog_categories(State(state): State<Arc<MockState>>) -> Response {
    let mut categories: Vec<String> = lock(&state.posts)
        .iter()
        .map(|p| p.category.clone())
        .collect();
    categories.sort();
    categories.dedup();
    Json(categories).into_response()
}

async fn blog_show(State(state): State<Arc<MockState>>, UrlPath(slug): UrlPath<String>) -> Response {
    let post = lock(&state.posts).iter().find(|p| p.slug == slug).cloned();
    match post {
        Some(post) => Json(json!({
            "id": post.id,
            "title": post.title,
            "slug": post.slug,
            "content": post.content,
            "excerpt": post.excerpt,
            "category": post.category,
            "tags": "ai, marketing",
            "view_count": 1,
            "published_at": post.published_at.to_rfc3339(),
        }))
        .into_response(),
        None => detail(StatusCode::NOT_FOUND, "Blog post not found"),
    }
}
