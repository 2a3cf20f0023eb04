//! Shared fixtures for the HTTP-level tests: a recording scheduling backend
//! and helpers to drive the router with cookies.

#![allow(dead_code)]
#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::header::{COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use tower::ServiceExt;

use rota_console::api::build_router;
use rota_console::app_state::AppState;
use rota_console::backend::{
    AuthGrant, BackendError, BackendResult, LoginCredentials, SchedulingBackend,
};
use rota_console::config::{ConsoleConfig, LogFormat};
use rota_console::domain::{
    Credential, GenerationRequest, ShareToken, SharedSchedule, Shift, StaffMember, TenantId,
    Venue, VenueId, VenueSchedule,
};
use rota_console::storage::{KeyValuePort, MemoryKeyValue};

pub const PASSWORD: &str = "correct horse";
pub const ACCESS_TOKEN: &str = "cred-operator";
pub const VALID_SHARE_TOKEN: &str = "tok-alice";
pub const EMPTY_SHARE_TOKEN: &str = "tok-idle";
pub const BASE_URL: &str = "https://rota.example";

/// What the share endpoint answers.
#[derive(Debug, Clone)]
pub enum ShareBehavior {
    /// Known tokens resolve; everything else is rejected.
    Normal,
    /// Every call fails with a 5xx.
    Down,
}

/// In-memory [`SchedulingBackend`] that counts every call and records the
/// credential each authenticated call carried.
#[derive(Debug)]
pub struct StubBackend {
    tenant: Option<TenantId>,
    venues: Mutex<Vec<Venue>>,
    share: Mutex<ShareBehavior>,
    calls: AtomicUsize,
    share_calls: AtomicUsize,
    credentials: Mutex<Vec<String>>,
}

impl StubBackend {
    pub fn with_venues(venues: Vec<Venue>) -> Self {
        Self {
            tenant: Some(TenantId::new("t1")),
            venues: Mutex::new(venues),
            share: Mutex::new(ShareBehavior::Normal),
            calls: AtomicUsize::new(0),
            share_calls: AtomicUsize::new(0),
            credentials: Mutex::new(Vec::new()),
        }
    }

    pub fn without_tenant() -> Self {
        Self {
            tenant: None,
            ..Self::with_venues(Vec::new())
        }
    }

    pub fn set_venues(&self, venues: Vec<Venue>) {
        *self.venues.lock().unwrap_or_else(PoisonError::into_inner) = venues;
    }

    pub fn set_share_behavior(&self, behavior: ShareBehavior) {
        *self.share.lock().unwrap_or_else(PoisonError::into_inner) = behavior;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn share_calls(&self) -> usize {
        self.share_calls.load(Ordering::SeqCst)
    }

    pub fn credentials_seen(&self) -> Vec<String> {
        self.credentials
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, credential: Option<&Credential>) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(credential) = credential {
            self.credentials
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(credential.expose().to_string());
        }
    }

    fn authorize(&self, credential: &Credential) -> BackendResult<()> {
        if credential.expose() == ACCESS_TOKEN {
            Ok(())
        } else {
            Err(BackendError::Unauthorized)
        }
    }
}

#[async_trait]
impl SchedulingBackend for StubBackend {
    async fn authenticate(&self, credentials: &LoginCredentials) -> BackendResult<AuthGrant> {
        self.record(None);
        if credentials.password != PASSWORD {
            return Err(BackendError::InvalidCredentials);
        }
        Ok(AuthGrant {
            access_token: Credential::new(ACCESS_TOKEN),
            tenant_id: self.tenant.clone(),
        })
    }

    async fn request_password_reset(&self, _email: &str) -> BackendResult<()> {
        self.record(None);
        Ok(())
    }

    async fn reset_password(&self, reset_token: &str, _new_password: &str) -> BackendResult<()> {
        self.record(None);
        if reset_token == "reset-ok" {
            Ok(())
        } else {
            Err(BackendError::NotFound("reset token".to_string()))
        }
    }

    async fn list_venues(
        &self,
        credential: &Credential,
        _tenant: &TenantId,
    ) -> BackendResult<Vec<Venue>> {
        self.record(Some(credential));
        self.authorize(credential)?;
        Ok(self
            .venues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    async fn list_staff(
        &self,
        credential: &Credential,
        venue: &VenueId,
    ) -> BackendResult<Vec<StaffMember>> {
        self.record(Some(credential));
        self.authorize(credential)?;
        Ok(vec![StaffMember {
            id: format!("{venue}-alice"),
            name: "Alice".to_string(),
            role: "server".to_string(),
        }])
    }

    async fn venue_schedule(
        &self,
        credential: &Credential,
        venue: &VenueId,
    ) -> BackendResult<VenueSchedule> {
        self.record(Some(credential));
        self.authorize(credential)?;
        Ok(VenueSchedule {
            venue_id: venue.clone(),
            shifts: vec![shift("s1")],
            generated_at: None,
        })
    }

    async fn generate_schedule(
        &self,
        credential: &Credential,
        venue: &VenueId,
        _request: &GenerationRequest,
    ) -> BackendResult<VenueSchedule> {
        self.record(Some(credential));
        self.authorize(credential)?;
        Ok(VenueSchedule {
            venue_id: venue.clone(),
            shifts: vec![shift("s1"), shift("s2")],
            generated_at: Some(Utc::now()),
        })
    }

    async fn create_share_token(
        &self,
        credential: &Credential,
        _venue: &VenueId,
        _staff_id: &str,
    ) -> BackendResult<ShareToken> {
        self.record(Some(credential));
        self.authorize(credential)?;
        ShareToken::parse(VALID_SHARE_TOKEN).map_err(|e| BackendError::Upstream {
            status: 500,
            message: e.to_string(),
        })
    }

    async fn shared_schedule(&self, token: &ShareToken) -> BackendResult<SharedSchedule> {
        self.record(None);
        self.share_calls.fetch_add(1, Ordering::SeqCst);
        let behavior = self
            .share
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match (behavior, token.as_str()) {
            (ShareBehavior::Down, _) => Err(BackendError::Upstream {
                status: 503,
                message: "maintenance".to_string(),
            }),
            (ShareBehavior::Normal, VALID_SHARE_TOKEN) => Ok(SharedSchedule {
                venue_name: "Harbor".to_string(),
                staff_name: "Alice".to_string(),
                shifts: vec![shift("s1")],
            }),
            (ShareBehavior::Normal, EMPTY_SHARE_TOKEN) => Ok(SharedSchedule {
                venue_name: "Harbor".to_string(),
                staff_name: "Bob".to_string(),
                shifts: Vec::new(),
            }),
            (ShareBehavior::Normal, _) => Err(BackendError::TokenRejected),
        }
    }
}

pub fn venue(id: &str) -> Venue {
    Venue {
        id: VenueId::from(id),
        name: format!("Venue {id}"),
        address: String::new(),
    }
}

pub fn shift(id: &str) -> Shift {
    let starts_at = Utc
        .with_ymd_and_hms(2030, 1, 7, 9, 0, 0)
        .single()
        .unwrap_or_else(Utc::now);
    Shift {
        id: id.to_string(),
        staff_id: "alice".to_string(),
        staff_name: "Alice".to_string(),
        role: "server".to_string(),
        starts_at,
        ends_at: starts_at + chrono::Duration::hours(8),
    }
}

pub fn test_config() -> ConsoleConfig {
    ConsoleConfig {
        listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        backend_url: reqwest::Url::parse("http://127.0.0.1:9").unwrap_or_else(|e| panic!("{e}")),
        backend_timeout: Duration::from_secs(2),
        storage_dir: PathBuf::from("unused"),
        session_ttl: chrono::Duration::hours(1),
        session_cookie: "rota_session".to_string(),
        profile_cookie: "rota_profile".to_string(),
        cookie_secure: false,
        public_base_url: BASE_URL.to_string(),
        event_bus_capacity: 64,
        profile_cache_capacity: 64,
        profile_idle_ttl: chrono::Duration::hours(1),
        log_format: LogFormat::Text,
    }
}

/// Router plus handles on its backend and storage.
#[derive(Debug)]
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub backend: Arc<StubBackend>,
    pub storage: Arc<MemoryKeyValue>,
}

impl TestApp {
    pub fn new(backend: StubBackend) -> Self {
        let storage = Arc::new(MemoryKeyValue::new());
        let storage_port: Arc<dyn KeyValuePort> = Arc::clone(&storage) as _;
        Self::build(backend, storage, storage_port)
    }

    /// App whose selections go to `port`; `storage` stays empty.
    pub fn over_storage(backend: StubBackend, port: Arc<dyn KeyValuePort>) -> Self {
        Self::build(backend, Arc::new(MemoryKeyValue::new()), port)
    }

    fn build(
        backend: StubBackend,
        storage: Arc<MemoryKeyValue>,
        storage_port: Arc<dyn KeyValuePort>,
    ) -> Self {
        let backend = Arc::new(backend);
        let backend_port: Arc<dyn SchedulingBackend> = Arc::clone(&backend) as _;
        let state = AppState::build(&test_config(), backend_port, storage_port);
        let router = build_router(&state).with_state(state.clone());
        Self {
            router,
            state,
            backend,
            storage,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let Ok(response) = self.router.clone().oneshot(request).await else {
            panic!("router is infallible");
        };
        let status = response.status();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let set_cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect();
        let Ok(bytes) = to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body must be readable");
        };
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        TestResponse {
            status,
            location,
            set_cookies,
            body,
        }
    }

    /// Logs in and returns the `Cookie` header value for the new session.
    pub async fn login(&self) -> String {
        let response = self
            .send(json_request(
                "POST",
                "/login",
                None,
                &serde_json::json!({ "email": "owner@example.com", "password": PASSWORD }),
            ))
            .await;
        assert_eq!(response.status, StatusCode::OK);
        let Some(cookie) = response.cookie("rota_session") else {
            panic!("login must set the session cookie");
        };
        format!("rota_session={cookie}")
    }

    /// Logs in and performs one dashboard request so a profile is minted.
    /// Returns the combined `Cookie` header value.
    pub async fn login_with_profile(&self) -> String {
        let session = self.login().await;
        let response = self.send(get("/dashboard/venues", Some(&session))).await;
        let Some(profile) = response.cookie("rota_profile") else {
            panic!("first dashboard request must mint a profile cookie");
        };
        let cookie = format!("{session}; rota_profile={profile}");
        // The first request carrying the cookie loads the durable context.
        self.send(get("/dashboard/venues", Some(&cookie))).await;
        cookie
    }
}

/// Collected response parts.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub set_cookies: Vec<String>,
    pub body: serde_json::Value,
}

impl TestResponse {
    /// Value of a cookie set by this response.
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.set_cookies.iter().find_map(|line| {
            let pair = line.split(';').next()?;
            let (key, value) = pair.split_once('=')?;
            (key == name).then(|| value.to_string())
        })
    }

    pub fn str_at(&self, pointer: &str) -> Option<&str> {
        self.body.pointer(pointer).and_then(|v| v.as_str())
    }
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let Ok(request) = builder.body(Body::empty()) else {
        panic!("valid request");
    };
    request
}

pub fn json_request(
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: &serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let Ok(request) = builder.body(Body::from(body.to_string())) else {
        panic!("valid request");
    };
    request
}
