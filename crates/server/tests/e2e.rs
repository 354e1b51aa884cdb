use std::sync::Arc;

use migration::MigratorTrait;
use serde_json::{json, Value};
use uuid::Uuid;

use server::routes::{self, ServerState};
use service::auth::{
    domain::AdminRegisterInput,
    repo::seaorm::SeaOrmAuthRepository,
    service::{AuthService, AuthSettings},
};

const JWT_SECRET: &str = "test-secret";

/// Boot the full router on an ephemeral port and return its base URL.
async fn spawn_app() -> anyhow::Result<(String, sea_orm::DatabaseConnection)> {
    let mut cfg = configs::load_default().unwrap_or_default();
    cfg.database.normalize_from_env();
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;

    let state = ServerState { db: db.clone(), auth: AuthSettings::new(JWT_SECRET, 24) };
    let app = routes::build_router(
        tower_http::cors::CorsLayer::very_permissive(),
        state,
        "public",
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("test server stopped: {e}");
        }
    });
    Ok((format!("http://{addr}"), db))
}

/// Seed an admin directly through the service layer and log in over HTTP.
async fn admin_token(base: &str, db: &sea_orm::DatabaseConnection) -> anyhow::Result<String> {
    let svc = AuthService::new(
        Arc::new(SeaOrmAuthRepository { db: db.clone() }),
        AuthSettings::new(JWT_SECRET, 24),
    );
    let email = format!("admin_{}@example.com", Uuid::new_v4());
    svc.admin_register(AdminRegisterInput {
        username: format!("admin_{}", Uuid::new_v4()),
        email: email.clone(),
        password: "adminpass1".into(),
        first_name: Some("Admin".into()),
        last_name: Some("User".into()),
        role: Some("admin".into()),
        permissions: vec!["manage_users".into()],
    })
    .await?;

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{base}/api/auth/login"))
        .json(&json!({"email": email, "password": "adminpass1"}))
        .send()
        .await?;
    let body: Value = resp.json().await?;
    Ok(body["data"]["token"].as_str().unwrap_or_default().to_string())
}

#[tokio::test]
async fn booking_form_to_admin_dashboard() -> anyhow::Result<()> {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL missing; skip db test");
        return Ok(());
    }
    let (base, db) = spawn_app().await?;
    let client = reqwest::Client::new();

    // A visitor submits the booking form; guestCount arrives as a string
    let resp = client
        .post(format!("{base}/api/events"))
        .json(&json!({
            "name": "John Doe",
            "email": "john.doe@example.com",
            "eventType": "Wedding",
            "eventDate": "2024-12-25",
            "guestCount": "150"
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    let body: Value = resp.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["guestCount"], 150);
    let booking_id = body["data"]["id"].as_str().unwrap().to_string();

    // An admin finds the booking on the dashboard
    let token = admin_token(&base, &db).await?;
    let resp = client
        .get(format!("{base}/api/events?status=pending&limit=100"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let body: Value = resp.json().await?;
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|b| b["id"] == booking_id.as_str()));
    assert!(body["pagination"]["total"].as_u64().unwrap() >= 1);

    // And confirms it
    let resp = client
        .put(format!("{base}/api/events/{booking_id}/status"))
        .bearer_auth(&token)
        .json(&json!({"status": "confirmed"}))
        .send()
        .await?;
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let body: Value = resp.json().await?;
    assert_eq!(body["data"]["status"], "confirmed");

    // A made-up status is rejected
    let resp = client
        .put(format!("{base}/api/events/{booking_id}/status"))
        .bearer_auth(&token)
        .json(&json!({"status": "maybe"}))
        .send()
        .await?;
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn contact_form_and_response_workflow() -> anyhow::Result<()> {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL missing; skip db test");
        return Ok(());
    }
    let (base, db) = spawn_app().await?;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/contact"))
        .json(&json!({
            "name": "Mary Major",
            "email": "mary@example.com",
            "subject": "Catering question",
            "message": "Do you handle vegan menus?"
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    let body: Value = resp.json().await?;
    assert_eq!(body["data"]["status"], "new");
    assert_eq!(body["data"]["priority"], "medium");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let token = admin_token(&base, &db).await?;
    let resp = client
        .put(format!("{base}/api/contact/{id}/status"))
        .bearer_auth(&token)
        .json(&json!({"status": "replied", "response": "Yes, we do."}))
        .send()
        .await?;
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let body: Value = resp.json().await?;
    assert_eq!(body["data"]["status"], "replied");
    assert_eq!(body["data"]["respondedBy"], "Admin User");
    assert!(body["data"]["respondedAt"].is_string());
    Ok(())
}

#[tokio::test]
async fn testimonials_featured_is_public_and_curated() -> anyhow::Result<()> {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL missing; skip db test");
        return Ok(());
    }
    let (base, db) = spawn_app().await?;
    let client = reqwest::Client::new();
    let token = admin_token(&base, &db).await?;

    // Staff enter a testimonial; it starts unapproved
    let marker = format!("Marker {}", Uuid::new_v4());
    let resp = client
        .post(format!("{base}/api/testimonials"))
        .bearer_auth(&token)
        .json(&json!({
            "name": "Sarah Johnson",
            "eventType": "Wedding",
            "rating": 5,
            "testimonial": marker
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    let body: Value = resp.json().await?;
    assert_eq!(body["data"]["isApproved"], false);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    // Not featured yet, so the public carousel must not show it
    let resp = client.get(format!("{base}/api/testimonials/featured")).send().await?;
    let body: Value = resp.json().await?;
    assert!(!body["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t["testimonial"] == marker.as_str()));

    // Approve and feature it
    let resp = client
        .put(format!("{base}/api/testimonials/{id}/status"))
        .bearer_auth(&token)
        .json(&json!({"isApproved": true, "isFeatured": true}))
        .send()
        .await?;
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    let resp = client.get(format!("{base}/api/testimonials/featured")).send().await?;
    let body: Value = resp.json().await?;
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t["testimonial"] == marker.as_str()));
    Ok(())
}

#[tokio::test]
async fn admin_deactivation_locks_account_out() -> anyhow::Result<()> {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL missing; skip db test");
        return Ok(());
    }
    let (base, db) = spawn_app().await?;
    let client = reqwest::Client::new();

    let email = format!("victim_{}@example.com", Uuid::new_v4());
    let resp = client
        .post(format!("{base}/api/auth/register"))
        .json(&json!({"fullName": "Soon Locked", "email": email, "password": "secret123"}))
        .send()
        .await?;
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    let body: Value = resp.json().await?;
    let user_id = body["data"]["id"].as_str().unwrap().to_string();

    let resp = client
        .post(format!("{base}/api/auth/login"))
        .json(&json!({"email": email, "password": "secret123"}))
        .send()
        .await?;
    let body: Value = resp.json().await?;
    let user_token = body["data"]["token"].as_str().unwrap().to_string();

    let admin = admin_token(&base, &db).await?;
    let resp = client
        .put(format!("{base}/api/auth/users/{user_id}/status"))
        .bearer_auth(&admin)
        .json(&json!({"isActive": false}))
        .send()
        .await?;
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    // Fresh logins fail with the dedicated message
    let resp = client
        .post(format!("{base}/api/auth/login"))
        .json(&json!({"email": email, "password": "secret123"}))
        .send()
        .await?;
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await?;
    assert_eq!(body["message"], "Account is deactivated");

    // And the old token dies with the account
    let resp = client
        .get(format!("{base}/api/auth/profile"))
        .bearer_auth(&user_token)
        .send()
        .await?;
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    Ok(())
}
