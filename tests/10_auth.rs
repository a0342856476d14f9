mod common;

use anyhow::Result;
use reqwest::{Method, StatusCode};

use common::{TestServer, TOKEN};

#[tokio::test]
async fn every_route_requires_the_token() -> Result<()> {
    let server = TestServer::spawn().await?;

    let routes = [
        (Method::GET, "/health"),
        (Method::GET, "/projects"),
        (Method::POST, "/projects"),
        (Method::GET, "/projects/p1"),
        (Method::PUT, "/projects/p1"),
        (Method::DELETE, "/projects/p1"),
        (Method::GET, "/projects/p1/reports"),
        (Method::POST, "/projects/p1/reports"),
        (Method::GET, "/projects/p1/reports/r1"),
        (Method::PUT, "/projects/p1/reports/r1"),
        (Method::DELETE, "/projects/p1/reports/r1"),
        (Method::GET, "/reports/keywords/cat"),
        (Method::OPTIONS, "/projects"),
        (Method::OPTIONS, "/projects/p1/reports/r1"),
    ];

    for (method, path) in routes {
        let res = server.anonymous(method.clone(), path).send().await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{} {}", method, path);

        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    Ok(())
}

#[tokio::test]
async fn token_must_match_exactly() -> Result<()> {
    let server = TestServer::spawn().await?;

    for header in [format!("Bearer {}", TOKEN), TOKEN.to_uppercase(), "Password123".to_string()] {
        let res = server
            .anonymous(Method::GET, "/projects")
            .header("Authorization", header.as_str())
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "header {:?}", header);
    }

    let res = server.get("/projects").send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn browser_preflight_passes_without_the_token() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .anonymous(Method::OPTIONS, "/projects")
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "POST")
        .send()
        .await?;
    assert_ne!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:3000")
    );
    Ok(())
}

#[tokio::test]
async fn rejected_writes_do_not_reach_the_store() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .anonymous(Method::POST, "/projects")
        .json(&serde_json::json!({ "id": "p1", "name": "Sneaky", "description": "x" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = server.get("/projects/p1").send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server.get("/health").send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}
