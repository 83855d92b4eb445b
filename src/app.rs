use axum::http::{header, HeaderValue};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::errors::AppError;
use crate::routes::{auth, health, portfolio, quote, trade};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .merge(health::router())
        .merge(portfolio::router())
        .merge(trade::router())
        .merge(quote::router())
        .merge(auth::router())
        .fallback(not_found)
        // responses carry account data; never let a browser or proxy cache them
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::EXPIRES,
            HeaderValue::from_static("0"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::PRAGMA,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_state, FixedPrices};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn send(app: &Router, req: Request<Body>) -> Response {
        app.clone().oneshot(req).await.unwrap()
    }

    fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn session_cookie(resp: &Response) -> String {
        let raw = resp
            .headers()
            .get(header::SET_COOKIE)
            .expect("session cookie")
            .to_str()
            .unwrap();
        raw.split(';').next().unwrap().to_string()
    }

    async fn json(resp: Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn text(resp: Response) -> String {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn app_with(prices: &[(&str, i64)]) -> (Router, Arc<FixedPrices>) {
        let prices = Arc::new(FixedPrices::new(prices));
        (create_app(test_state(prices.clone()).await), prices)
    }

    async fn register(app: &Router, username: &str) -> String {
        let body = format!("username={0}&password=pw&confirmation=pw", username);
        let resp = send(app, post_form("/register", &body, None)).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        session_cookie(&resp)
    }

    #[tokio::test]
    async fn portfolio_requires_login() {
        let (app, _) = app_with(&[]).await;
        let resp = send(&app, get("/", None)).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers()[header::LOCATION], "/login");

        let forged = send(&app, get("/", Some("session=forged.token.value"))).await;
        assert_eq!(forged.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn register_buy_and_view_portfolio() {
        let (app, _) = app_with(&[("NFLX", 5_000)]).await;
        let cookie = register(&app, "alice").await;

        let resp = send(&app, post_form("/buy", "symbol=nflx&shares=10", Some(&cookie))).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers()[header::LOCATION], "/");

        let resp = send(&app, get("/", Some(&cookie))).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CACHE_CONTROL],
            "no-cache, no-store, must-revalidate"
        );
        assert_eq!(resp.headers()[header::EXPIRES], "0");
        assert_eq!(resp.headers()[header::PRAGMA], "no-cache");
        let view = json(resp).await;
        assert_eq!(view["cash"], 950_000);
        assert_eq!(view["holdings"][0]["symbol"], "NFLX");
        assert_eq!(view["holdings"][0]["shares"], 10);
        assert_eq!(view["grand_total"], 1_000_000);

        let history = json(send(&app, get("/history", Some(&cookie))).await).await;
        assert_eq!(history[0]["side"], "buy");
        assert_eq!(history[0]["price"], 5_000);
    }

    #[tokio::test]
    async fn rejected_buy_reports_reason() {
        let (app, _) = app_with(&[("NFLX", 5_000)]).await;
        let cookie = register(&app, "alice").await;

        let resp = send(&app, post_form("/buy", "symbol=NFLX&shares=1000", Some(&cookie))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(text(resp).await, "Insufficient funds");

        let resp = send(&app, post_form("/buy", "symbol=ZZZZ&shares=1", Some(&cookie))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(text(resp).await, "Invalid symbol");
    }

    #[tokio::test]
    async fn non_form_bodies_are_bad_requests() {
        let (app, _) = app_with(&[("NFLX", 5_000)]).await;
        let cookie = register(&app, "alice").await;

        let json_buy = Request::builder()
            .method("POST")
            .uri("/buy")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, &cookie)
            .body(Body::from(r#"{"symbol":"NFLX","shares":"1"}"#))
            .unwrap();
        assert_eq!(send(&app, json_buy).await.status(), StatusCode::BAD_REQUEST);

        let bare_login = Request::builder()
            .method("POST")
            .uri("/login")
            .body(Body::from("username=alice&password=pw"))
            .unwrap();
        assert_eq!(send(&app, bare_login).await.status(), StatusCode::BAD_REQUEST);

        let view = json(send(&app, get("/", Some(&cookie))).await).await;
        assert_eq!(view["cash"], 1_000_000);
    }

    #[tokio::test]
    async fn sell_route_round_trip() {
        let (app, prices) = app_with(&[("NFLX", 5_000)]).await;
        let cookie = register(&app, "alice").await;

        send(&app, post_form("/buy", "symbol=NFLX&shares=2", Some(&cookie))).await;
        prices.set_price("NFLX", 7_500);
        let resp = send(&app, post_form("/sell", "symbol=NFLX&shares=2", Some(&cookie))).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);

        let view = json(send(&app, get("/", Some(&cookie))).await).await;
        assert_eq!(view["cash"], 1_005_000);
        assert_eq!(view["holdings"].as_array().unwrap().len(), 0);

        let resp = send(&app, post_form("/sell", "symbol=NFLX&shares=1", Some(&cookie))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_and_logout() {
        let (app, _) = app_with(&[]).await;
        register(&app, "alice").await;

        let bad = send(&app, post_form("/login", "username=alice&password=nope", None)).await;
        assert_eq!(bad.status(), StatusCode::FORBIDDEN);

        let good = send(&app, post_form("/login", "username=alice&password=pw", None)).await;
        assert_eq!(good.status(), StatusCode::SEE_OTHER);
        let cookie = session_cookie(&good);
        assert_eq!(send(&app, get("/", Some(&cookie))).await.status(), StatusCode::OK);

        let out = send(&app, get("/logout", Some(&cookie))).await;
        assert_eq!(session_cookie(&out), "session=");
    }

    #[tokio::test]
    async fn duplicate_registration_is_refused() {
        let (app, _) = app_with(&[]).await;
        register(&app, "alice").await;
        let resp = send(
            &app,
            post_form("/register", "username=alice&password=x&confirmation=x", None),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn quote_returns_price() {
        let (app, _) = app_with(&[("AAPL", 18_999)]).await;
        let cookie = register(&app, "alice").await;
        let quote = json(send(&app, post_form("/quote", "symbol=aapl", Some(&cookie))).await).await;
        assert_eq!(quote["symbol"], "AAPL");
        assert_eq!(quote["price"], 18_999);
    }

    #[tokio::test]
    async fn forms_and_unknown_routes() {
        let (app, _) = app_with(&[]).await;
        let cookie = register(&app, "alice").await;

        let form = text(send(&app, get("/buy", Some(&cookie))).await).await;
        assert!(form.contains("name=\"shares\""));

        assert_eq!(send(&app, get("/health", None)).await.status(), StatusCode::OK);
        assert_eq!(send(&app, get("/nowhere", None)).await.status(), StatusCode::NOT_FOUND);
    }
}
