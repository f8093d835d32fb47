use crate::{
    api::{analytics, employee, map},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{HttpResponse, Responder, get, middleware::from_fn, web};
use serde_json::json;
use std::sync::Arc;

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = Object, example = json!({
            "status": "ok"
        }))
    ),
    tag = "Health"
)]
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

// Helper to build per-route limiter
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / u64::from(requests_per_min)).max(1);

    // both values are non-zero, which is all the builder checks
    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_default();
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let refresh_limiter = Arc::new(build_limiter(config.rate_refresh_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    cfg.service(health);

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter)
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter)
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .route("/me", web::get().to(handlers::me))
            .service(
                web::scope("/employees")
                    // /employees
                    .service(web::resource("").route(web::get().to(employee::list_employees)))
                    // /employees/profile
                    .service(
                        web::resource("/profile").route(web::post().to(employee::employee_profile)),
                    ),
            )
            .route("/analytics", web::get().to(analytics::analytics))
            .route("/map", web::get().to(map::employee_map)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::{
            jwt::{generate_access_token, generate_refresh_token},
            revocation::RevokedTokens,
        },
        roster::{RosterClient, client::tests::FakeRoster},
    };
    use actix_web::{
        App,
        http::{StatusCode, header, header::HeaderValue},
        test,
    };
    use serde_json::Value;
    use std::net::SocketAddr;

    const PEER: &str = "10.0.0.1:4000";

    macro_rules! directory_app {
        ($config:expr) => {{
            let config: Config = $config;
            let roster = RosterClient::from_config(&config).unwrap();
            let revoked = RevokedTokens::new(config.refresh_token_ttl);
            let routes_config = config.clone();
            test::init_service(
                App::new()
                    .app_data(web::Data::new(config))
                    .app_data(web::Data::new(roster))
                    .app_data(web::Data::new(revoked))
                    .configure(|cfg| configure(cfg, &routes_config)),
            )
            .await
        }};
    }

    fn peer() -> SocketAddr {
        PEER.parse().unwrap()
    }

    #[actix_web::test]
    async fn health_is_public() {
        let app = directory_app!(Config::for_tests("http://127.0.0.1:1/unused"));

        let req = test::TestRequest::get().uri("/health").peer_addr(peer()).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn views_require_a_token() {
        let app = directory_app!(Config::for_tests("http://127.0.0.1:1/unused"));

        for uri in ["/api/employees", "/api/analytics", "/api/map", "/api/me"] {
            let req = test::TestRequest::get().uri(uri).peer_addr(peer()).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");
        }
    }

    #[actix_web::test]
    async fn refresh_tokens_do_not_open_views() {
        let config = Config::for_tests("http://127.0.0.1:1/unused");
        let (refresh, _) = generate_refresh_token("admin", &config.jwt_secret, 60).unwrap();
        let app = directory_app!(config);

        let req = test::TestRequest::get()
            .uri("/api/me")
            .peer_addr(peer())
            .insert_header(("Authorization", format!("Bearer {refresh}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn access_token_opens_the_directory() {
        let upstream = FakeRoster::start(200, r#"[{"id":"1","user_name":"Ann Lee"}]"#).await;
        let config = Config::for_tests(&upstream.url);
        let access = generate_access_token("admin", &config.jwt_secret, 60).unwrap();
        let app = directory_app!(config);

        let req = test::TestRequest::get()
            .uri("/api/me")
            .peer_addr(peer())
            .insert_header(("Authorization", format!("Bearer {access}")))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["username"], "admin");

        let req = test::TestRequest::get()
            .uri("/api/employees?search=ann")
            .peer_addr(peer())
            .insert_header(("Authorization", format!("Bearer {access}")))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["matched"], 1);

        upstream.stop().await;
    }

    #[actix_web::test]
    async fn zero_rate_still_builds_a_limiter() {
        let _ = build_limiter(0);
    }

    #[actix_web::test]
    async fn undecodable_authorization_header_gets_a_json_401() {
        let app = directory_app!(Config::for_tests("http://127.0.0.1:1/unused"));

        let req = test::TestRequest::get()
            .uri("/api/me")
            .peer_addr(peer())
            .insert_header(("Authorization", HeaderValue::from_bytes(b"Bearer \xff").unwrap()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid Authorization header encoding");
    }
}
