use crate::{
    auth::{
        auth::AuthUser,
        jwt::{generate_access_token, generate_refresh_token, verify_token},
        password::verify_password,
        revocation::RevokedTokens,
    },
    config::Config,
    models::{Claims, LoginReqDto, TokenPair, TokenType},
};
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde_json::json;
use tracing::{debug, error, info, instrument};

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Sign a fresh access/refresh pair for `username`.
fn issue_pair(username: &str, config: &Config) -> Result<TokenPair, HttpResponse> {
    let access_token =
        generate_access_token(username, &config.jwt_secret, config.access_token_ttl);
    let refresh_token =
        generate_refresh_token(username, &config.jwt_secret, config.refresh_token_ttl);

    match (access_token, refresh_token) {
        (Ok(access_token), Ok((refresh_token, _))) => Ok(TokenPair {
            access_token,
            refresh_token,
        }),
        (Err(e), _) | (_, Err(e)) => {
            error!(error = %e, "Failed to sign tokens");
            Err(HttpResponse::InternalServerError().finish())
        }
    }
}

/// Verify a refresh token and spend it.
///
/// Yields the claims only to the one request that revoked the token, so a
/// refresh token can be exchanged or logged out at most once.
async fn spend_refresh_token(
    req: &HttpRequest,
    config: &Config,
    revoked: &RevokedTokens,
) -> Option<Claims> {
    let claims = verify_token(bearer_token(req)?, &config.jwt_secret).ok()?;

    if claims.token_type != TokenType::Refresh || !revoked.revoke(&claims.jti).await {
        return None;
    }

    Some(claims)
}

/// Log in to the directory
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Token pair issued", body = TokenPair),
        (status = 400, description = "Username or password missing"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(config, user),
    fields(username = %user.username)
)]
pub async fn login(user: web::Json<LoginReqDto>, config: web::Data<Config>) -> impl Responder {
    info!("Login request received");

    // 1️⃣ Basic validation
    if user.username.trim().is_empty() || user.password.is_empty() {
        info!("Validation failed: empty username or password");
        return HttpResponse::BadRequest().json(json!({
            "error": "Username or password required"
        }));
    }

    // 2️⃣ Check user
    if user.username.trim() != config.directory_username {
        info!("Invalid credentials: unknown user");
        return HttpResponse::Unauthorized().json(json!({ "error": "Invalid credentials" }));
    }

    // 3️⃣ Verify password
    debug!("Verifying password");

    if let Err(e) = verify_password(&user.password, &config.directory_password_hash) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return HttpResponse::Unauthorized().json(json!({ "error": "Invalid credentials" }));
    }

    // 4️⃣ Issue tokens
    debug!("Generating token pair");

    match issue_pair(&config.directory_username, &config) {
        Ok(pair) => {
            info!("Login successful");
            HttpResponse::Ok().json(pair)
        }
        Err(resp) => resp,
    }
}

/// Exchange a refresh token for a new pair
#[utoipa::path(
    post,
    path = "/auth/refresh",
    responses(
        (status = 200, description = "Rotated token pair", body = TokenPair),
        (status = 401, description = "Missing, invalid or revoked refresh token")
    ),
    tag = "Auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn refresh_token(
    req: HttpRequest,
    config: web::Data<Config>,
    revoked: web::Data<RevokedTokens>,
) -> impl Responder {
    // 🔥 old refresh token is revoked by the time we get claims
    let Some(claims) = spend_refresh_token(&req, &config, &revoked).await else {
        return HttpResponse::Unauthorized().finish();
    };
    debug!(jti = %claims.jti, "Refresh token rotated");

    // 🔄 issue new pair
    match issue_pair(&claims.sub, &config) {
        Ok(pair) => HttpResponse::Ok().json(pair),
        Err(resp) => resp,
    }
}

/// Revoke a refresh token
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 204, description = "Logged out (also when the token was unknown)")
    ),
    tag = "Auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn logout(
    req: HttpRequest,
    config: web::Data<Config>,
    revoked: web::Data<RevokedTokens>,
) -> impl Responder {
    // only live refresh tokens can logout; anything else is a no-op
    if let Some(claims) = spend_refresh_token(&req, &config, &revoked).await {
        info!(username = %claims.sub, "Logged out");
    }

    HttpResponse::NoContent().finish()
}

/// Who am I
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Authenticated username", body = Object, example = json!({
            "username": "admin"
        })),
        (status = 401, description = "Missing or invalid access token")
    ),
    tag = "Auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn me(user: AuthUser) -> impl Responder {
    HttpResponse::Ok().json(json!({ "username": user.username }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test};

    fn app_data() -> (web::Data<Config>, web::Data<RevokedTokens>) {
        let config = Config::for_tests("http://127.0.0.1:1/unused");
        let revoked = RevokedTokens::new(config.refresh_token_ttl);
        (web::Data::new(config), web::Data::new(revoked))
    }

    macro_rules! auth_app {
        ($config:expr, $revoked:expr) => {
            test::init_service(
                App::new()
                    .app_data($config.clone())
                    .app_data($revoked.clone())
                    .route("/auth/login", web::post().to(login))
                    .route("/auth/refresh", web::post().to(refresh_token))
                    .route("/auth/logout", web::post().to(logout)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn login_issues_a_token_pair() {
        let (config, revoked) = app_data();
        let app = auth_app!(config, revoked);

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "username": "admin", "password": "s3cret" }))
            .to_request();
        let pair: TokenPair = test::call_and_read_body_json(&app, req).await;

        let access = verify_token(&pair.access_token, &config.jwt_secret).unwrap();
        let refresh = verify_token(&pair.refresh_token, &config.jwt_secret).unwrap();
        assert_eq!(access.sub, "admin");
        assert_eq!(access.token_type, TokenType::Access);
        assert_eq!(refresh.token_type, TokenType::Refresh);
    }

    #[actix_web::test]
    async fn login_rejects_bad_credentials() {
        let (config, revoked) = app_data();
        let app = auth_app!(config, revoked);

        for (username, password, status) in [
            ("admin", "wrong", StatusCode::UNAUTHORIZED),
            ("someone", "s3cret", StatusCode::UNAUTHORIZED),
            ("", "s3cret", StatusCode::BAD_REQUEST),
            ("admin", "", StatusCode::BAD_REQUEST),
        ] {
            let req = test::TestRequest::post()
                .uri("/auth/login")
                .set_json(json!({ "username": username, "password": password }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), status, "{username}/{password}");
        }
    }

    #[actix_web::test]
    async fn refresh_rotates_and_revokes() {
        let (config, revoked) = app_data();
        let app = auth_app!(config, revoked);
        let (refresh, _) =
            generate_refresh_token("admin", &config.jwt_secret, config.refresh_token_ttl).unwrap();

        let req = test::TestRequest::post()
            .uri("/auth/refresh")
            .insert_header(("Authorization", format!("Bearer {refresh}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        // the old refresh token is spent
        let req = test::TestRequest::post()
            .uri("/auth/refresh")
            .insert_header(("Authorization", format!("Bearer {refresh}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn access_tokens_cannot_refresh() {
        let (config, revoked) = app_data();
        let app = auth_app!(config, revoked);
        let access = generate_access_token("admin", &config.jwt_secret, 60).unwrap();

        let req = test::TestRequest::post()
            .uri("/auth/refresh")
            .insert_header(("Authorization", format!("Bearer {access}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn logout_revokes_refresh_token() {
        let (config, revoked) = app_data();
        let app = auth_app!(config, revoked);
        let (refresh, claims) =
            generate_refresh_token("admin", &config.jwt_secret, config.refresh_token_ttl).unwrap();

        let req = test::TestRequest::post()
            .uri("/auth/logout")
            .insert_header(("Authorization", format!("Bearer {refresh}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(revoked.is_revoked(&claims.jti));

        // logging out without a token is still fine
        let req = test::TestRequest::post().uri("/auth/logout").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }
}
