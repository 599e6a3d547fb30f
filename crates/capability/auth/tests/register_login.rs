use std::sync::Arc;

use iot_auth::{AuthError, AuthService, JwtManager};
use iot_storage::InMemoryUserStore;

fn service() -> AuthService {
    let user_store = Arc::new(InMemoryUserStore::new());
    let jwt = JwtManager::new("secret".to_string(), 3600, 7200);
    AuthService::new(user_store, jwt)
}

#[tokio::test]
async fn register_then_login() {
    let auth = service();
    let user = auth
        .register("alice@example.com", "pass-1234", Some(1), None)
        .await
        .expect("register");
    assert_eq!(user.email, "alice@example.com");
    assert!(user.password_hash.starts_with("$argon2"));

    let (logged_in, tokens) = auth
        .login("alice@example.com", "pass-1234")
        .await
        .expect("login");
    assert_eq!(logged_in.id, user.id);

    let ctx = auth
        .verify_access_token(&tokens.access_token)
        .expect("verify");
    assert_eq!(ctx.user_id, user.id);
    assert_eq!(ctx.organization_id, Some(1));
}

#[tokio::test]
async fn duplicate_email_rejected() {
    let auth = service();
    auth.register("bob@example.com", "pass-1234", None, None)
        .await
        .expect("register");
    let err = auth
        .register("bob@example.com", "other-pass", None, None)
        .await
        .expect_err("duplicate");
    assert!(matches!(err, AuthError::EmailTaken));
}

#[tokio::test]
async fn refresh_rotates_jti() {
    let auth = service();
    auth.register("carol@example.com", "pass-1234", None, None)
        .await
        .expect("register");
    let (_, tokens) = auth
        .login("carol@example.com", "pass-1234")
        .await
        .expect("login");

    let rotated = auth.refresh(&tokens.refresh_token).await.expect("refresh");
    // 旧 refresh token 的 jti 已被轮换，重放失效
    let err = auth
        .refresh(&tokens.refresh_token)
        .await
        .expect_err("replay");
    assert!(matches!(err, AuthError::TokenInvalid));
    auth.refresh(&rotated.refresh_token).await.expect("rotated");
}

#[tokio::test]
async fn wrong_password_is_invalid_credentials() {
    let auth = service();
    auth.register("dave@example.com", "pass-1234", None, None)
        .await
        .expect("register");
    let err = auth
        .login("dave@example.com", "nope")
        .await
        .expect_err("login");
    assert!(matches!(err, AuthError::InvalidCredentials));
}
