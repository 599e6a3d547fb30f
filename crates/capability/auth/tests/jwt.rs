use domain::CallerContext;
use iot_auth::JwtManager;
use uuid::Uuid;

#[test]
fn jwt_issue_and_decode() {
    let jwt = JwtManager::new("secret".to_string(), 3600, 7200);
    let user_id = Uuid::new_v4();
    let ctx = CallerContext::new(user_id, Some(1), None);

    let tokens = jwt.issue_tokens(&ctx).expect("tokens");
    let access_ctx = jwt.decode_access(&tokens.access_token).expect("access");
    let refresh_ctx = jwt.decode_refresh(&tokens.refresh_token).expect("refresh");

    assert_eq!(access_ctx.user_id, user_id);
    assert_eq!(access_ctx.organization_id, Some(1));
    assert_eq!(refresh_ctx.user_id, user_id);
}

#[test]
fn token_types_not_interchangeable() {
    let jwt = JwtManager::new("secret".to_string(), 3600, 7200);
    let ctx = CallerContext::new(Uuid::new_v4(), None, None);

    let tokens = jwt.issue_tokens(&ctx).expect("tokens");
    assert!(jwt.decode_access(&tokens.refresh_token).is_err());
    assert!(jwt.decode_refresh(&tokens.access_token).is_err());
}

#[test]
fn refresh_carries_jti() {
    let jwt = JwtManager::new("secret".to_string(), 3600, 7200);
    let ctx = CallerContext::new(Uuid::new_v4(), None, None);

    let tokens = jwt.issue_tokens(&ctx).expect("tokens");
    let (_, jti) = jwt
        .decode_refresh_with_jti(&tokens.refresh_token)
        .expect("refresh");
    assert_eq!(jti, tokens.refresh_jti);
}
