use authapp::{
    app_lib::{ApiClient, AppConfig},
    features::{AppContext, Notice, auth::flows, auth::types::OtpKind, users},
    routes::Route,
};
use secrecy::SecretString;
use serde_json::json;
use std::{error::Error, net::TcpListener, sync::Arc};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn context_for(server: &MockServer) -> Result<AppContext, Box<dyn Error>> {
    let api = ApiClient::new(&AppConfig::new(&server.uri())?)?;
    Ok(AppContext::new(Arc::new(api)))
}

fn user_json(two_factor: bool) -> serde_json::Value {
    json!({
        "_id": "u1",
        "username": "jane",
        "email": "jane@example.com",
        "role": "USER",
        "isVerified": true,
        "isTwoFactorEnabled": two_factor
    })
}

#[tokio::test]
async fn two_factor_login_completes_through_verify_otp() -> Result<(), Box<dyn Error>> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "jane@example.com", "password": "secret1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Check your inbox",
            "token": "challenge"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/verify-otp"))
        .and(body_json(json!({
            "otp": "123456",
            "token": "challenge",
            "otpType": "TWO_FACTOR"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Welcome back",
            "code": "LOGIN_SUCCESS",
            "accessToken": "t1"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/user-info"))
        .and(header("authorization", "Bearer t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(true)))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context_for(&server)?;
    let first = flows::login(
        &ctx,
        "jane@example.com",
        SecretString::from("secret1".to_string()),
    )
    .await;

    assert_eq!(
        first.navigate,
        Some(Route::verify_otp("challenge", OtpKind::TwoFactor))
    );
    assert!(!ctx.auth().is_authenticated());

    let second = flows::verify_otp(
        &ctx,
        "challenge",
        OtpKind::TwoFactor,
        SecretString::from("123456".to_string()),
    )
    .await;

    assert_eq!(second.navigate, Some(Route::Home));
    assert_eq!(second.notice, Some(Notice::success("Welcome back")));
    assert!(ctx.auth().is_authenticated());
    Ok(())
}

#[tokio::test]
async fn rejected_login_surfaces_server_message() -> Result<(), Box<dyn Error>> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"success": false, "message": "Wrong credentials"})),
        )
        .mount(&server)
        .await;

    let ctx = context_for(&server)?;
    let outcome = flows::login(
        &ctx,
        "jane@example.com",
        SecretString::from("secret1".to_string()),
    )
    .await;

    assert_eq!(outcome.notice, Some(Notice::error("Wrong credentials")));
    assert_eq!(outcome.navigate, None);
    Ok(())
}

#[tokio::test]
async fn logout_clears_state_even_when_rejected() -> Result<(), Box<dyn Error>> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/get-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "accessToken": "t1"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/user-info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(false)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .and(header("authorization", "Bearer t1"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"success": false, "message": "Session expired"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context_for(&server)?;
    ctx.auth().initialize(ctx.backend()).await;
    assert!(ctx.auth().is_authenticated());

    let outcome = flows::logout(&ctx).await;

    assert_eq!(outcome.navigate, Some(Route::Login));
    assert_eq!(outcome.notice, Some(Notice::error("Session expired")));
    assert!(ctx.auth().token().is_none());
    assert!(ctx.auth().user().is_none());
    Ok(())
}

#[tokio::test]
async fn username_change_starts_an_otp_round() -> Result<(), Box<dyn Error>> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }

    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/users/change-mail-or-username"))
        .and(body_json(json!({"changeType": "USERNAME_CHANGE", "username": "janet"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Code sent",
            "token": "change-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context_for(&server)?;
    let outcome = users::flows::change_username(&ctx, "janet").await;

    assert_eq!(
        outcome.navigate,
        Some(Route::verify_otp("change-1", OtpKind::UsernameChange))
    );
    assert_eq!(outcome.notice, Some(Notice::success("Code sent")));
    Ok(())
}
