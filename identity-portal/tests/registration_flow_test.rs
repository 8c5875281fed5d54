mod common;

use axum::http::StatusCode;
use common::TestApp;
use identity_portal::flow::FlowPolicy;

const GOLF_DRAFT: &str =
    "first_name=Sara&last_name=Ali&password=Abc12345&confirm_password=Abc12345";

#[tokio::test]
async fn register_page_starts_at_code_entry_with_default_branding() {
    let mut app = TestApp::new();

    let page = app.get("/register").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Enter Invitation Code"));
    assert!(page.body.contains("<title>Dhuud Platform | Dhuud Secure</title>"));
    assert!(page.body.contains("--primary: 221.2 83.2% 53.3%;"));
    assert!(page.body.contains(r#"<link rel="icon""#));
}

#[tokio::test]
async fn unknown_code_shows_invalid_banner() {
    let mut app = TestApp::new();

    let page = app.post_form("/register/code", "code=nope").await;

    assert_eq!(page.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(page.body.contains("Invalid invitation code. Please check your link."));
    assert!(page.body.contains("Enter Invitation Code"));
    assert!(page.body.contains(r#"value="nope""#));
}

#[tokio::test]
async fn short_code_reaches_gateway_unless_policy_enforced() {
    let mut lenient = TestApp::new();
    let page = lenient.post_form("/register/code", "code=abc").await;
    assert!(page.body.contains("Invalid invitation code. Please check your link."));
    assert!(!page.body.contains("Code is too short"));

    let mut strict = TestApp::with_policy(FlowPolicy {
        enforce_code_length: true,
    });
    let page = strict.post_form("/register/code", "code=abc").await;
    assert_eq!(page.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(page.body.contains("Code is too short"));
    assert!(!page.body.contains("Invalid invitation code"));
}

#[tokio::test]
async fn expired_code_shows_expired_banner() {
    let mut app = TestApp::new();

    let page = app.post_form("/register/code", "code=expired").await;

    assert_eq!(page.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(page.body.contains("This invitation link has expired."));
}

#[tokio::test]
async fn golf_invite_switches_branding_and_shows_form() {
    let mut app = TestApp::new();

    let page = app
        .post_form("/register/code", "code=INVITE-GOLF-SIGNUP")
        .await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("consultant@golfsaudi.com"));
    assert!(page.body.contains("Safety Officer"));
    assert!(page.body.contains("Create Account"));
    assert!(page.body.contains("<title>GOLF SAUDI Co. | Dhuud Secure</title>"));
    assert!(page.body.contains("--primary: 142.1 76.2% 36.3%;"));
    assert!(page.body.contains(r#"data-tenant="golf-saudi""#));
}

#[tokio::test]
async fn existing_user_invite_redirects_to_login() {
    let mut app = TestApp::new();

    let response = app
        .post_form("/register/code", "code=INVITE-DHUUD-LOGIN")
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/login"));

    let page = app.get("/register").await;
    assert!(page.body.contains("Enter Invitation Code"));
}

#[tokio::test]
async fn code_in_query_is_submitted_on_load() {
    let mut app = TestApp::new();
    let page = app.get("/register?code=INVITE-GOLF-SIGNUP").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("consultant@golfsaudi.com"));

    let mut app = TestApp::new();
    let response = app.get("/register?code=INVITE-DHUUD-LOGIN").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/login"));
}

#[tokio::test]
async fn query_code_is_ignored_once_past_code_entry() {
    let mut app = TestApp::new();
    app.post_form("/register/code", "code=INVITE-GOLF-SIGNUP").await;

    let page = app.get("/register?code=nope").await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("consultant@golfsaudi.com"));
    assert!(!page.body.contains("Invalid invitation code"));
}

#[tokio::test]
async fn valid_registration_reaches_success() {
    let mut app = TestApp::new();
    app.post_form("/register/code", "code=INVITE-GOLF-SIGNUP").await;

    let page = app.post_form("/register", GOLF_DRAFT).await;

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Account Created Successfully"));
    assert!(page.body.contains(r#"href="/login""#));
}

#[tokio::test]
async fn invalid_draft_keeps_names_and_reports_errors() {
    let mut app = TestApp::new();
    app.post_form("/register/code", "code=INVITE-GOLF-SIGNUP").await;

    let page = app
        .post_form(
            "/register",
            "first_name=Sara&last_name=A&password=abc12345&confirm_password=abc12346",
        )
        .await;

    assert_eq!(page.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(page.body.contains("Last name required"));
    assert!(page.body.contains("Must contain uppercase"));
    assert!(page.body.contains("Passwords do not match"));
    assert!(page.body.contains(r#"value="Sara""#));
    assert!(!page.body.contains("Account Created Successfully"));
}

#[tokio::test]
async fn out_of_step_actions_conflict_and_change_nothing() {
    let mut app = TestApp::new();

    let page = app.post_form("/register", GOLF_DRAFT).await;
    assert_eq!(page.status, StatusCode::CONFLICT);
    assert!(page.body.contains("Enter Invitation Code"));

    app.post_form("/register/code", "code=INVITE-GOLF-SIGNUP").await;
    let page = app
        .post_form("/register/code", "code=INVITE-DHUUD-STAFF")
        .await;
    assert_eq!(page.status, StatusCode::CONFLICT);
    assert!(page.body.contains("consultant@golfsaudi.com"));
    assert!(page.body.contains("<title>GOLF SAUDI Co. | Dhuud Secure</title>"));
}

#[tokio::test]
async fn visiting_login_restarts_registration_but_keeps_branding() {
    let mut app = TestApp::new();
    app.post_form("/register/code", "code=INVITE-GOLF-SIGNUP").await;

    app.get("/login").await;
    let page = app.get("/register").await;

    assert!(page.body.contains("Enter Invitation Code"));
    assert!(page.body.contains("<title>GOLF SAUDI Co. | Dhuud Secure</title>"));

    let page = app
        .post_form("/register/code", "code=INVITE-DHUUD-STAFF")
        .await;
    assert!(page.body.contains("new.staff@dhuud.com"));
    assert!(page.body.contains("<title>Dhuud Platform | Dhuud Secure</title>"));
}

#[tokio::test]
async fn browsers_do_not_share_branding() {
    let mut golf = TestApp::new();
    let mut other = golf.new_browser();

    golf.post_form("/register/code", "code=INVITE-GOLF-SIGNUP").await;
    let page = other.get("/register").await;

    assert!(page.body.contains("<title>Dhuud Platform | Dhuud Secure</title>"));
    assert_eq!(golf.sessions.len(), 1);
}
