use askama::Template;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};

use super::PageChrome;
use crate::dtos::LoginForm;
use crate::flow::LoginOutcome;
use crate::session::{PortalContext, PortalSession};
use crate::validation::FieldErrors;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub chrome: PageChrome,
    pub email: String,
    pub errors: FieldErrors,
    pub global_error: Option<String>,
    pub notification: Option<String>,
}

impl LoginTemplate {
    fn new(context: &PortalContext, email: String) -> Self {
        Self {
            chrome: PageChrome::from_context(context),
            email,
            errors: FieldErrors::new(),
            global_error: None,
            notification: None,
        }
    }
}

/// Opening the login page abandons any registration in progress.
#[tracing::instrument(skip_all, fields(portal_id = %portal.id))]
pub async fn login_page(portal: PortalSession) -> Response {
    let mut context = portal.lock().await;
    context.registration.leave();
    LoginTemplate::new(&context, String::new()).into_response()
}

#[tracing::instrument(skip_all, fields(portal_id = %portal.id))]
pub async fn login_handler(portal: PortalSession, Form(form): Form<LoginForm>) -> Response {
    let context = portal.lock().await;
    let outcome = context.login.submit(&form).await;

    let mut page = LoginTemplate::new(&context, form.email.clone());
    let status = match outcome {
        LoginOutcome::Invalid(errors) => {
            page.errors = errors;
            StatusCode::UNPROCESSABLE_ENTITY
        }
        LoginOutcome::Failed(message) => {
            page.global_error = Some(message);
            StatusCode::UNPROCESSABLE_ENTITY
        }
        LoginOutcome::Notified(message) => {
            page.notification = Some(message);
            StatusCode::OK
        }
    };

    (status, page).into_response()
}
