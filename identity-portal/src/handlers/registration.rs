use askama::Template;
use axum::{
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use super::PageChrome;
use crate::dtos::RegistrationDraft;
use crate::flow::{FlowError, Navigation};
use crate::models::InviteValidationResult;
use crate::session::{PortalContext, PortalSession};
use crate::validation::FieldErrors;

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub chrome: PageChrome,
    pub step: &'static str,
    pub invite_code: String,
    pub invite: Option<InviteValidationResult>,
    pub errors: FieldErrors,
    pub global_error: Option<String>,
    pub first_name: String,
    pub last_name: String,
}

impl RegisterTemplate {
    fn from_context(context: &PortalContext) -> Self {
        let flow = &context.registration;
        let (first_name, last_name) = flow
            .draft()
            .map(|draft| (draft.first_name.clone(), draft.last_name.clone()))
            .unwrap_or_default();

        Self {
            chrome: PageChrome::from_context(context),
            step: flow.step().as_str(),
            invite_code: flow.invite_code().to_string(),
            invite: flow.invite().cloned(),
            errors: flow.field_errors().clone(),
            global_error: flow.global_error().map(str::to_string),
            first_name,
            last_name,
        }
    }
}

#[derive(Deserialize)]
pub struct RegisterQuery {
    pub code: Option<String>,
}

#[derive(Deserialize)]
pub struct InviteCodeRequest {
    #[serde(default)]
    pub code: String,
}

fn respond(context: &PortalContext, outcome: Result<Navigation, FlowError>) -> Response {
    match outcome {
        Ok(navigation) => match navigation.path() {
            Some(path) => Redirect::to(path).into_response(),
            None => {
                let status = if context.registration.has_errors() {
                    StatusCode::UNPROCESSABLE_ENTITY
                } else {
                    StatusCode::OK
                };
                (status, RegisterTemplate::from_context(context)).into_response()
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "Registration action out of step");
            (StatusCode::CONFLICT, RegisterTemplate::from_context(context)).into_response()
        }
    }
}

#[tracing::instrument(skip_all, fields(portal_id = %portal.id))]
pub async fn register_page(portal: PortalSession, Query(query): Query<RegisterQuery>) -> Response {
    let mut context = portal.lock().await;
    let navigation = context.registration.load(query.code.as_deref()).await;
    respond(&context, Ok(navigation))
}

#[tracing::instrument(skip_all, fields(portal_id = %portal.id))]
pub async fn submit_code(portal: PortalSession, Form(form): Form<InviteCodeRequest>) -> Response {
    let mut context = portal.lock().await;
    let outcome = context.registration.submit_code(form.code.trim()).await;
    respond(&context, outcome)
}

#[tracing::instrument(skip_all, fields(portal_id = %portal.id))]
pub async fn submit_registration(
    portal: PortalSession,
    Form(draft): Form<RegistrationDraft>,
) -> Response {
    let mut context = portal.lock().await;
    let outcome = context.registration.submit_registration(draft).await;
    respond(&context, outcome)
}
