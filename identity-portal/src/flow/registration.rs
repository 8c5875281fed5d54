//! Invite-gated registration wizard.
//!
//! ```text
//! enter-code --submit--> validating --new user--> register --submit--> success
//!                            |  \--existing user--> (login)
//!                            \--failure--> enter-code (+ banner)
//! ```

use std::sync::Arc;
use thiserror::Error;

use super::Navigation;
use crate::dtos::{InviteCodeForm, RegisterPayload, RegistrationDraft};
use crate::models::{InviteValidationResult, TenantCatalog};
use crate::services::{metrics, AuthGateway, GatewayError};
use crate::store::TenantStore;
use crate::validation::{validate_form, FieldErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStep {
    EnterCode,
    Validating,
    Register,
    Success,
}

impl RegistrationStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStep::EnterCode => "enter-code",
            RegistrationStep::Validating => "validating",
            RegistrationStep::Register => "register",
            RegistrationStep::Success => "success",
        }
    }
}

impl std::fmt::Display for RegistrationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action arrived in a step that does not accept it. State is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot {action} while in step {step}")]
pub struct FlowError {
    pub step: RegistrationStep,
    pub action: &'static str,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlowPolicy {
    /// Reject codes shorter than five characters before calling the gateway.
    pub enforce_code_length: bool,
}

pub struct RegistrationFlow {
    step: RegistrationStep,
    invite_code: String,
    invite: Option<InviteValidationResult>,
    draft: Option<RegistrationDraft>,
    field_errors: FieldErrors,
    global_error: Option<String>,
    gateway: Arc<dyn AuthGateway>,
    store: Arc<TenantStore>,
    catalog: Arc<TenantCatalog>,
    policy: FlowPolicy,
}

impl RegistrationFlow {
    pub fn new(
        gateway: Arc<dyn AuthGateway>,
        store: Arc<TenantStore>,
        catalog: Arc<TenantCatalog>,
        policy: FlowPolicy,
    ) -> Self {
        Self {
            step: RegistrationStep::EnterCode,
            invite_code: String::new(),
            invite: None,
            draft: None,
            field_errors: FieldErrors::new(),
            global_error: None,
            gateway,
            store,
            catalog,
            policy,
        }
    }

    pub fn step(&self) -> RegistrationStep {
        self.step
    }

    pub fn invite_code(&self) -> &str {
        &self.invite_code
    }

    pub fn invite(&self) -> Option<&InviteValidationResult> {
        self.invite.as_ref()
    }

    pub fn draft(&self) -> Option<&RegistrationDraft> {
        self.draft.as_ref()
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn global_error(&self) -> Option<&str> {
        self.global_error.as_deref()
    }

    pub fn has_errors(&self) -> bool {
        self.global_error.is_some() || !self.field_errors.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.step == RegistrationStep::Validating
    }

    /// First load of the page: a `code` query parameter is submitted as if
    /// typed in, but only while the wizard waits for a code.
    pub async fn load(&mut self, query_code: Option<&str>) -> Navigation {
        match query_code.map(str::trim) {
            Some(code) if !code.is_empty() && self.step == RegistrationStep::EnterCode => {
                tracing::info!("Invite code detected in query");
                self.submit_code(code).await.unwrap_or(Navigation::Stay)
            }
            _ => Navigation::Stay,
        }
    }

    /// `enter-code -> validating`. Returns `Ok(false)` when the code was
    /// rejected locally and the flow stays in `enter-code`.
    pub fn begin_validation(&mut self, code: &str) -> Result<bool, FlowError> {
        self.expect_step(RegistrationStep::EnterCode, "submit an invite code")?;

        self.clear_errors();
        self.invite_code = code.to_string();

        if self.policy.enforce_code_length {
            if let Err(errors) = validate_form(&InviteCodeForm {
                code: code.to_string(),
            }) {
                self.field_errors = errors;
                return Ok(false);
            }
        }

        self.step = RegistrationStep::Validating;
        Ok(true)
    }

    /// Leave `validating` with the gateway's answer.
    pub fn finish_validation(
        &mut self,
        result: Result<InviteValidationResult, GatewayError>,
    ) -> Result<Navigation, FlowError> {
        self.expect_step(RegistrationStep::Validating, "finish validation")?;

        let invite = match result {
            Ok(invite) if invite.valid => invite,
            Ok(_) => return Ok(self.fail_validation(GatewayError::InvalidInvite)),
            Err(e) => return Ok(self.fail_validation(e)),
        };

        if invite.existing_user {
            metrics::record_invite_validation("existing_user");
            tracing::info!(tenant_id = %invite.tenant_id, "Invite belongs to an existing user, redirecting to login");
            self.reset();
            return Ok(Navigation::Login);
        }

        metrics::record_invite_validation("accepted");
        match self.catalog.get(&invite.tenant_id) {
            Some(tenant) => {
                self.store.set_tenant(tenant);
            }
            None => {
                tracing::warn!(tenant_id = %invite.tenant_id, "Invite names an unknown tenant, keeping current branding");
            }
        }

        tracing::info!(tenant_id = %invite.tenant_id, role = %invite.role, "Invite accepted");
        self.invite = Some(invite);
        self.step = RegistrationStep::Register;
        Ok(Navigation::Stay)
    }

    /// Submit an invite code and wait for the gateway.
    pub async fn submit_code(&mut self, code: &str) -> Result<Navigation, FlowError> {
        if !self.begin_validation(code)? {
            return Ok(Navigation::Stay);
        }

        let result = self.gateway.validate_invite(code).await;
        self.finish_validation(result)
    }

    /// `register -> success`, when the draft passes local rules and the
    /// gateway accepts it. Otherwise stays in `register` with errors.
    pub async fn submit_registration(
        &mut self,
        draft: RegistrationDraft,
    ) -> Result<Navigation, FlowError> {
        self.expect_step(RegistrationStep::Register, "submit registration")?;
        self.clear_errors();

        if let Err(errors) = validate_form(&draft) {
            tracing::info!(fields = ?errors.fields().collect::<Vec<_>>(), "Registration draft rejected");
            self.field_errors = errors;
            self.draft = Some(draft);
            return Ok(Navigation::Stay);
        }

        let payload = RegisterPayload::new(self.invite_code.clone(), draft.clone());
        match self.gateway.register(&payload).await {
            Ok(outcome) if outcome.success => {
                tracing::info!("Registration completed");
                self.draft = None;
                self.step = RegistrationStep::Success;
            }
            Ok(_) => {
                tracing::warn!("Registration not accepted");
                self.global_error = Some("Registration failed. Please try again.".to_string());
                self.draft = Some(draft);
            }
            Err(e) => {
                tracing::warn!(error = %e, kind = e.kind(), "Registration failed");
                self.global_error = Some(e.to_string());
                self.draft = Some(draft);
            }
        }

        Ok(Navigation::Stay)
    }

    /// Explicit navigation to the login surface; the wizard starts over.
    pub fn leave(&mut self) -> Navigation {
        self.reset();
        Navigation::Login
    }

    fn fail_validation(&mut self, error: GatewayError) -> Navigation {
        metrics::record_invite_validation(error.kind());
        tracing::warn!(error = %error, kind = error.kind(), "Invite validation failed");
        self.global_error = Some(error.to_string());
        self.invite = None;
        self.step = RegistrationStep::EnterCode;
        Navigation::Stay
    }

    fn reset(&mut self) {
        self.step = RegistrationStep::EnterCode;
        self.invite_code.clear();
        self.invite = None;
        self.draft = None;
        self.clear_errors();
    }

    fn clear_errors(&mut self) {
        self.field_errors.clear();
        self.global_error = None;
    }

    fn expect_step(&self, step: RegistrationStep, action: &'static str) -> Result<(), FlowError> {
        if self.step == step {
            Ok(())
        } else {
            tracing::warn!(step = %self.step, action, "Rejected out-of-step action");
            Err(FlowError {
                step: self.step,
                action,
            })
        }
    }
}

impl std::fmt::Debug for RegistrationFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationFlow")
            .field("step", &self.step)
            .field("invite_code", &self.invite_code)
            .field("invite", &self.invite)
            .field("field_errors", &self.field_errors)
            .field("global_error", &self.global_error)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RegisterOutcome, SignInOutcome, DHUUD_TENANT_ID, GOLF_SAUDI_TENANT_ID};
    use crate::dtos::LoginForm;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Gateway returning fixed answers and counting register calls.
    struct ScriptedGateway {
        invite: Result<InviteValidationResult, GatewayError>,
        register: Result<RegisterOutcome, GatewayError>,
        register_calls: AtomicUsize,
    }

    impl ScriptedGateway {
        fn new(
            invite: Result<InviteValidationResult, GatewayError>,
            register: Result<RegisterOutcome, GatewayError>,
        ) -> Arc<Self> {
            Arc::new(Self {
                invite,
                register,
                register_calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl AuthGateway for ScriptedGateway {
        async fn validate_invite(&self, _code: &str) -> Result<InviteValidationResult, GatewayError> {
            self.invite.clone()
        }

        async fn register(&self, _payload: &RegisterPayload) -> Result<RegisterOutcome, GatewayError> {
            self.register_calls.fetch_add(1, Ordering::SeqCst);
            self.register.clone()
        }

        async fn sign_in(&self, form: &LoginForm) -> Result<SignInOutcome, GatewayError> {
            Ok(SignInOutcome {
                email: form.email.clone(),
            })
        }
    }

    fn invite_for(tenant_id: &str) -> InviteValidationResult {
        InviteValidationResult {
            valid: true,
            email: "new.user@example.com".to_string(),
            tenant_name: "Some Tenant".to_string(),
            tenant_id: tenant_id.to_string(),
            role: "Member".to_string(),
            existing_user: false,
        }
    }

    fn valid_draft() -> RegistrationDraft {
        RegistrationDraft {
            first_name: "Sara".to_string(),
            last_name: "Ali".to_string(),
            password: "Abc12345".to_string(),
            confirm_password: "Abc12345".to_string(),
        }
    }

    fn flow_with(gateway: Arc<ScriptedGateway>) -> (RegistrationFlow, Arc<TenantStore>) {
        let store = Arc::new(TenantStore::with_default_tenant());
        let flow = RegistrationFlow::new(
            gateway,
            Arc::clone(&store),
            Arc::new(TenantCatalog::builtin()),
            FlowPolicy::default(),
        );
        (flow, store)
    }

    fn accepted() -> Result<RegisterOutcome, GatewayError> {
        Ok(RegisterOutcome { success: true })
    }

    #[tokio::test]
    async fn invite_flagged_invalid_returns_to_code_entry() {
        let mut invite = invite_for(GOLF_SAUDI_TENANT_ID);
        invite.valid = false;
        let (mut flow, store) = flow_with(ScriptedGateway::new(Ok(invite), accepted()));

        let navigation = flow.submit_code("INVITE-ANY").await.unwrap();

        assert_eq!(navigation, Navigation::Stay);
        assert_eq!(flow.step(), RegistrationStep::EnterCode);
        assert_eq!(
            flow.global_error(),
            Some("Invalid invitation code. Please check your link.")
        );
        assert!(flow.invite().is_none());
        assert_eq!(store.get().id, DHUUD_TENANT_ID);
    }

    #[tokio::test]
    async fn known_tenant_is_swapped_into_store() {
        let (mut flow, store) = flow_with(ScriptedGateway::new(
            Ok(invite_for(GOLF_SAUDI_TENANT_ID)),
            accepted(),
        ));

        flow.submit_code("INVITE-ANY").await.unwrap();

        assert_eq!(flow.step(), RegistrationStep::Register);
        assert_eq!(store.get().id, GOLF_SAUDI_TENANT_ID);
    }

    #[tokio::test]
    async fn unknown_tenant_advances_with_current_branding() {
        let (mut flow, store) =
            flow_with(ScriptedGateway::new(Ok(invite_for("acme")), accepted()));

        let navigation = flow.submit_code("INVITE-ANY").await.unwrap();

        assert_eq!(navigation, Navigation::Stay);
        assert_eq!(flow.step(), RegistrationStep::Register);
        assert_eq!(flow.invite().map(|i| i.tenant_id.as_str()), Some("acme"));
        assert_eq!(store.get().id, DHUUD_TENANT_ID);
    }

    #[tokio::test]
    async fn existing_user_resets_and_navigates_to_login() {
        let mut invite = invite_for(DHUUD_TENANT_ID);
        invite.existing_user = true;
        let (mut flow, _store) = flow_with(ScriptedGateway::new(Ok(invite), accepted()));

        let navigation = flow.submit_code("INVITE-ANY").await.unwrap();

        assert_eq!(navigation, Navigation::Login);
        assert_eq!(flow.step(), RegistrationStep::EnterCode);
        assert_eq!(flow.invite_code(), "");
        assert!(!flow.has_errors());
    }

    #[tokio::test]
    async fn rejected_registration_keeps_draft_and_shows_banner() {
        let gateway = ScriptedGateway::new(
            Ok(invite_for(GOLF_SAUDI_TENANT_ID)),
            Err(GatewayError::Rejected("Seat limit reached".to_string())),
        );
        let (mut flow, store) = flow_with(Arc::clone(&gateway));
        flow.submit_code("INVITE-ANY").await.unwrap();

        let navigation = flow.submit_registration(valid_draft()).await.unwrap();

        assert_eq!(navigation, Navigation::Stay);
        assert_eq!(flow.step(), RegistrationStep::Register);
        assert_eq!(flow.global_error(), Some("Seat limit reached"));
        assert_eq!(flow.draft().map(|d| d.first_name.as_str()), Some("Sara"));
        assert_eq!(gateway.register_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.get().id, GOLF_SAUDI_TENANT_ID);
    }

    #[tokio::test]
    async fn unsuccessful_outcome_stays_in_register() {
        let (mut flow, _store) = flow_with(ScriptedGateway::new(
            Ok(invite_for(GOLF_SAUDI_TENANT_ID)),
            Ok(RegisterOutcome { success: false }),
        ));
        flow.submit_code("INVITE-ANY").await.unwrap();

        flow.submit_registration(valid_draft()).await.unwrap();

        assert_eq!(flow.step(), RegistrationStep::Register);
        assert_eq!(
            flow.global_error(),
            Some("Registration failed. Please try again.")
        );
        assert!(flow.draft().is_some());
    }

    #[tokio::test]
    async fn unreachable_backend_stays_in_register() {
        let (mut flow, _store) = flow_with(ScriptedGateway::new(
            Ok(invite_for(GOLF_SAUDI_TENANT_ID)),
            Err(GatewayError::Transport("connection refused".to_string())),
        ));
        flow.submit_code("INVITE-ANY").await.unwrap();

        flow.submit_registration(valid_draft()).await.unwrap();

        assert_eq!(flow.step(), RegistrationStep::Register);
        assert_eq!(
            flow.global_error(),
            Some("Unable to reach the authentication service. Please try again.")
        );
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_gateway() {
        let gateway = ScriptedGateway::new(Ok(invite_for(GOLF_SAUDI_TENANT_ID)), accepted());
        let (mut flow, _store) = flow_with(Arc::clone(&gateway));
        flow.submit_code("INVITE-ANY").await.unwrap();

        let draft = RegistrationDraft {
            password: "abc12345".to_string(),
            confirm_password: "abc12345".to_string(),
            ..valid_draft()
        };
        flow.submit_registration(draft).await.unwrap();

        assert_eq!(gateway.register_calls.load(Ordering::SeqCst), 0);
        assert_eq!(flow.field_errors().get("password"), Some("Must contain uppercase"));
        assert_eq!(flow.step(), RegistrationStep::Register);
    }

    #[tokio::test]
    async fn successful_registration_clears_draft() {
        let (mut flow, _store) = flow_with(ScriptedGateway::new(
            Ok(invite_for(GOLF_SAUDI_TENANT_ID)),
            accepted(),
        ));
        flow.submit_code("INVITE-ANY").await.unwrap();

        flow.submit_registration(valid_draft()).await.unwrap();

        assert_eq!(flow.step(), RegistrationStep::Success);
        assert!(flow.draft().is_none());
        assert!(!flow.has_errors());
    }

    #[test]
    fn transitions_reject_wrong_step() {
        let (mut flow, _store) = flow_with(ScriptedGateway::new(
            Ok(invite_for(GOLF_SAUDI_TENANT_ID)),
            accepted(),
        ));

        let err = flow
            .finish_validation(Ok(invite_for(GOLF_SAUDI_TENANT_ID)))
            .unwrap_err();
        assert_eq!(err.step, RegistrationStep::EnterCode);

        assert!(flow.begin_validation("INVITE-ANY").unwrap());
        assert!(flow.is_loading());
        let err = flow.begin_validation("INVITE-OTHER").unwrap_err();
        assert_eq!(err.step, RegistrationStep::Validating);
        assert_eq!(flow.invite_code(), "INVITE-ANY");
    }
}
