//! The apartments list with its create/edit form.
//!
//! # Design
//! `ApartmentsState` holds everything the screen shows and changes only
//! through its transition methods, none of which do I/O. `ApartmentsScreen`
//! sequences those transitions around calls to `Api` and reports failures
//! through a `Notifier`.
//!
//! The local collection is never patched: every successful mutation is
//! followed by a full reload from the service.

use thiserror::Error;
use tracing::{info, warn};

use crate::api::Api;
use crate::notify::{messages, Notifier};
use crate::transport::Transport;
use crate::types::{Apartment, ApartmentInput};

/// Text fields of the create/edit form, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApartmentForm {
    pub num_app: String,
    pub design: String,
    pub loyer: String,
}

impl ApartmentForm {
    /// Pre-populate from an existing record.
    pub fn from_apartment(apartment: &Apartment) -> Self {
        Self {
            num_app: apartment.num_app.clone(),
            design: apartment.design.clone(),
            loyer: apartment.loyer.to_string(),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Check the fields and parse the rent.
    pub fn validate(&self) -> Result<ApartmentInput, FormError> {
        let missing = [
            ("numApp", &self.num_app),
            ("design", &self.design),
            ("loyer", &self.loyer),
        ]
        .into_iter()
        .find(|(_, value)| value.is_empty());
        if let Some((field, _)) = missing {
            return Err(FormError::MissingField(field));
        }

        let loyer = self
            .loyer
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| FormError::InvalidRent(self.loyer.clone()))?;

        Ok(ApartmentInput {
            num_app: self.num_app.clone(),
            design: self.design.clone(),
            loyer,
        })
    }
}

/// Why a submission was refused before reaching the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("required field `{0}` is empty")]
    MissingField(&'static str),

    #[error("rent `{0}` is not a finite number")]
    InvalidRent(String),

    #[error("a submission is already in flight")]
    Busy,
}

impl FormError {
    /// Alert text, or `None` when the refusal is silent.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            FormError::MissingField(_) => Some(messages::MISSING_FIELDS),
            FormError::InvalidRent(_) => Some(messages::INVALID_RENT),
            FormError::Busy => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Viewing,
    Editing { id: i64, record: Apartment },
}

/// What a validated submission asks the service to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Create(ApartmentInput),
    Update(i64, ApartmentInput),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApartmentsState {
    apartments: Vec<Apartment>,
    pub form: ApartmentForm,
    mode: Mode,
    in_flight: bool,
    revision: u64,
}

impl Default for ApartmentsState {
    fn default() -> Self {
        Self {
            apartments: Vec::new(),
            form: ApartmentForm::default(),
            mode: Mode::Viewing,
            in_flight: false,
            revision: 0,
        }
    }
}

impl ApartmentsState {
    pub fn apartments(&self) -> &[Apartment] {
        &self.apartments
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    /// Number of successful reloads so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn find(&self, id: i64) -> Option<&Apartment> {
        self.apartments.iter().find(|apartment| apartment.id == Some(id))
    }

    /// Swap in the authoritative list.
    pub fn replace_collection(&mut self, apartments: Vec<Apartment>) {
        self.apartments = apartments;
        self.revision += 1;
    }

    /// Select a record for editing and copy it into the form.
    /// Returns `false` when no record with `id` is loaded.
    pub fn start_edit(&mut self, id: i64) -> bool {
        let Some(record) = self.find(id).cloned() else {
            return false;
        };
        self.form = ApartmentForm::from_apartment(&record);
        self.mode = Mode::Editing { id, record };
        true
    }

    pub fn cancel_edit(&mut self) {
        self.form.clear();
        self.mode = Mode::Viewing;
    }

    /// Validate the form and mark a submission in flight.
    pub fn begin_submit(&mut self) -> Result<Submission, FormError> {
        if self.in_flight {
            return Err(FormError::Busy);
        }
        let input = self.form.validate()?;
        self.in_flight = true;
        Ok(match &self.mode {
            Mode::Viewing => Submission::Create(input),
            Mode::Editing { id, .. } => Submission::Update(*id, input),
        })
    }

    /// The service accepted the submission.
    pub fn complete_submit(&mut self) {
        self.in_flight = false;
        self.cancel_edit();
    }

    /// The service call failed; the form keeps what the user typed.
    pub fn abort_submit(&mut self) {
        self.in_flight = false;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Saved(Apartment),
    Rejected(FormError),
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
    NotFound,
    Failed,
}

/// The list/edit screen: state plus the calls that drive it.
pub struct ApartmentsScreen<T, N> {
    api: Api<T>,
    notifier: N,
    state: ApartmentsState,
}

impl<T: Transport, N: Notifier> ApartmentsScreen<T, N> {
    pub fn new(api: Api<T>, notifier: N) -> Self {
        Self {
            api,
            notifier,
            state: ApartmentsState::default(),
        }
    }

    pub fn state(&self) -> &ApartmentsState {
        &self.state
    }

    pub fn form_mut(&mut self) -> &mut ApartmentForm {
        &mut self.state.form
    }

    pub fn mount(&mut self) -> bool {
        self.reload()
    }

    /// Fetch the full list. On failure the current collection stays.
    pub fn reload(&mut self) -> bool {
        match self.api.list() {
            Ok(apartments) => {
                self.state.replace_collection(apartments);
                true
            }
            Err(_) => {
                self.notifier.alert(messages::ERROR_TITLE, messages::LOAD_FAILED);
                false
            }
        }
    }

    pub fn submit(&mut self) -> SubmitOutcome {
        let submission = match self.state.begin_submit() {
            Ok(submission) => submission,
            Err(err) => {
                warn!(error = %err, "submission rejected");
                if let Some(message) = err.user_message() {
                    self.notifier.alert(messages::ERROR_TITLE, message);
                }
                return SubmitOutcome::Rejected(err);
            }
        };

        let saved = match &submission {
            Submission::Create(input) => self.api.create(input),
            Submission::Update(id, input) => self.api.update(*id, input),
        };
        match saved {
            Ok(apartment) => {
                info!(id = ?apartment.id, "apartment saved");
                self.state.complete_submit();
                self.reload();
                SubmitOutcome::Saved(apartment)
            }
            Err(_) => {
                self.state.abort_submit();
                self.notifier.alert(messages::ERROR_TITLE, messages::SAVE_FAILED);
                SubmitOutcome::Failed
            }
        }
    }

    pub fn edit(&mut self, id: i64) -> bool {
        if self.state.start_edit(id) {
            return true;
        }
        warn!(id, "edit requested for an apartment that is not loaded");
        self.notifier.alert(messages::ERROR_TITLE, messages::UNKNOWN_APARTMENT);
        false
    }

    pub fn cancel_edit(&mut self) {
        self.state.cancel_edit();
    }

    /// Ask for confirmation, then delete and reload.
    pub fn delete(&mut self, id: i64) -> DeleteOutcome {
        let Some(design) = self.state.find(id).map(|apartment| apartment.design.clone()) else {
            warn!(id, "delete requested for an apartment that is not loaded");
            self.notifier.alert(messages::ERROR_TITLE, messages::UNKNOWN_APARTMENT);
            return DeleteOutcome::NotFound;
        };

        let prompt = messages::confirm_delete(&design);
        if !self.notifier.confirm(messages::CONFIRM_DELETE_TITLE, &prompt) {
            return DeleteOutcome::Cancelled;
        }

        match self.api.delete(id) {
            Ok(()) => {
                info!(id, "apartment deleted");
                self.reload();
                DeleteOutcome::Deleted
            }
            Err(_) => {
                self.notifier.alert(messages::ERROR_TITLE, messages::DELETE_FAILED);
                DeleteOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApartmentClient;
    use crate::testing::{RecordingNotifier, ScriptedTransport};

    const TWO: &str = r#"[
        {"id":1,"numApp":"101","design":"Studio","loyer":800},
        {"id":2,"numApp":"202","design":"Duplex","loyer":4200}
    ]"#;

    fn screen(
        transport: &ScriptedTransport,
        notifier: &RecordingNotifier,
    ) -> ApartmentsScreen<ScriptedTransport, RecordingNotifier> {
        let api = Api::new(ApartmentClient::new("http://svc"), transport.clone());
        ApartmentsScreen::new(api, notifier.clone())
    }

    fn mounted(
        transport: &ScriptedTransport,
        notifier: &RecordingNotifier,
    ) -> ApartmentsScreen<ScriptedTransport, RecordingNotifier> {
        transport.respond(200, TWO);
        let mut screen = screen(transport, notifier);
        assert!(screen.mount());
        screen
    }

    fn fill(form: &mut ApartmentForm, num_app: &str, design: &str, loyer: &str) {
        form.num_app = num_app.to_string();
        form.design = design.to_string();
        form.loyer = loyer.to_string();
    }

    // --- pure state ---

    #[test]
    fn form_from_apartment_formats_rent() {
        let form = ApartmentForm::from_apartment(&Apartment {
            id: Some(1),
            num_app: "101".to_string(),
            design: "Studio".to_string(),
            loyer: 800.0,
            obs: None,
        });
        assert_eq!(form.loyer, "800");

        let form = ApartmentForm::from_apartment(&Apartment {
            id: Some(1),
            num_app: "101".to_string(),
            design: "Studio".to_string(),
            loyer: 812.5,
            obs: None,
        });
        assert_eq!(form.loyer, "812.5");
    }

    #[test]
    fn validate_reports_first_empty_field() {
        let mut form = ApartmentForm::default();
        assert_eq!(form.validate(), Err(FormError::MissingField("numApp")));
        fill(&mut form, "1", "", "10");
        assert_eq!(form.validate(), Err(FormError::MissingField("design")));
        fill(&mut form, "1", "x", "");
        assert_eq!(form.validate(), Err(FormError::MissingField("loyer")));
    }

    #[test]
    fn validate_rejects_non_numeric_rent() {
        let mut form = ApartmentForm::default();
        for loyer in ["abc", "12abc", "NaN", "inf", " "] {
            fill(&mut form, "1", "x", loyer);
            assert_eq!(
                form.validate(),
                Err(FormError::InvalidRent(loyer.to_string())),
                "{loyer:?}"
            );
        }
    }

    #[test]
    fn validate_parses_rent() {
        let mut form = ApartmentForm::default();
        fill(&mut form, "101", "Studio", " 800.5 ");
        let input = form.validate().unwrap();
        assert_eq!(input.loyer, 800.5);
        assert_eq!(input.num_app, "101");
    }

    #[test]
    fn begin_submit_guards_in_flight() {
        let mut state = ApartmentsState::default();
        fill(&mut state.form, "101", "Studio", "800");
        assert!(matches!(state.begin_submit(), Ok(Submission::Create(_))));
        assert!(state.is_submitting());
        assert_eq!(state.begin_submit(), Err(FormError::Busy));

        state.abort_submit();
        assert!(!state.is_submitting());
        assert_eq!(state.form.num_app, "101");
        assert!(state.begin_submit().is_ok());
    }

    #[test]
    fn editing_submits_update_and_completion_returns_to_viewing() {
        let mut state = ApartmentsState::default();
        state.replace_collection(serde_json::from_str(TWO).unwrap());
        assert_eq!(state.revision(), 1);

        assert!(state.start_edit(2));
        assert_eq!(state.form.design, "Duplex");
        assert_eq!(state.form.loyer, "4200");
        assert!(matches!(state.mode(), Mode::Editing { id: 2, .. }));

        state.form.loyer = "4300".to_string();
        match state.begin_submit().unwrap() {
            Submission::Update(id, input) => {
                assert_eq!(id, 2);
                assert_eq!(input.loyer, 4300.0);
            }
            other => panic!("unexpected submission {other:?}"),
        }

        state.complete_submit();
        assert_eq!(state.mode(), &Mode::Viewing);
        assert_eq!(state.form, ApartmentForm::default());
        assert!(!state.is_submitting());
    }

    #[test]
    fn start_edit_unknown_id_changes_nothing() {
        let mut state = ApartmentsState::default();
        state.form.num_app = "typed".to_string();
        assert!(!state.start_edit(9));
        assert_eq!(state.mode(), &Mode::Viewing);
        assert_eq!(state.form.num_app, "typed");
    }

    // --- screen ---

    #[test]
    fn mount_loads_collection() {
        let transport = ScriptedTransport::new();
        let notifier = RecordingNotifier::default();
        let screen = mounted(&transport, &notifier);
        assert_eq!(screen.state().apartments().len(), 2);
        assert_eq!(transport.calls(), vec!["GET /apartments"]);
        assert!(notifier.alerts().is_empty());
    }

    #[test]
    fn failed_reload_keeps_collection_and_alerts_once() {
        let transport = ScriptedTransport::new();
        let notifier = RecordingNotifier::default();
        let mut screen = mounted(&transport, &notifier);
        let before = screen.state().apartments().to_vec();

        transport.respond(500, r#"{"message":"db down"}"#);
        assert!(!screen.reload());

        assert_eq!(screen.state().apartments(), before.as_slice());
        assert_eq!(screen.state().revision(), 1);
        assert_eq!(
            notifier.alerts(),
            vec![(messages::ERROR_TITLE.to_string(), messages::LOAD_FAILED.to_string())]
        );
    }

    #[test]
    fn failed_mount_leaves_empty_collection() {
        let transport = ScriptedTransport::new();
        transport.fail("connection refused");
        let notifier = RecordingNotifier::default();
        let mut screen = screen(&transport, &notifier);
        assert!(!screen.mount());
        assert!(screen.state().apartments().is_empty());
        assert_eq!(notifier.alerts().len(), 1);
    }

    #[test]
    fn create_then_exactly_one_reload_then_clear() {
        let transport = ScriptedTransport::new();
        let notifier = RecordingNotifier::default();
        let mut screen = mounted(&transport, &notifier);

        fill(screen.form_mut(), "303", "T2", "1500");
        transport.respond(201, r#"{"id":3,"numApp":"303","design":"T2","loyer":1500}"#);
        transport.respond(200, r#"[{"id":3,"numApp":"303","design":"T2","loyer":1500}]"#);

        let outcome = screen.submit();
        assert!(matches!(outcome, SubmitOutcome::Saved(ref a) if a.id == Some(3)));
        assert_eq!(
            transport.calls(),
            vec!["GET /apartments", "POST /apartments", "GET /apartments"]
        );
        assert_eq!(screen.state().form, ApartmentForm::default());
        assert_eq!(screen.state().apartments().len(), 1);
        assert!(notifier.alerts().is_empty());
    }

    #[test]
    fn update_uses_selected_id_and_returns_to_viewing() {
        let transport = ScriptedTransport::new();
        let notifier = RecordingNotifier::default();
        let mut screen = mounted(&transport, &notifier);

        assert!(screen.edit(1));
        screen.form_mut().design = "Grand studio".to_string();
        transport.respond(200, r#"{"id":1,"numApp":"101","design":"Grand studio","loyer":800}"#);
        transport.respond(200, TWO);

        assert!(matches!(screen.submit(), SubmitOutcome::Saved(_)));
        assert_eq!(
            transport.calls(),
            vec!["GET /apartments", "PUT /apartments/1", "GET /apartments"]
        );
        let body: serde_json::Value =
            serde_json::from_str(transport.requests()[1].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["design"], "Grand studio");
        assert_eq!(screen.state().mode(), &Mode::Viewing);
    }

    #[test]
    fn cancel_edit_returns_to_viewing() {
        let transport = ScriptedTransport::new();
        let notifier = RecordingNotifier::default();
        let mut screen = mounted(&transport, &notifier);

        assert!(screen.edit(2));
        assert_eq!(screen.state().form.design, "Duplex");
        screen.cancel_edit();

        assert_eq!(screen.state().mode(), &Mode::Viewing);
        assert_eq!(screen.state().form, ApartmentForm::default());
        assert_eq!(transport.calls(), vec!["GET /apartments"]);
        assert!(notifier.alerts().is_empty());

        // The next submission creates rather than updates.
        fill(screen.form_mut(), "303", "Loft", "1200");
        transport.respond(201, r#"{"id":3,"numApp":"303","design":"Loft","loyer":1200}"#);
        transport.respond(200, TWO);
        assert!(matches!(screen.submit(), SubmitOutcome::Saved(_)));
        assert_eq!(transport.calls()[1], "POST /apartments");
    }

    #[test]
    fn failed_update_keeps_editing() {
        let transport = ScriptedTransport::new();
        let notifier = RecordingNotifier::default();
        let mut screen = mounted(&transport, &notifier);

        assert!(screen.edit(1));
        screen.form_mut().loyer = "950".to_string();
        transport.respond(500, r#"{"message":"database unavailable"}"#);

        assert_eq!(screen.submit(), SubmitOutcome::Failed);
        assert_eq!(transport.calls(), vec!["GET /apartments", "PUT /apartments/1"]);
        assert!(matches!(screen.state().mode(), Mode::Editing { id: 1, .. }));
        assert_eq!(screen.state().form.loyer, "950");
        assert_eq!(screen.state().form.design, "Studio");
        assert!(!screen.state().is_submitting());
        assert_eq!(
            notifier.alerts(),
            vec![(messages::ERROR_TITLE.to_string(), messages::SAVE_FAILED.to_string())]
        );
    }

    #[test]
    fn empty_field_is_rejected_without_network() {
        let transport = ScriptedTransport::new();
        let notifier = RecordingNotifier::default();
        let mut screen = mounted(&transport, &notifier);

        fill(screen.form_mut(), "101", "", "800");
        let outcome = screen.submit();
        assert_eq!(outcome, SubmitOutcome::Rejected(FormError::MissingField("design")));
        assert_eq!(transport.calls().len(), 1);
        assert_eq!(
            notifier.alerts(),
            vec![(messages::ERROR_TITLE.to_string(), messages::MISSING_FIELDS.to_string())]
        );
    }

    #[test]
    fn invalid_rent_is_rejected_without_network() {
        let transport = ScriptedTransport::new();
        let notifier = RecordingNotifier::default();
        let mut screen = mounted(&transport, &notifier);

        fill(screen.form_mut(), "101", "Studio", "huit cents");
        assert!(matches!(screen.submit(), SubmitOutcome::Rejected(FormError::InvalidRent(_))));
        assert_eq!(transport.calls().len(), 1);
        assert_eq!(notifier.alerts()[0].1, messages::INVALID_RENT);
    }

    #[test]
    fn failed_save_keeps_form() {
        let transport = ScriptedTransport::new();
        let notifier = RecordingNotifier::default();
        let mut screen = mounted(&transport, &notifier);

        fill(screen.form_mut(), "101", "Studio", "800");
        transport.respond(400, r#"{"message":"duplicate numApp"}"#);

        assert_eq!(screen.submit(), SubmitOutcome::Failed);
        assert_eq!(screen.state().form.num_app, "101");
        assert!(!screen.state().is_submitting());
        assert_eq!(transport.calls().len(), 2);
        assert_eq!(notifier.alerts()[0].1, messages::SAVE_FAILED);
    }

    #[test]
    fn cancelled_delete_makes_no_call() {
        let transport = ScriptedTransport::new();
        let notifier = RecordingNotifier::confirming(false);
        let mut screen = mounted(&transport, &notifier);
        let before = screen.state().apartments().to_vec();

        assert_eq!(screen.delete(2), DeleteOutcome::Cancelled);
        assert_eq!(transport.calls(), vec!["GET /apartments"]);
        assert_eq!(screen.state().apartments(), before.as_slice());
        assert_eq!(
            notifier.confirmations(),
            vec![(
                messages::CONFIRM_DELETE_TITLE.to_string(),
                "Êtes-vous sûr de vouloir supprimer Duplex ?".to_string()
            )]
        );
    }

    #[test]
    fn confirmed_delete_reloads() {
        let transport = ScriptedTransport::new();
        let notifier = RecordingNotifier::confirming(true);
        let mut screen = mounted(&transport, &notifier);

        transport.respond(204, "");
        transport.respond(200, r#"[{"id":1,"numApp":"101","design":"Studio","loyer":800}]"#);

        assert_eq!(screen.delete(2), DeleteOutcome::Deleted);
        assert_eq!(
            transport.calls(),
            vec!["GET /apartments", "DELETE /apartments/2", "GET /apartments"]
        );
        assert!(screen.state().find(2).is_none());
    }

    #[test]
    fn failed_delete_alerts_and_keeps_collection() {
        let transport = ScriptedTransport::new();
        let notifier = RecordingNotifier::confirming(true);
        let mut screen = mounted(&transport, &notifier);

        transport.fail("connection reset");
        assert_eq!(screen.delete(1), DeleteOutcome::Failed);
        assert_eq!(screen.state().apartments().len(), 2);
        assert_eq!(notifier.alerts()[0].1, messages::DELETE_FAILED);
    }

    #[test]
    fn unknown_id_is_not_sent() {
        let transport = ScriptedTransport::new();
        let notifier = RecordingNotifier::confirming(true);
        let mut screen = mounted(&transport, &notifier);

        assert_eq!(screen.delete(99), DeleteOutcome::NotFound);
        assert!(!screen.edit(99));
        assert_eq!(transport.calls().len(), 1);
        assert!(notifier.confirmations().is_empty());
        assert_eq!(notifier.alerts().len(), 2);
    }
}
