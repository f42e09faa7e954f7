//! A subscription form driven end to end against an in-memory SCM.

use std::sync::Arc;

use scm_wizard_config::{
  FormConfig, FormMode, ParameterDef, RetryPolicy, SubscriptionModel, WizardSettings, ids,
};
use scm_wizard_http::InMemoryScmClient;
use scm_wizard_plugin::{FormError, SubscriptionForm};
use scm_wizard_registry::RegistryError;
use scm_wizard_validation::{Rule, SubmitError, ValidationState};

const NODE: &str = "service:scm:git:dev";

fn parameters() -> Vec<ParameterDef> {
  vec![
    ParameterDef::new(ids::OU).mandatory(),
    ParameterDef::new(ids::PROJECT).mandatory(),
    ParameterDef::new(ids::REPOSITORY).with_description("Name of the repository to create"),
    ParameterDef::new(ids::LDAP_GROUPS).mandatory(),
  ]
}

fn settings() -> WizardSettings {
  WizardSettings {
    retry: RetryPolicy::none(),
    ..WizardSettings::default()
  }
}

fn open(mode: FormMode, client: InMemoryScmClient) -> SubscriptionForm {
  SubscriptionForm::open(
    FormConfig::new(mode, "git", NODE),
    SubscriptionModel {
      id: 7,
      pkey: "eng".to_string(),
    },
    &parameters(),
    Arc::new(client),
    &settings(),
  )
}

#[tokio::test]
async fn test_available_repository_is_accepted() {
  let mut form = open(FormMode::Create, InMemoryScmClient::new());

  assert_eq!(form.form().value(ids::OU), Some("eng"));
  assert!(form.change(ids::PROJECT, "Portal").unwrap());
  assert_eq!(form.form().value(ids::REPOSITORY), Some("eng-portal"));

  assert_eq!(
    form.settled().await,
    ValidationState::Accepted {
      identifier: "eng-portal".to_string()
    }
  );

  form.change(ids::LDAP_GROUPS, "dev,ops").unwrap();
  let submitted = form.submit().unwrap();
  assert_eq!(submitted[ids::REPOSITORY], "eng-portal");
  assert_eq!(submitted[ids::PROJECT], "Portal");
  assert_eq!(submitted[ids::OU], "eng");
  form.close();
}

#[tokio::test]
async fn test_existing_repository_is_rejected() {
  let mut form = open(
    FormMode::Create,
    InMemoryScmClient::new().with_existing(["eng-portal"]),
  );
  form.change(ids::LDAP_GROUPS, "dev").unwrap();
  form.change(ids::PROJECT, "portal").unwrap();

  let state = form.settled().await;
  let violation = state.violation().unwrap();
  assert_eq!(violation.rule, Rule::AlreadyExist);
  assert!(violation.parameters.contains(&"eng-portal".to_string()));

  assert!(matches!(
    form.submit(),
    Err(FormError::Submit(SubmitError::Rejected { .. }))
  ));
}

#[tokio::test]
async fn test_submit_while_pending_is_refused() {
  let mut form = open(FormMode::Create, InMemoryScmClient::new());
  form.change(ids::LDAP_GROUPS, "dev").unwrap();
  form.change(ids::PROJECT, "portal").unwrap();

  // The check has not run yet on this single-threaded runtime.
  assert!(form.repository_state().is_pending());
  assert_eq!(
    form.submit().unwrap_err().to_string(),
    "submission refused: repository 'eng-portal' is still being checked"
  );

  assert!(form.settled().await.is_accepted());
  assert!(form.submit().is_ok());
}

#[tokio::test]
async fn test_missing_mandatory_parameters() {
  let form = open(FormMode::Create, InMemoryScmClient::new());

  match form.submit() {
    Err(FormError::Submit(SubmitError::Missing { parameters })) => {
      assert_eq!(parameters, vec![ids::PROJECT.to_string(), ids::LDAP_GROUPS.to_string()]);
    }
    other => panic!("unexpected submission result: {:?}", other),
  }
}

#[tokio::test]
async fn test_prefilled_fields_are_read_only() {
  let mut form = open(FormMode::Create, InMemoryScmClient::new());

  assert!(matches!(
    form.change(ids::OU, "other"),
    Err(FormError::Registry(RegistryError::ReadOnly { .. }))
  ));
  assert!(matches!(
    form.change(ids::REPOSITORY, "eng-custom"),
    Err(FormError::Registry(RegistryError::ReadOnly { .. }))
  ));
  assert!(matches!(
    form.change("service:scm:unknown", "x"),
    Err(FormError::Registry(RegistryError::UnknownParameter { .. }))
  ));
}

#[tokio::test]
async fn test_unavailable_check_can_be_retried() {
  let mut form = open(FormMode::Create, InMemoryScmClient::new().failing(1));
  form.change(ids::LDAP_GROUPS, "dev").unwrap();
  form.change(ids::PROJECT, "portal").unwrap();

  assert!(matches!(
    form.settled().await,
    ValidationState::Unavailable { .. }
  ));
  assert!(matches!(
    form.submit(),
    Err(FormError::Submit(SubmitError::Unavailable { .. }))
  ));

  let retried = form.retry().unwrap();
  assert_eq!(retried.identifier, "eng-portal");
  assert!(form.settled().await.is_accepted());
  assert!(form.submit().is_ok());
}

#[tokio::test]
async fn test_retry_is_only_offered_when_unavailable() {
  let mut form = open(FormMode::Create, InMemoryScmClient::new());
  assert!(form.retry().is_none());

  form.change(ids::PROJECT, "portal").unwrap();
  form.settled().await;
  assert!(form.retry().is_none());
}

#[tokio::test]
async fn test_linked_repository_only_needs_a_value() {
  let parameters = vec![
    ParameterDef::new(ids::REPOSITORY).mandatory(),
    ParameterDef::new(ids::LDAP_GROUPS),
  ];
  let mut form = SubscriptionForm::open(
    FormConfig::new(FormMode::Link, "git", NODE),
    SubscriptionModel {
      id: 7,
      pkey: "eng".to_string(),
    },
    &parameters,
    Arc::new(InMemoryScmClient::new()),
    &settings(),
  );

  assert!(matches!(
    form.submit(),
    Err(FormError::Submit(SubmitError::Missing { .. }))
  ));

  assert!(form.change(ids::REPOSITORY, "legacy-repo").unwrap());
  let submitted = form.submit().unwrap();
  assert_eq!(submitted[ids::REPOSITORY], "legacy-repo");
  assert_eq!(form.repository_state(), ValidationState::Idle);
}

#[tokio::test]
async fn test_dropping_form_cancels_outstanding_check() {
  let mut form = open(FormMode::Create, InMemoryScmClient::new());
  form.change(ids::PROJECT, "portal").unwrap();
  let session = form.session().clone();
  assert!(session.state(ids::REPOSITORY).is_pending());

  drop(form);
  assert!(session.is_closed());

  // Whatever the spawned check returns, closed sessions ignore it.
  tokio::task::yield_now().await;
  assert!(session.settled(ids::REPOSITORY).await.is_pending());
}

