//! Authorization manager.

use std::collections::BTreeMap;
use std::sync::Arc;

use bridge_config::{Application, Config};
use bridge_oauth::{
    HttpMethod, OAuth1Error, OAuth1Provider, OAuth1ProviderFactory, ProviderConfig, endpoint_url,
};
use bridge_store::{AuthorizationStore, SearchFilter, UserAuthorizationData};
use tracing::{debug, info, warn};

use crate::error::AuthorizationError;
use crate::keys::{KeyMaterialLoader, private_key_filename, public_key_filename};
use crate::state::OAuth1AuthorizationState;

/// Tracker endpoint returning the caller's own profile.
const MYSELF_PATH: &str = "/rest/api/2/myself";

/// Payload field searched when the callback arrives.
const TEMPORARY_TOKEN_FIELD: &str = "temporaryToken";

/// Identifies one configured integration instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationSettings {
    /// Tracker kind, e.g. `jira`. Selects the application.
    pub integration_type: String,
    /// Instance identifier, part of the callback URL and record identity.
    pub configuration_id: String,
}

impl IntegrationSettings {
    #[must_use]
    pub fn new(integration_type: impl Into<String>, configuration_id: impl Into<String>) -> Self {
        Self {
            integration_type: integration_type.into(),
            configuration_id: configuration_id.into(),
        }
    }
}

/// Authorization model with the application public key attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAuthorizationModel {
    pub application_id: String,
    pub consumer_key: String,
    pub properties: BTreeMap<String, String>,
    /// PEM-stripped public key, `None` when not provisioned or invalid.
    pub public_key: Option<String>,
}

/// Key provisioning status of an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyStatus {
    pub public_key_filename: String,
    pub private_key_filename: String,
    /// PEM-stripped public key, if provisioned.
    pub public_key: Option<String>,
    pub private_key_present: bool,
}

impl KeyStatus {
    /// Whether both halves of the key pair are provisioned.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.public_key.is_some() && self.private_key_present
    }
}

/// URL the tracker redirects the user to after consent.
///
/// `{bridge_url}/v1/application/{configuration_id}/authorization/authorize`,
/// with any trailing `/` on the bridge URL dropped.
#[must_use]
pub fn callback_url(bridge_url: &str, configuration_id: &str) -> String {
    format!(
        "{}/v1/application/{configuration_id}/authorization/authorize",
        bridge_url.trim_end_matches('/')
    )
}

/// Drives the three-legged OAuth 1.0 flow and answers authorization checks.
///
/// Holds no per-request state; a fresh provider is configured for every
/// operation, so one manager can serve concurrent requests.
pub struct AuthorizationManager {
    config: Arc<Config>,
    store: Arc<dyn AuthorizationStore>,
    providers: Arc<dyn OAuth1ProviderFactory>,
}

impl AuthorizationManager {
    #[must_use]
    pub fn new(
        config: Arc<Config>,
        store: Arc<dyn AuthorizationStore>,
        providers: Arc<dyn OAuth1ProviderFactory>,
    ) -> Self {
        Self {
            config,
            store,
            providers,
        }
    }

    /// Authorization model of the integration's application.
    ///
    /// A missing or invalid public key is logged and reported as `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if no application is configured for the integration
    /// type.
    pub fn authorization_model(
        &self,
        settings: &IntegrationSettings,
    ) -> Result<ResolvedAuthorizationModel, AuthorizationError> {
        let application = self.application(settings)?;
        let model = &application.authorization;

        let public_key = match self.loader().resolve_public_key(model, &application.id) {
            Ok(key) => key,
            Err(e) => {
                warn!("Application public key is invalid, please check the file: {e}");
                None
            }
        };

        Ok(ResolvedAuthorizationModel {
            application_id: application.id.clone(),
            consumer_key: model.consumer_key.clone(),
            properties: model.properties.clone(),
            public_key,
        })
    }

    /// Whether the user holds an access token the tracker still accepts.
    ///
    /// Returns `false` without network traffic when no access token is
    /// stored. Otherwise calls `/rest/api/2/myself` on the tracker and
    /// treats anything but `401` as authorized.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed, the private key is not
    /// available, the store fails or the check request cannot be sent.
    pub fn is_user_authorized(
        &self,
        settings: &IntegrationSettings,
        url: &str,
        user_id: i64,
    ) -> Result<bool, AuthorizationError> {
        let record = self.store.find(
            &settings.integration_type,
            &settings.configuration_id,
            url,
            user_id,
        )?;

        let Some(data) = record.and_then(|r| r.data) else {
            debug!("No authorization stored for user {user_id} at {url}");
            return Ok(false);
        };

        let state = OAuth1AuthorizationState::from_value(data)
            .map_err(AuthorizationError::InvalidStateData)?;
        let Some(access_token) = state.access_token() else {
            debug!("Authorization for user {user_id} at {url} is still pending");
            return Ok(false);
        };

        let myself_url = service_endpoint(url, MYSELF_PATH)?;
        let provider = self.configure_provider(settings, url)?;
        let response =
            provider.make_authorized_request(access_token, &myself_url, HttpMethod::Get, None)?;

        if response.is_unauthorized() {
            info!("Access token of user {user_id} at {url} was rejected");
            return Ok(false);
        }
        Ok(true)
    }

    /// Start the flow: obtain a temporary token and return the consent URL.
    ///
    /// Records a pending authorization for the user, replacing any previous
    /// record for the same tracker URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed, the private key is not
    /// available, the tracker rejects the request or the store fails.
    pub fn authorization_url(
        &self,
        settings: &IntegrationSettings,
        url: &str,
        user_id: i64,
    ) -> Result<String, AuthorizationError> {
        service_endpoint(url, "/")?;
        let provider = self.configure_provider(settings, url)?;

        let temporary_token = provider.request_temporary_token()?;
        let consent_url = provider.authorization_url(&temporary_token);

        let state = OAuth1AuthorizationState::pending(temporary_token);
        self.save_state(settings, url, user_id, &state)?;

        info!("Started authorization for user {user_id} at {url}");
        Ok(consent_url)
    }

    /// Complete the flow for the record holding `temporary_token`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError::TokenNotFound`] without writing anything
    /// if no record carries the temporary token. Also fails if the tracker
    /// rejects the exchange or the store fails.
    pub fn authorize_temporary_token(
        &self,
        settings: &IntegrationSettings,
        temporary_token: &str,
        verifier_code: &str,
    ) -> Result<(), AuthorizationError> {
        let filter = SearchFilter::from([(
            TEMPORARY_TOKEN_FIELD.to_owned(),
            temporary_token.to_owned(),
        )]);
        let matches = self.store.search(
            &settings.integration_type,
            &settings.configuration_id,
            &filter,
        )?;

        if matches.len() > 1 {
            warn!(
                "{} records share temporary token {temporary_token}, using the first",
                matches.len()
            );
        }
        let Some(record) = matches.into_iter().next() else {
            warn!("Cannot find the user authorization data for temporary token {temporary_token}");
            return Err(AuthorizationError::TokenNotFound {
                token: temporary_token.to_owned(),
            });
        };

        let provider = self.configure_provider(settings, &record.url)?;
        let access_token = provider.request_access_token(temporary_token, verifier_code)?;

        let state = OAuth1AuthorizationState::pending(temporary_token).authorized(access_token);
        self.save_state(settings, &record.url, record.user_id, &state)?;

        info!("Authorized user {} at {}", record.user_id, record.url);
        Ok(())
    }

    /// Check that the application key pair is provisioned and valid.
    ///
    /// # Errors
    ///
    /// Returns an error if no application is configured or a key file exists
    /// but does not hold a valid key.
    pub fn validate_keys(
        &self,
        settings: &IntegrationSettings,
    ) -> Result<KeyStatus, AuthorizationError> {
        let application = self.application(settings)?;
        let model = &application.authorization;
        let loader = self.loader();

        let public_key = loader.resolve_public_key(model, &application.id)?;
        let private_key = loader.resolve_private_key(model, &application.id)?;

        Ok(KeyStatus {
            public_key_filename: public_key_filename(model, &application.id),
            private_key_filename: private_key_filename(model, &application.id),
            public_key,
            private_key_present: private_key.is_some(),
        })
    }

    /// Callback URL for an integration instance.
    #[must_use]
    pub fn callback_url(&self, settings: &IntegrationSettings) -> String {
        callback_url(
            self.config.integration_bridge_url(),
            &settings.configuration_id,
        )
    }

    fn application(
        &self,
        settings: &IntegrationSettings,
    ) -> Result<&Application, AuthorizationError> {
        Ok(self.config.application(&settings.integration_type)?)
    }

    fn loader(&self) -> KeyMaterialLoader<'_> {
        KeyMaterialLoader::new(&self.config)
    }

    /// Bind a fresh provider to the application identity and tracker `url`.
    fn configure_provider(
        &self,
        settings: &IntegrationSettings,
        url: &str,
    ) -> Result<Box<dyn OAuth1Provider>, AuthorizationError> {
        let application = self.application(settings)?;
        let model = &application.authorization;

        let private_key = self
            .loader()
            .resolve_private_key(model, &application.id)
            .inspect_err(|e| warn!("Application private key is invalid: {e}"))?
            .ok_or_else(|| AuthorizationError::PrivateKeyUnavailable {
                filename: private_key_filename(model, &application.id),
            })?;

        Ok(self.providers.configure(ProviderConfig {
            consumer_key: model.consumer_key.clone(),
            private_key,
            base_url: url.to_owned(),
            callback_url: self.callback_url(settings),
        })?)
    }

    fn save_state(
        &self,
        settings: &IntegrationSettings,
        url: &str,
        user_id: i64,
        state: &OAuth1AuthorizationState,
    ) -> Result<(), AuthorizationError> {
        let data = state
            .to_value()
            .map_err(AuthorizationError::InvalidStateData)?;
        self.store.save(
            &settings.integration_type,
            &settings.configuration_id,
            &UserAuthorizationData::new(url, user_id, data),
        )?;
        Ok(())
    }
}

/// Resolve `path` against the tracker URL, mapping malformed URLs.
fn service_endpoint(url: &str, path: &str) -> Result<String, AuthorizationError> {
    endpoint_url(url, path).map_err(|e| match e {
        OAuth1Error::InvalidUrl(url) => AuthorizationError::InvalidServiceUrl { url },
        other => AuthorizationError::OAuth1(other),
    })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Mutex;

    use bridge_oauth::SignedResponse;
    use bridge_oauth::key::parse_private_key;
    use bridge_store::MemoryAuthorizationStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::AuthorizationErrorKind;

    const PUBLIC_PEM: &str = include_str!("../../../testdata/keys/app_pub.pem");
    const PRIVATE_PEM: &str = include_str!("../../../testdata/keys/app.pkcs8");

    const JIRA_URL: &str = "https://jira.example.com";
    const USER: i64 = 7;

    /// Scripted tracker shared by every provider the fake factory hands out.
    struct FakeTracker {
        temporary_token: String,
        access_token: String,
        myself_status: u16,
        reject_exchange: bool,
        configured: Mutex<Vec<ProviderConfig>>,
        myself_calls: Mutex<Vec<(String, String)>>,
    }

    impl FakeTracker {
        fn new(myself_status: u16) -> Self {
            Self {
                temporary_token: "tmp-1".to_owned(),
                access_token: "acc-1".to_owned(),
                myself_status,
                reject_exchange: false,
                configured: Mutex::new(Vec::new()),
                myself_calls: Mutex::new(Vec::new()),
            }
        }
    }

    struct FakeFactory(Arc<FakeTracker>);

    impl OAuth1ProviderFactory for FakeFactory {
        fn configure(
            &self,
            config: ProviderConfig,
        ) -> Result<Box<dyn OAuth1Provider>, OAuth1Error> {
            parse_private_key(&config.private_key)?;
            self.0.configured.lock().unwrap().push(config.clone());
            Ok(Box::new(FakeProvider {
                tracker: Arc::clone(&self.0),
                config,
            }))
        }
    }

    struct FakeProvider {
        tracker: Arc<FakeTracker>,
        config: ProviderConfig,
    }

    impl OAuth1Provider for FakeProvider {
        fn request_temporary_token(&self) -> Result<String, OAuth1Error> {
            Ok(self.tracker.temporary_token.clone())
        }

        fn authorization_url(&self, temporary_token: &str) -> String {
            format!(
                "{}/plugins/servlet/oauth/authorize?oauth_token={temporary_token}",
                self.config.base_url
            )
        }

        fn request_access_token(
            &self,
            temporary_token: &str,
            _verifier_code: &str,
        ) -> Result<String, OAuth1Error> {
            if self.tracker.reject_exchange || temporary_token != self.tracker.temporary_token {
                return Err(OAuth1Error::Rejected {
                    operation: "Access token exchange",
                    status: 401,
                    body: "oauth_problem=token_rejected".to_owned(),
                });
            }
            Ok(self.tracker.access_token.clone())
        }

        fn make_authorized_request(
            &self,
            access_token: &str,
            url: &str,
            _method: HttpMethod,
            _body: Option<&[u8]>,
        ) -> Result<SignedResponse, OAuth1Error> {
            self.tracker
                .myself_calls
                .lock()
                .unwrap()
                .push((access_token.to_owned(), url.to_owned()));
            Ok(SignedResponse {
                status: self.tracker.myself_status,
                body: String::new(),
            })
        }
    }

    struct Fixture {
        _dir: TempDir,
        manager: AuthorizationManager,
        store: Arc<MemoryAuthorizationStore>,
        tracker: Arc<FakeTracker>,
    }

    fn settings() -> IntegrationSettings {
        IntegrationSettings::new("jira", "42")
    }

    fn fixture_with(
        tracker: FakeTracker,
        public_pem: Option<&str>,
        private_pem: Option<&str>,
    ) -> Fixture {
        let dir = TempDir::new().unwrap();
        let certs = dir.path().join("certs");
        fs::create_dir_all(&certs).unwrap();
        if let Some(pem) = public_pem {
            fs::write(certs.join("jira_app_pub.pem"), pem).unwrap();
        }
        if let Some(pem) = private_pem {
            fs::write(certs.join("jira_app.pkcs8"), pem).unwrap();
        }

        let config = Config::from_toml_str(
            r#"
[bridge]
url = "https://bridge.example.com/"
certs_dir = "certs"

[applications.jira]
id = "jira"

[applications.jira.authorization]
consumer_key = "bridge-consumer"

[applications.jira.authorization.properties]
scope = "read"
"#,
            dir.path(),
        )
        .unwrap();

        let store = Arc::new(MemoryAuthorizationStore::new());
        let tracker = Arc::new(tracker);
        let manager = AuthorizationManager::new(
            Arc::new(config),
            Arc::clone(&store) as Arc<dyn AuthorizationStore>,
            Arc::new(FakeFactory(Arc::clone(&tracker))),
        );

        Fixture {
            _dir: dir,
            manager,
            store,
            tracker,
        }
    }

    fn fixture(myself_status: u16) -> Fixture {
        fixture_with(FakeTracker::new(myself_status), Some(PUBLIC_PEM), Some(PRIVATE_PEM))
    }

    fn store_state(fx: &Fixture, data: serde_json::Value) {
        fx.store
            .save("jira", "42", &UserAuthorizationData::new(JIRA_URL, USER, data))
            .unwrap();
    }

    #[test]
    fn test_callback_url() {
        assert_eq!(
            callback_url("https://bridge.example.com", "42"),
            "https://bridge.example.com/v1/application/42/authorization/authorize"
        );
        assert_eq!(
            callback_url("https://bridge.example.com/", "42"),
            "https://bridge.example.com/v1/application/42/authorization/authorize"
        );
    }

    #[test]
    fn test_authorization_model() {
        let fx = fixture(200);

        let model = fx.manager.authorization_model(&settings()).unwrap();

        assert_eq!(model.application_id, "jira");
        assert_eq!(model.consumer_key, "bridge-consumer");
        assert_eq!(model.properties.get("scope").map(String::as_str), Some("read"));
        let public_key = model.public_key.unwrap();
        assert!(!public_key.contains("-----"));
    }

    #[test]
    fn test_authorization_model_corrupted_public_key_degrades_to_absent() {
        let fx = fixture_with(
            FakeTracker::new(200),
            Some("-----BEGIN PUBLIC KEY-----\nbm90IGEga2V5\n-----END PUBLIC KEY-----\n"),
            Some(PRIVATE_PEM),
        );

        let model = fx.manager.authorization_model(&settings()).unwrap();
        assert_eq!(model.public_key, None);
    }

    #[test]
    fn test_authorization_model_unknown_application() {
        let fx = fixture(200);

        let err = fx
            .manager
            .authorization_model(&IntegrationSettings::new("github", "42"))
            .unwrap_err();

        assert_eq!(err.kind(), AuthorizationErrorKind::UnknownApplication);
    }

    #[test]
    fn test_is_user_authorized_without_record() {
        let fx = fixture(200);

        assert!(!fx.manager.is_user_authorized(&settings(), JIRA_URL, USER).unwrap());
        assert!(fx.tracker.myself_calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_is_user_authorized_pending_record() {
        let fx = fixture(200);
        store_state(&fx, json!({"temporaryToken": "tmp-1"}));

        assert!(!fx.manager.is_user_authorized(&settings(), JIRA_URL, USER).unwrap());
        assert!(fx.tracker.myself_calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_is_user_authorized_calls_myself() {
        let fx = fixture(200);
        store_state(&fx, json!({"temporaryToken": "tmp-1", "accessToken": "acc-1"}));

        assert!(fx.manager.is_user_authorized(&settings(), JIRA_URL, USER).unwrap());
        assert_eq!(
            *fx.tracker.myself_calls.lock().unwrap(),
            vec![(
                "acc-1".to_owned(),
                "https://jira.example.com/rest/api/2/myself".to_owned()
            )]
        );
    }

    #[test]
    fn test_is_user_authorized_rejected_token() {
        let fx = fixture(401);
        store_state(&fx, json!({"temporaryToken": "tmp-1", "accessToken": "acc-1"}));

        assert!(!fx.manager.is_user_authorized(&settings(), JIRA_URL, USER).unwrap());
    }

    #[test]
    fn test_is_user_authorized_non_401_errors_count_as_authorized() {
        for status in [403, 500] {
            let fx = fixture(status);
            store_state(&fx, json!({"temporaryToken": "tmp-1", "accessToken": "acc-1"}));

            assert!(
                fx.manager.is_user_authorized(&settings(), JIRA_URL, USER).unwrap(),
                "status {status}"
            );
        }
    }

    #[test]
    fn test_is_user_authorized_invalid_url() {
        let fx = fixture(200);
        fx.store
            .save(
                "jira",
                "42",
                &UserAuthorizationData::new(
                    "jira.example.com",
                    USER,
                    json!({"temporaryToken": "tmp-1", "accessToken": "acc-1"}),
                ),
            )
            .unwrap();

        let err = fx
            .manager
            .is_user_authorized(&settings(), "jira.example.com", USER)
            .unwrap_err();

        assert_eq!(err.kind(), AuthorizationErrorKind::InvalidServiceUrl);
    }

    #[test]
    fn test_is_user_authorized_invalid_payload() {
        let fx = fixture(200);
        store_state(&fx, json!({"accessToken": 12}));

        let err = fx
            .manager
            .is_user_authorized(&settings(), JIRA_URL, USER)
            .unwrap_err();

        assert_eq!(err.kind(), AuthorizationErrorKind::InvalidStateData);
    }

    #[test]
    fn test_authorization_url_saves_pending_record() {
        let fx = fixture(200);

        let consent_url = fx.manager.authorization_url(&settings(), JIRA_URL, USER).unwrap();

        assert_eq!(
            consent_url,
            "https://jira.example.com/plugins/servlet/oauth/authorize?oauth_token=tmp-1"
        );
        let record = fx.store.find("jira", "42", JIRA_URL, USER).unwrap().unwrap();
        assert_eq!(record.data, Some(json!({"temporaryToken": "tmp-1"})));

        let configured = fx.tracker.configured.lock().unwrap();
        assert_eq!(configured.len(), 1);
        assert_eq!(configured[0].consumer_key, "bridge-consumer");
        assert_eq!(configured[0].base_url, JIRA_URL);
        assert_eq!(
            configured[0].callback_url,
            "https://bridge.example.com/v1/application/42/authorization/authorize"
        );
    }

    #[test]
    fn test_authorization_url_invalid_url_writes_nothing() {
        let fx = fixture(200);

        let err = fx
            .manager
            .authorization_url(&settings(), "not a url", USER)
            .unwrap_err();

        assert_eq!(err.kind(), AuthorizationErrorKind::InvalidServiceUrl);
        assert_eq!(fx.store.write_count(), 0);
    }

    #[test]
    fn test_authorization_url_without_private_key() {
        let fx = fixture_with(FakeTracker::new(200), Some(PUBLIC_PEM), None);

        let err = fx
            .manager
            .authorization_url(&settings(), JIRA_URL, USER)
            .unwrap_err();

        assert!(matches!(
            &err,
            AuthorizationError::PrivateKeyUnavailable { filename } if filename == "jira_app.pkcs8"
        ));
        assert_eq!(fx.store.write_count(), 0);
    }

    #[test]
    fn test_authorize_unknown_token_writes_nothing() {
        let fx = fixture(200);
        store_state(&fx, json!({"temporaryToken": "tmp-1"}));
        let writes_before = fx.store.write_count();

        let err = fx
            .manager
            .authorize_temporary_token(&settings(), "unknown", "verifier")
            .unwrap_err();

        assert!(matches!(&err, AuthorizationError::TokenNotFound { token } if token == "unknown"));
        assert_eq!(fx.store.write_count(), writes_before);
        assert!(fx.tracker.configured.lock().unwrap().is_empty());
    }

    #[test]
    fn test_initiate_then_authorize() {
        let fx = fixture(200);

        fx.manager.authorization_url(&settings(), JIRA_URL, USER).unwrap();
        assert!(!fx.manager.is_user_authorized(&settings(), JIRA_URL, USER).unwrap());

        fx.manager
            .authorize_temporary_token(&settings(), "tmp-1", "verifier")
            .unwrap();

        let record = fx.store.find("jira", "42", JIRA_URL, USER).unwrap().unwrap();
        assert_eq!(
            record.data,
            Some(json!({"temporaryToken": "tmp-1", "accessToken": "acc-1"}))
        );
        assert_eq!(fx.store.len(), 1);
        assert!(fx.manager.is_user_authorized(&settings(), JIRA_URL, USER).unwrap());
    }

    #[test]
    fn test_authorize_rejected_exchange_keeps_pending_record() {
        let mut tracker = FakeTracker::new(200);
        tracker.reject_exchange = true;
        let fx = fixture_with(tracker, Some(PUBLIC_PEM), Some(PRIVATE_PEM));
        store_state(&fx, json!({"temporaryToken": "tmp-1"}));
        let writes_before = fx.store.write_count();

        let err = fx
            .manager
            .authorize_temporary_token(&settings(), "tmp-1", "verifier")
            .unwrap_err();

        assert_eq!(err.kind(), AuthorizationErrorKind::OAuth1);
        assert_eq!(fx.store.write_count(), writes_before);
        let record = fx.store.find("jira", "42", JIRA_URL, USER).unwrap().unwrap();
        assert_eq!(record.data, Some(json!({"temporaryToken": "tmp-1"})));
    }

    #[test]
    fn test_token_lookup_is_scoped_to_instance() {
        let fx = fixture(200);
        fx.store
            .save(
                "jira",
                "99",
                &UserAuthorizationData::new(JIRA_URL, USER, json!({"temporaryToken": "tmp-1"})),
            )
            .unwrap();

        let err = fx
            .manager
            .authorize_temporary_token(&settings(), "tmp-1", "verifier")
            .unwrap_err();

        assert_eq!(err.kind(), AuthorizationErrorKind::TokenNotFound);
    }

    #[test]
    fn test_validate_keys() {
        let fx = fixture(200);

        let status = fx.manager.validate_keys(&settings()).unwrap();

        assert_eq!(status.public_key_filename, "jira_app_pub.pem");
        assert_eq!(status.private_key_filename, "jira_app.pkcs8");
        assert!(status.is_complete());
    }

    #[test]
    fn test_validate_keys_missing_private_key() {
        let fx = fixture_with(FakeTracker::new(200), Some(PUBLIC_PEM), None);

        let status = fx.manager.validate_keys(&settings()).unwrap();

        assert!(status.public_key.is_some());
        assert!(!status.private_key_present);
        assert!(!status.is_complete());
    }

    #[test]
    fn test_validate_keys_corrupted_public_key() {
        let fx = fixture_with(FakeTracker::new(200), Some("garbage!"), Some(PRIVATE_PEM));

        let err = fx.manager.validate_keys(&settings()).unwrap_err();

        assert_eq!(err.kind(), AuthorizationErrorKind::KeyValidation);
    }
}
