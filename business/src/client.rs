//! Authenticated request pipeline.
//!
//! Every API call from a signed-in page goes through [`ApiClient::send`]:
//! the current access token is attached, and a 401 answer triggers exactly
//! one transparent renewal through `/auth/refresh` followed by one retry of
//! the original request. Renewal failure wipes the session, which routes the
//! app back to the login page through the session store's event channel.
//!
//! The renewal call itself and the auth endpoints (login, signup, refresh)
//! bypass the pipeline via [`ApiClient::send_raw`]; a 401 on those is final.

use std::any::Any;
use std::sync::{Arc, Mutex};

use ehttp::{Request, Response};
use log::{error, info, warn};
use serde::Serialize;
use taskdeck_states::State;
use ustr::Ustr;

use crate::auth::{AuthResponse, RefreshRequest};
use crate::fetch_service::FetchService;
use crate::session::{AuthUser, Session, SessionStore};

/// Discrete states one authenticated request moves through once its first
/// attempt comes back 401. Terminal states are `Retried` and `LoggedOut`;
/// requests that never see a 401 stay `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryPhase {
    /// No authentication failure seen.
    #[default]
    Idle,
    /// First 401 received; this request will renew at most once.
    Retrying,
    /// Renewal call in flight.
    Renewing,
    /// Renewal succeeded and the original request was resubmitted once.
    Retried,
    /// Renewal failed (or no session was stored); the session was cleared.
    LoggedOut,
}

/// Shared handle for observing where one logical request ended up.
#[derive(Debug, Clone, Default)]
pub struct RequestTrace {
    phase: Arc<Mutex<RetryPhase>>,
}

impl RequestTrace {
    pub fn phase(&self) -> RetryPhase {
        *self.phase.lock().expect("request trace poisoned")
    }

    fn advance(&self, phase: RetryPhase) {
        *self.phase.lock().expect("request trace poisoned") = phase;
    }
}

/// Replace any authorization header on `request` with a bearer token.
pub fn set_bearer(request: &mut Request, access_token: &str) {
    request
        .headers
        .headers
        .retain(|(name, _)| !name.eq_ignore_ascii_case("authorization"));
    request
        .headers
        .insert("Authorization", format!("Bearer {access_token}"));
}

/// Build a JSON request with an explicit HTTP method.
pub fn json_request<T: Serialize>(
    method: &str,
    url: String,
    payload: &T,
) -> Result<Request, serde_json::Error> {
    let body = serde_json::to_vec(payload)?;
    let mut request = Request::post(url, body);
    request.method = method.to_string();
    request.headers.insert("Content-Type", "application/json");
    Ok(request)
}

/// Build a body-less request with an explicit HTTP method.
pub fn empty_request(method: &str, url: String) -> Request {
    let mut request = Request::get(url);
    request.method = method.to_string();
    request
}

/// The transport every command fetches through. Registered as a state so
/// commands reach it via their dependency list.
#[derive(Debug, Clone)]
pub struct ApiClient {
    api_url: Ustr,
    fetcher: Arc<dyn FetchService>,
    session: Arc<dyn SessionStore>,
}

impl ApiClient {
    pub fn new(
        api_url: Ustr,
        fetcher: Arc<dyn FetchService>,
        session: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            api_url,
            fetcher,
            session,
        }
    }

    /// Absolute URL for an API path like `/tasks`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    pub fn session_store(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.session)
    }

    /// The signed-in user, if a session is stored.
    pub fn current_user(&self) -> Option<AuthUser> {
        self.session.get().map(|session| session.user)
    }

    /// Fire a request as-is: no bearer, no renewal. Used by the auth
    /// endpoints themselves.
    pub fn send_raw(
        &self,
        request: Request,
        on_done: impl FnOnce(ehttp::Result<Response>) + Send + 'static,
    ) {
        self.fetcher.fetch(request, Box::new(on_done));
    }

    /// Fire an authenticated request through the renewal pipeline.
    ///
    /// The callback resolves exactly once with the final outcome: the first
    /// response when it is not a 401, the retried response after a successful
    /// renewal, or the renewal failure itself. The returned [`RequestTrace`]
    /// exposes which of those paths was taken.
    pub fn send(
        &self,
        request: Request,
        on_done: impl FnOnce(ehttp::Result<Response>) + Send + 'static,
    ) -> RequestTrace {
        let trace = RequestTrace::default();
        let mut first_attempt = request.clone();
        if let Some(session) = self.session.get() {
            set_bearer(&mut first_attempt, &session.access_token);
        }

        let fetcher = Arc::clone(&self.fetcher);
        let session_store = Arc::clone(&self.session);
        let refresh_url = self.url("/auth/refresh");
        let trace_cb = trace.clone();
        let on_done: Box<dyn FnOnce(ehttp::Result<Response>) + Send + 'static> = Box::new(on_done);

        self.fetcher.fetch(
            first_attempt,
            Box::new(move |result| match result {
                Ok(response) if response.status == 401 => {
                    trace_cb.advance(RetryPhase::Retrying);
                    let Some(current) = session_store.get() else {
                        info!("ApiClient: 401 with no stored session, logging out");
                        session_store.clear();
                        trace_cb.advance(RetryPhase::LoggedOut);
                        on_done(Ok(response));
                        return;
                    };
                    trace_cb.advance(RetryPhase::Renewing);
                    info!("ApiClient: access token rejected, renewing session");
                    let renew_body = match serde_json::to_vec(&RefreshRequest {
                        refresh_token: current.refresh_token.clone(),
                    }) {
                        Ok(body) => body,
                        Err(e) => {
                            error!("ApiClient: failed to serialize RefreshRequest: {e}");
                            session_store.clear();
                            trace_cb.advance(RetryPhase::LoggedOut);
                            on_done(Err(format!("Internal error: {e}")));
                            return;
                        }
                    };
                    let mut renew_request = Request::post(&refresh_url, renew_body);
                    renew_request
                        .headers
                        .insert("Content-Type", "application/json");

                    let retry_fetcher = Arc::clone(&fetcher);
                    let mut retried_request = request;
                    fetcher.fetch(
                        renew_request,
                        Box::new(move |renew_result| match renew_result {
                            Ok(renew_response) if renew_response.status == 200 => {
                                match serde_json::from_slice::<AuthResponse>(&renew_response.bytes)
                                {
                                    Ok(auth) => {
                                        // The refresh endpoint issues a fresh pair; the
                                        // signed-in user stays as stored.
                                        session_store.set(Session {
                                            access_token: auth.access_token.clone(),
                                            refresh_token: auth.refresh_token,
                                            user: current.user,
                                        });
                                        set_bearer(&mut retried_request, &auth.access_token);
                                        trace_cb.advance(RetryPhase::Retried);
                                        info!(
                                            "ApiClient: session renewed, retrying original request"
                                        );
                                        retry_fetcher.fetch(retried_request, on_done);
                                    }
                                    Err(e) => {
                                        error!(
                                            "ApiClient: failed to parse renewal response: {e}"
                                        );
                                        session_store.clear();
                                        trace_cb.advance(RetryPhase::LoggedOut);
                                        on_done(Err(format!(
                                            "Failed to parse renewal response: {e}"
                                        )));
                                    }
                                }
                            }
                            Ok(renew_response) => {
                                warn!(
                                    "ApiClient: renewal rejected with status {}",
                                    renew_response.status
                                );
                                session_store.clear();
                                trace_cb.advance(RetryPhase::LoggedOut);
                                on_done(Ok(renew_response));
                            }
                            Err(err) => {
                                error!("ApiClient: renewal failed: {err}");
                                session_store.clear();
                                trace_cb.advance(RetryPhase::LoggedOut);
                                on_done(Err(err));
                            }
                        }),
                    );
                }
                other => on_done(other),
            }),
        );
        trace
    }
}

impl State for ApiClient {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
