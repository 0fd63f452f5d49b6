//! Transport seam between commands and the network.
//!
//! Production code fetches through [`EhttpFetcher`]; tests swap in
//! [`MockFetcher`] with a scripted queue of responses so the whole request
//! pipeline, including its renewal retry, runs synchronously on one thread.

use std::fmt::Debug;

use ehttp::{Request, Response, Result};

pub trait FetchService: Send + Sync + Debug {
    fn fetch(&self, request: Request, on_done: Box<dyn FnOnce(Result<Response>) + Send + 'static>);
}

#[derive(Debug, Default)]
pub struct EhttpFetcher;

impl FetchService for EhttpFetcher {
    fn fetch(&self, request: Request, on_done: Box<dyn FnOnce(Result<Response>) + Send + 'static>) {
        ehttp::fetch(request, on_done)
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use mock::{MockFetcher, scripted_response};

#[cfg(any(test, feature = "test-utils"))]
mod mock {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use ehttp::{Headers, Request, Response, Result};

    use super::FetchService;

    /// Fetcher that answers from a scripted queue, in order, on the calling
    /// thread. Every request is recorded for later inspection.
    #[derive(Debug, Default)]
    pub struct MockFetcher {
        responses: Mutex<VecDeque<Result<Response>>>,
        requests: Mutex<Vec<Request>>,
    }

    impl MockFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue the next scripted result.
        pub fn push_response(&self, response: Result<Response>) {
            self.responses
                .lock()
                .expect("MockFetcher responses poisoned")
                .push_back(response);
        }

        /// Queue a JSON response with the given status.
        pub fn push_json(&self, status: u16, body: &str) {
            self.push_response(Ok(scripted_response(status, body.as_bytes())));
        }

        /// Queue a network-level failure.
        pub fn push_network_error(&self, message: &str) {
            self.push_response(Err(message.to_string()));
        }

        /// All requests seen so far, in dispatch order.
        pub fn recorded_requests(&self) -> Vec<Request> {
            self.requests
                .lock()
                .expect("MockFetcher requests poisoned")
                .clone()
        }

        pub fn request_count(&self) -> usize {
            self.requests
                .lock()
                .expect("MockFetcher requests poisoned")
                .len()
        }
    }

    impl FetchService for MockFetcher {
        fn fetch(
            &self,
            request: Request,
            on_done: Box<dyn FnOnce(Result<Response>) + Send + 'static>,
        ) {
            self.requests
                .lock()
                .expect("MockFetcher requests poisoned")
                .push(request);
            // Pop outside the callback: on_done may fetch again re-entrantly
            // (the renewal retry does), so no lock can be held around it.
            let next = self
                .responses
                .lock()
                .expect("MockFetcher responses poisoned")
                .pop_front();
            match next {
                Some(response) => on_done(response),
                None => on_done(Err("MockFetcher: response queue is empty".to_string())),
            }
        }
    }

    /// Build a response the way the backend would send it.
    pub fn scripted_response(status: u16, body: &[u8]) -> Response {
        Response {
            url: "http://mock.test/api".to_string(),
            ok: (200..300).contains(&status),
            status,
            status_text: String::new(),
            headers: Headers::new(&[("content-type", "application/json")]),
            bytes: body.to_vec(),
        }
    }
}
