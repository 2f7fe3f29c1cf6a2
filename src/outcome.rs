//! Outcome reporting
//!
//! A won session submits one record to the backend. Submission is
//! fire-and-forget: reporters hand the work to a detached task and return
//! immediately, and any failure is dropped after logging.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/highscore`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub score: u32,
}

/// Sink for session outcomes
///
/// Implementations must not block the caller and must not surface errors.
pub trait OutcomeReporter {
    fn submit(&self, record: OutcomeRecord);
}

/// Discards every record
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl OutcomeReporter for NullReporter {
    fn submit(&self, record: OutcomeRecord) {
        log::debug!("Outcome discarded (score {})", record.score);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::FetchReporter;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::JsValue;
    use wasm_bindgen_futures::{JsFuture, spawn_local};
    use web_sys::{Headers, Request, RequestInit};

    use super::{OutcomeRecord, OutcomeReporter};

    /// POSTs outcomes to the record API with `fetch`
    #[derive(Debug, Clone)]
    pub struct FetchReporter {
        endpoint: String,
    }

    impl FetchReporter {
        pub fn new(endpoint: impl Into<String>) -> Self {
            Self {
                endpoint: endpoint.into(),
            }
        }

        fn request(&self, record: OutcomeRecord) -> Result<Request, JsValue> {
            let body =
                serde_json::to_string(&record).map_err(|e| JsValue::from_str(&e.to_string()))?;

            let headers = Headers::new()?;
            headers.set("Content-Type", "application/json")?;

            let init = RequestInit::new();
            init.set_method("POST");
            init.set_headers(&headers);
            init.set_body(&JsValue::from_str(&body));

            Request::new_with_str_and_init(&self.endpoint, &init)
        }
    }

    impl OutcomeReporter for FetchReporter {
        fn submit(&self, record: OutcomeRecord) {
            let request = match self.request(record) {
                Ok(request) => request,
                Err(e) => {
                    log::debug!("Outcome request not built: {:?}", e);
                    return;
                }
            };
            let Some(window) = web_sys::window() else {
                return;
            };

            let pending = JsFuture::from(window.fetch_with_request(&request));
            spawn_local(async move {
                if let Err(e) = pending.await {
                    log::debug!("Outcome submission failed: {:?}", e);
                }
            });
        }
    }
}
