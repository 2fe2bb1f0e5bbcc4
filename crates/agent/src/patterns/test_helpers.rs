//! Shared test helpers for pattern tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use toolloop_core::error::ProviderError;
use toolloop_core::invoker::{ModelInvoker, ModelRequest};

/// A mock invoker that replays a fixed list of responses.
///
/// Every request is recorded. Panics if more calls are made than
/// responses provided.
pub struct ScriptedInvoker {
    responses: Mutex<VecDeque<Result<String, ProviderError>>>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedInvoker {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(|r| Ok(r.into())).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// An invoker whose first call fails.
    pub fn failing(error: ProviderError) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from([Err(error)])),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ModelInvoker for ScriptedInvoker {
    fn name(&self) -> &str {
        "scripted_mock"
    }

    async fn execute(&self, request: ModelRequest) -> Result<String, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(request);
        let call = requests.len();

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("ScriptedInvoker: no more responses (call #{call})"))
    }
}
