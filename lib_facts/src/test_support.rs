//! Fixtures shared by the unit tests of the data and domain layers.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::any::type_name;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::data::DataSource;
use crate::model::{Fact, FactsTransferRecord};
use crate::retrieve::{ErrorRecord, NetworkError, Request, RequestExecutor};

pub fn facts(texts: &[&str]) -> Vec<Fact> {
    texts
        .iter()
        .map(|t| Fact::from(FactsTransferRecord { fact: t.to_string() }))
        .collect()
}

pub fn texts(facts: &[Fact]) -> Vec<&str> {
    facts.iter().map(Fact::text).collect()
}

/// Answers every request with the same canned JSON, or the same failure.
pub struct StubExecutor {
    response: Result<serde_json::Value, ErrorRecord>,
    pub requests: Mutex<Vec<Request>>,
}

impl StubExecutor {
    pub fn answering(body: serde_json::Value) -> Self {
        Self {
            response: Ok(body),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ErrorRecord) -> Self {
        Self {
            response: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RequestExecutor for StubExecutor {
    async fn execute<T>(&self, request: Request) -> Result<T, ErrorRecord>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.requests.lock().unwrap().push(request);
        let body = self.response.clone()?;
        serde_json::from_value::<T>(body)
            .map_err(|_| NetworkError::Decode(type_name::<T>().to_string()).record(None))
    }
}

/// A data source with scripted outcomes that counts its calls.
pub struct ScriptedSource {
    load_result: Result<Vec<Fact>, ErrorRecord>,
    /// `None` echoes the saved facts back.
    save_result: Option<Result<Vec<Fact>, ErrorRecord>>,
    pub load_calls: AtomicUsize,
    pub load_counts: Mutex<Vec<u32>>,
    pub saved: Mutex<Vec<Vec<Fact>>>,
}

impl ScriptedSource {
    pub fn loading(result: Result<Vec<Fact>, ErrorRecord>) -> Self {
        Self {
            load_result: result,
            save_result: None,
            load_calls: AtomicUsize::new(0),
            load_counts: Mutex::new(Vec::new()),
            saved: Mutex::new(Vec::new()),
        }
    }

    pub fn saving(mut self, result: Result<Vec<Fact>, ErrorRecord>) -> Self {
        self.save_result = Some(result);
        self
    }

    pub fn loads(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }

    pub fn saves(&self) -> usize {
        self.saved.lock().unwrap().len()
    }
}

#[async_trait]
impl DataSource for ScriptedSource {
    async fn load(&self, count: u32) -> Result<Vec<Fact>, ErrorRecord> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        self.load_counts.lock().unwrap().push(count);
        self.load_result.clone()
    }

    async fn save(&self, facts: Vec<Fact>) -> Result<Vec<Fact>, ErrorRecord> {
        self.saved.lock().unwrap().push(facts.clone());
        match &self.save_result {
            Some(result) => result.clone(),
            None => Ok(facts),
        }
    }
}
