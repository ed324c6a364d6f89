//! # Fact List
//!
//! Headless state for the facts screen. Every change is published through a
//! [`ReactiveValue`], so observers see updates on the delivery context only.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::configs::DEFAULT_FACTS_COUNT;
use crate::domain::LoadFactsUseCase;
use crate::loggers::{LoggerLocal, ProjectLayer};
use crate::model::Fact;
use crate::observing::{DeliveryContext, ReactiveValue};

pub const ERROR_TITLE: &str = "Error";
pub const SCREEN_TITLE: &str = "DoggoFact";

/// One row of the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactItem {
    pub text: String,
}

impl From<&Fact> for FactItem {
    fn from(fact: &Fact) -> Self {
        Self {
            text: fact.text().to_string(),
        }
    }
}

pub struct FactListModel {
    /// Whether a load is in progress. Starts `true`.
    pub loading: ReactiveValue<bool>,
    pub items: ReactiveValue<Vec<FactItem>>,
    /// Message of the last failed load, empty until one fails.
    pub error_text: ReactiveValue<String>,
    use_case: LoadFactsUseCase,
    facts_count: u32,
    logger: Arc<LoggerLocal>,
}

impl FactListModel {
    pub fn new(use_case: LoadFactsUseCase, context: &DeliveryContext, logger: Arc<LoggerLocal>) -> Self {
        Self {
            loading: ReactiveValue::new(true, context),
            items: ReactiveValue::new(Vec::new(), context),
            error_text: ReactiveValue::new(String::new(), context),
            use_case,
            facts_count: DEFAULT_FACTS_COUNT,
            logger,
        }
    }

    /// Overrides how many facts a load asks for.
    pub fn with_facts_count(mut self, count: u32) -> Self {
        self.facts_count = count;
        self
    }

    pub fn error_title(&self) -> &'static str {
        ERROR_TITLE
    }

    pub fn screen_title(&self) -> &'static str {
        SCREEN_TITLE
    }

    pub fn facts_count(&self) -> u32 {
        self.facts_count
    }

    /// Loads facts and publishes the outcome. `loading` is cleared last.
    pub async fn load_facts(&self) {
        self.loading.set(true);
        match self.use_case.execute(self.facts_count).await {
            Ok(facts) => self.items.set(facts.iter().map(FactItem::from).collect()),
            Err(error) => self.error_text.set(error.message),
        }
        self.loading.set(false);
    }

    /// The item at `index`, if any; the tap itself is only logged.
    pub async fn did_tap_fact(&self, index: usize) -> Option<FactItem> {
        let item = self.items.get().get(index).cloned();
        self.logger
            .for_layer(ProjectLayer::Domain)
            .debug("Tapped fact", Some(json!({ "index": index, "found": item.is_some() })))
            .await;
        item
    }
}
