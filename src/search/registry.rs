//! Search Strategy Registry
//!
//! A dynamic registry that maps strategy names (e.g., "path", "content") to
//! async closures calling the Search Store. New strategies can be registered at
//! runtime without touching the dispatcher.

use crate::error::SearchError;
use crate::store::{SearchResult, SearchStore};

use anyhow::Result;
use dashmap::DashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub const STRATEGY_EXTENSION: &str = "extension";
pub const STRATEGY_CONTENT: &str = "content";
pub const STRATEGY_MULTI_WORD: &str = "multi_word";
pub const STRATEGY_PATH: &str = "path";
pub const STRATEGY_PATH_AND_CONTENT: &str = "path_and_content";

/// Arguments handed to a strategy. Each strategy picks the shape it understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyArgs {
    Term(String),
    Words(Vec<String>),
    PathAndContent { path: String, content: String },
}

impl StrategyArgs {
    fn describe(&self) -> String {
        match self {
            StrategyArgs::Term(term) => format!("'{}'", term),
            StrategyArgs::Words(words) => format!("{:?}", words),
            StrategyArgs::PathAndContent { path, content } => {
                format!("path='{}' content='{}'", path, content)
            }
        }
    }
}

/// Boxed future a strategy resolves to.
pub type StrategyFuture = Pin<Box<dyn Future<Output = Result<Vec<SearchResult>>> + Send>>;

/// Type alias for a thread-safe, asynchronous search strategy.
/// It takes the store plus arguments and resolves to the matching files.
pub type StrategyFn =
    Arc<dyn Fn(Arc<dyn SearchStore>, StrategyArgs) -> StrategyFuture + Send + Sync>;

/// Registry holding the mapping between strategy names and their implementation.
pub struct StrategyRegistry {
    strategies: DashMap<String, StrategyFn>,
}

impl StrategyRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Creates a registry preloaded with the five built-in store strategies.
    pub fn with_builtin() -> Arc<Self> {
        let registry = Self::new();

        registry.register(STRATEGY_EXTENSION, |store, args| async move {
            let extension = expect_term(STRATEGY_EXTENSION, args)?;
            store.search_by_extension(&extension).await
        });

        registry.register(STRATEGY_CONTENT, |store, args| async move {
            let term = expect_term(STRATEGY_CONTENT, args)?;
            store.search_by_content(&term).await
        });

        registry.register(STRATEGY_MULTI_WORD, |store, args| async move {
            let words = match args {
                StrategyArgs::Words(words) => words,
                StrategyArgs::Term(term) => term.split_whitespace().map(str::to_string).collect(),
                other => return Err(bad_args(STRATEGY_MULTI_WORD, &other)),
            };
            store.search_by_multiple_words(&words).await
        });

        registry.register(STRATEGY_PATH, |store, args| async move {
            let pattern = expect_term(STRATEGY_PATH, args)?;
            store.search_by_path(&pattern).await
        });

        registry.register(STRATEGY_PATH_AND_CONTENT, |store, args| async move {
            match args {
                StrategyArgs::PathAndContent { path, content } => {
                    store.search_by_path_and_content(&path, &content).await
                }
                other => Err(bad_args(STRATEGY_PATH_AND_CONTENT, &other)),
            }
        });

        registry
    }

    /// Registers a strategy under a specific name, replacing any previous one.
    ///
    /// # Arguments
    /// * `name` - The identifier the dispatcher uses (e.g., "path").
    /// * `strategy` - The closure that performs the store calls.
    pub fn register<F, Fut>(&self, name: &str, strategy: F)
    where
        F: Fn(Arc<dyn SearchStore>, StrategyArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<SearchResult>>> + Send + 'static,
    {
        // Box::pin erases the concrete Future type so different closures share the map.
        let strategy_fn: StrategyFn = Arc::new(move |store, args| {
            Box::pin(strategy(store, args)) as StrategyFuture
        });

        self.strategies.insert(name.to_string(), strategy_fn);

        tracing::info!("Registered search strategy: {}", name);
    }

    /// Looks up a strategy by name and runs it against the store.
    ///
    /// # Returns
    /// * `Ok(results)` if the strategy ran successfully.
    /// * `Err` if the strategy failed or if no strategy exists for the given name.
    pub async fn execute(
        &self,
        name: &str,
        store: Arc<dyn SearchStore>,
        args: StrategyArgs,
    ) -> Result<Vec<SearchResult>> {
        // Clone the Arc out so the map guard is not held across the await.
        let strategy_fn = self
            .strategies
            .get(name)
            .map(|entry| entry.value().clone());

        match strategy_fn {
            Some(strategy_fn) => {
                tracing::debug!("Running strategy '{}' with {}", name, args.describe());
                strategy_fn(store, args).await
            }
            None => {
                let error = SearchError::UnknownStrategy(name.to_string());
                tracing::error!("{}", error);
                Err(error.into())
            }
        }
    }

    /// Returns a list of all registered strategy names.
    pub fn list_strategies(&self) -> Vec<String> {
        self.strategies
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }

    pub fn has_strategy(&self, name: &str) -> bool {
        self.strategies.contains_key(name)
    }

    pub fn strategy_count(&self) -> usize {
        self.strategies.len()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self {
            strategies: DashMap::new(),
        }
    }
}

fn expect_term(strategy: &str, args: StrategyArgs) -> Result<String> {
    match args {
        StrategyArgs::Term(term) => Ok(term),
        other => Err(bad_args(strategy, &other)),
    }
}

fn bad_args(strategy: &str, args: &StrategyArgs) -> anyhow::Error {
    anyhow::anyhow!(
        "strategy '{}' cannot take arguments {}",
        strategy,
        args.describe()
    )
}
