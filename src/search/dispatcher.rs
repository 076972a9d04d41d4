use super::registry::{
    StrategyArgs, StrategyRegistry, STRATEGY_CONTENT, STRATEGY_EXTENSION, STRATEGY_MULTI_WORD,
    STRATEGY_PATH, STRATEGY_PATH_AND_CONTENT,
};
use super::PromptSearch;
use crate::error::SearchError;
use crate::query::{parse, ParsedQuery};
use crate::store::{SearchResult, SearchStore};

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

/// Qualifiers the dispatcher can serve, in the order they are applied.
pub const SUPPORTED_QUALIFIERS: [&str; 3] = ["path", "content", "extension"];

/// Routes a prompt to the right strategies and combines their results.
pub struct SearchDispatcher {
    store: Arc<dyn SearchStore>,
    registry: Arc<StrategyRegistry>,
}

impl SearchDispatcher {
    pub fn new(store: Arc<dyn SearchStore>, registry: Arc<StrategyRegistry>) -> Self {
        Self { store, registry }
    }

    /// Runs one strategy. A failure is logged and counts as no matches.
    async fn run(&self, strategy: &str, args: StrategyArgs) -> Vec<SearchResult> {
        match self
            .registry
            .execute(strategy, self.store.clone(), args)
            .await
        {
            Ok(results) => results,
            Err(e) => {
                let error = SearchError::StoreFailure {
                    strategy: strategy.to_string(),
                    reason: format!("{:#}", e),
                };
                tracing::error!("{}", error);
                vec![]
            }
        }
    }

    /// Every value of every supported qualifier must match (AND).
    async fn search_structured(&self, parsed: &ParsedQuery) -> Vec<SearchResult> {
        for name in parsed.qualifiers.keys() {
            if !SUPPORTED_QUALIFIERS.contains(&name.as_str()) {
                tracing::warn!("Ignoring {}", SearchError::UnsupportedQualifier(name.clone()));
            }
        }

        let mut paths = parsed.values("path");
        let mut contents = parsed.values("content");
        let extensions = parsed.values("extension");

        let mut results: Option<Vec<SearchResult>> = None;

        // The first (path, content) pair is answered by one combined store call.
        if let (Some(path), Some(content)) = (paths.first(), contents.first()) {
            let combined = self
                .run(
                    STRATEGY_PATH_AND_CONTENT,
                    StrategyArgs::PathAndContent {
                        path: path.clone(),
                        content: content.clone(),
                    },
                )
                .await;
            if combined.is_empty() {
                tracing::info!("No results match path and content criteria");
                return vec![];
            }
            results = Some(combined);
            paths = &paths[1..];
            contents = &contents[1..];
        }

        let steps = paths
            .iter()
            .map(|value| (STRATEGY_PATH, value))
            .chain(contents.iter().map(|value| (STRATEGY_CONTENT, value)))
            .chain(extensions.iter().map(|value| (STRATEGY_EXTENSION, value)));

        for (strategy, value) in steps {
            tracing::debug!("Filtering by {}: '{}'", strategy, value);
            let found = self.run(strategy, StrategyArgs::Term(value.clone())).await;
            let narrowed = intersect(results.take(), found);
            if narrowed.is_empty() {
                tracing::info!("No results match {} criteria", strategy);
                return vec![];
            }
            results = Some(narrowed);
        }

        let results = results.unwrap_or_default();
        tracing::info!("Structured search completed with {} results", results.len());
        results
    }

    async fn search_heuristic(&self, text: &str) -> Vec<SearchResult> {
        if let Some(extension) = text.strip_prefix('.') {
            if extension.is_empty() {
                return vec![];
            }
            tracing::info!("Searching by file extension: '{}'", extension);
            return self
                .run(STRATEGY_EXTENSION, StrategyArgs::Term(extension.to_string()))
                .await;
        }

        let words: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        if words.len() > 1 {
            tracing::info!("Searching multiple words: {:?}", words);
            self.run(STRATEGY_MULTI_WORD, StrategyArgs::Words(words)).await
        } else {
            tracing::info!("Searching by content: '{}'", text);
            self.run(STRATEGY_CONTENT, StrategyArgs::Term(text.to_string()))
                .await
        }
    }
}

#[async_trait]
impl PromptSearch for SearchDispatcher {
    async fn search_prompt(&self, prompt: &str) -> Vec<SearchResult> {
        tracing::info!("Received search prompt: '{}'", prompt);

        if prompt.trim().is_empty() {
            return vec![];
        }

        let parsed = parse(prompt);
        let results = if parsed.has_qualifiers() {
            tracing::info!("Using parsed query: {:?}", parsed.qualifiers);
            self.search_structured(&parsed).await
        } else {
            self.search_heuristic(&parsed.remaining).await
        };

        dedup_by_path(results)
    }
}

/// Keeps the entries of `current` whose path also appears in `found`.
/// `None` means nothing has been searched yet, so `found` seeds the set.
fn intersect(current: Option<Vec<SearchResult>>, found: Vec<SearchResult>) -> Vec<SearchResult> {
    let Some(current) = current else {
        return found;
    };

    let before = current.len();
    let allowed: HashSet<&str> = found.iter().map(|r| r.path.as_str()).collect();
    let filtered: Vec<SearchResult> = current
        .into_iter()
        .filter(|r| allowed.contains(r.path.as_str()))
        .collect();
    tracing::debug!("Filtered from {} to {} results", before, filtered.len());
    filtered
}

fn dedup_by_path(results: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut seen = HashSet::with_capacity(results.len());
    results
        .into_iter()
        .filter(|r| seen.insert(r.path.clone()))
        .collect()
}
