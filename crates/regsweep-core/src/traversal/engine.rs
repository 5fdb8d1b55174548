use std::time::Instant;

use regsweep_core_types::SessionId;

use crate::enrich;
use crate::errors::{RegistryError, Result};
use crate::filter::{FilterDecision, FilterPolicy, FilterSet};
use crate::format::format_value;
use crate::model::{ErrorItem, FilterItem, QueryItem, ResultItem};
use crate::render;
use crate::resolver;
use crate::store::{RegistryKey, RegistryStore};
use crate::{log_op_end, log_op_error, log_op_start};

/// Error item name for a failed value enumeration
pub const OP_VALUES: &str = "values";
/// Error item name for a failed subkey enumeration
pub const OP_SUBKEYS: &str = "subkeys";
/// Error item name for a target that could not be opened
pub const OP_QUERY: &str = "query";

/// One query session over a registry store
///
/// Owns the active exclusion and filter sets plus the two accumulators.
/// Results and errors only ever grow across calls; every call that is given
/// exclusion or filter rules replaces the active sets with them.
///
/// The walk is depth-first: a key's values are recorded before its
/// subkeys, and subkeys are visited in store order. Each opened handle is
/// dropped before its frame returns.
pub struct QueryEngine<'s, S: RegistryStore> {
    store: &'s S,
    session_id: SessionId,
    excludes: Vec<QueryItem>,
    filters: FilterSet,
    results: Vec<ResultItem>,
    errors: Vec<ErrorItem>,
}

impl<'s, S: RegistryStore> QueryEngine<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            session_id: SessionId::new(),
            excludes: Vec::new(),
            filters: FilterSet::default(),
            results: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_filter_policy(mut self, policy: FilterPolicy) -> Self {
        self.filters.set_policy(policy);
        self
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn filter_policy(&self) -> FilterPolicy {
        self.filters.policy()
    }

    pub fn excludes(&self) -> &[QueryItem] {
        &self.excludes
    }

    pub fn filters(&self) -> &[FilterItem] {
        self.filters.rules()
    }

    pub fn results(&self) -> &[ResultItem] {
        &self.results
    }

    pub fn errors(&self) -> &[ErrorItem] {
        &self.errors
    }

    /// Replace the exclusion rules; rules with a blank path are dropped
    pub fn set_excludes(&mut self, excludes: Vec<QueryItem>) {
        self.excludes = excludes
            .into_iter()
            .filter(|rule| {
                let keep = !rule.key_path().trim().is_empty();
                if !keep {
                    tracing::warn!(
                        session_id = %self.session_id,
                        root = %rule.root(),
                        "ignoring exclusion rule with a blank path"
                    );
                }
                keep
            })
            .collect();
    }

    /// Replace the filter rules, keeping the policy
    pub fn set_filters(&mut self, filters: Vec<FilterItem>) {
        self.filters.replace_rules(filters);
    }

    /// Walk each target in order with fresh exclusion and filter sets
    ///
    /// A target that does not exist, or whose open fails recoverably, is
    /// recorded as an error named `query` and the next target is walked.
    ///
    /// # Errors
    ///
    /// Any fatal error aborts the whole call. Items appended before the
    /// abort stay in the accumulators.
    pub fn query(
        &mut self,
        targets: &[QueryItem],
        excludes: Vec<QueryItem>,
        filters: Vec<FilterItem>,
    ) -> Result<()> {
        self.set_excludes(excludes);
        self.set_filters(filters);

        log_op_start!(
            "query",
            session_id = %self.session_id,
            target_count = targets.len()
        );
        let start = Instant::now();

        let outcome = targets
            .iter()
            .try_for_each(|target| self.query_target(target));

        self.finish("query", start, outcome)
    }

    /// Walk an already opened key with the current sets
    ///
    /// # Errors
    ///
    /// Any fatal error aborts the walk.
    pub fn query_key(&mut self, key: &S::Key) -> Result<()> {
        log_op_start!(
            "query_key",
            session_id = %self.session_id,
            key_path = %key.name()
        );
        let start = Instant::now();

        let outcome = self.walk(key);

        self.finish("query_key", start, outcome)
    }

    /// Replace the sets, then walk an already opened key
    ///
    /// # Errors
    ///
    /// Any fatal error aborts the walk.
    pub fn query_key_with(
        &mut self,
        key: &S::Key,
        excludes: Vec<QueryItem>,
        filters: Vec<FilterItem>,
    ) -> Result<()> {
        self.set_excludes(excludes);
        self.set_filters(filters);
        self.query_key(key)
    }

    /// Probe every key already in the results for `value_name`
    ///
    /// Returns the number of results added.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` - If `value_name` is blank
    /// * Any fatal store or formatting error
    pub fn add_value_name(&mut self, value_name: &str) -> Result<usize> {
        log_op_start!(
            "add_value_name",
            session_id = %self.session_id,
            value_name = %value_name
        );
        let start = Instant::now();

        match enrich::add_value_name(self.store, &mut self.results, &mut self.errors, value_name) {
            Ok(added) => {
                log_op_end!(
                    "add_value_name",
                    duration_ms = start.elapsed().as_millis() as u64,
                    session_id = %self.session_id,
                    added = added
                );
                Ok(added)
            }
            Err(err) => {
                log_op_error!(
                    "add_value_name",
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    session_id = %self.session_id
                );
                Err(err)
            }
        }
    }

    /// Export lines of the accumulated results
    pub fn export(&self) -> Vec<String> {
        render::export_lines(&self.results)
    }

    /// Export file text of the accumulated results (CRLF line endings)
    pub fn export_text(&self) -> String {
        render::to_reg_text(&self.results)
    }

    /// Whether some exclusion rule for the key's root occurs in its path
    ///
    /// # Errors
    ///
    /// Returns `UnknownRoot` if the key is not under one of the six roots.
    pub fn excluded(&self, key: &S::Key) -> Result<bool> {
        if self.excludes.is_empty() {
            return Ok(false);
        }
        let root = resolver::classify(key)?;
        let path = key.name();
        Ok(self.excludes.iter().any(|rule| {
            rule.root() == root && !rule.key_path().is_empty() && path.contains(rule.key_path())
        }))
    }

    fn query_target(&mut self, target: &QueryItem) -> Result<()> {
        match resolver::open_key(self.store, target.root(), target.key_path()) {
            Ok(key) => self.walk(&key),
            Err(err @ RegistryError::KeyNotFound { .. }) => {
                tracing::warn!(
                    session_id = %self.session_id,
                    key_path = %target.full_path(),
                    "query target does not exist"
                );
                self.errors
                    .push(ErrorItem::from_error(target.full_path(), OP_QUERY, &err)?);
                Ok(())
            }
            Err(err) => self.recover(&target.full_path(), OP_QUERY, err),
        }
    }

    fn walk(&mut self, key: &S::Key) -> Result<()> {
        if self.excluded(key)? {
            tracing::debug!(
                session_id = %self.session_id,
                key_path = %key.name(),
                "key excluded"
            );
            return Ok(());
        }

        let key_path = key.name().to_string();
        self.walk_values(key, &key_path)?;
        if !key_path.trim().is_empty() {
            self.walk_subkeys(key, &key_path)?;
        }
        Ok(())
    }

    fn walk_values(&mut self, key: &S::Key, key_path: &str) -> Result<()> {
        let names = match key.value_names() {
            Ok(names) => names,
            Err(err) => return self.recover(key_path, OP_VALUES, err),
        };

        for name in names {
            if let Err(err) = self.capture_value(key, key_path, &name) {
                self.recover(key_path, &name, err)?;
            }
        }
        Ok(())
    }

    fn capture_value(&mut self, key: &S::Key, key_path: &str, name: &str) -> Result<()> {
        let rule_data = match self.filters.decide(name) {
            FilterDecision::Reject => return Ok(()),
            FilterDecision::AcceptAll => None,
            FilterDecision::Check(rule) => Some(rule.value_data().to_string()),
        };

        let Some(value) = key.get_value(name)? else {
            return Ok(());
        };
        let formatted = format_value(key_path, name, &value)?;

        let accepted = match rule_data {
            None => true,
            Some(pattern) => self.filters.policy().accepts(&pattern, &formatted),
        };
        if accepted {
            self.results
                .push(ResultItem::new(key_path, name, formatted)?);
        }
        Ok(())
    }

    fn walk_subkeys(&mut self, key: &S::Key, key_path: &str) -> Result<()> {
        let names = match key.subkey_names() {
            Ok(names) => names,
            Err(err) => return self.recover(key_path, OP_SUBKEYS, err),
        };

        for name in names {
            let outcome = match key.open_subkey(&name) {
                Ok(Some(child)) => self.walk(&child),
                Ok(None) => Ok(()),
                Err(err) => Err(err),
            };
            if let Err(err) = outcome {
                self.recover(key_path, &name, err)?;
            }
        }
        Ok(())
    }

    /// Record a recoverable failure and continue, or hand a fatal one back
    fn recover(&mut self, key_path: &str, name: &str, err: RegistryError) -> Result<()> {
        if !err.is_recoverable() {
            return Err(err);
        }
        tracing::warn!(
            session_id = %self.session_id,
            key_path = %key_path,
            name = %name,
            error = %err,
            "recoverable failure recorded"
        );
        self.errors.push(ErrorItem::from_error(key_path, name, &err)?);
        Ok(())
    }

    fn finish(&self, op: &'static str, start: Instant, outcome: Result<()>) -> Result<()> {
        match outcome {
            Ok(()) => {
                log_op_end!(
                    op,
                    duration_ms = start.elapsed().as_millis() as u64,
                    session_id = %self.session_id,
                    result_count = self.results.len(),
                    error_count = self.errors.len()
                );
                Ok(())
            }
            Err(err) => {
                log_op_error!(
                    op,
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    session_id = %self.session_id
                );
                Err(err)
            }
        }
    }
}
