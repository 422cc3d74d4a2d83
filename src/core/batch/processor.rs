//! Processor contract
//!
//! The engine hands each unit of work to a caller-supplied [`Processor`]
//! together with the job's keyword arguments. Whatever the processor returns
//! is stored as an opaque [`Outcome`]; errors and panics are contained per unit.

use super::outcome::Outcome;
use super::table::Table;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::panic::{self, AssertUnwindSafe};

/// Keyword configuration passed to every processor invocation of a job
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProcessorArgs(Map<String, Value>);

impl ProcessorArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with<V: Into<Value>>(mut self, key: impl Into<String>, value: V) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert<V: Into<Value>>(&mut self, key: impl Into<String>, value: V) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Typed lookup; `Ok(None)` when the key is absent
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> anyhow::Result<Option<T>> {
        match self.0.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    /// Flag lookup with a default
    pub fn flag(&self, key: &str, default: bool) -> bool {
        self.0.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for ProcessorArgs {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Work function applied to one unit (a chunk, or a single file)
pub trait Processor<U>: Send + Sync + 'static {
    fn process(&self, unit: &U, args: &ProcessorArgs) -> anyhow::Result<Outcome>;

    /// Identifier recorded on the job for diagnostics
    fn name(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

impl<U, F> Processor<U> for F
where
    F: Fn(&U, &ProcessorArgs) -> anyhow::Result<Outcome> + Send + Sync + 'static,
{
    fn process(&self, unit: &U, args: &ProcessorArgs) -> anyhow::Result<Outcome> {
        self(unit, args)
    }
}

/// A closure with an explicit diagnostic name
pub struct FnProcessor<F> {
    name: String,
    f: F,
}

impl<F> FnProcessor<F> {
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<U, F> Processor<U> for FnProcessor<F>
where
    F: Fn(&U, &ProcessorArgs) -> anyhow::Result<Outcome> + Send + Sync + 'static,
{
    fn process(&self, unit: &U, args: &ProcessorArgs) -> anyhow::Result<Outcome> {
        (self.f)(unit, args)
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

/// Failure of a single unit, as stored in an error record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitFailure {
    pub message: String,
    pub traceback: String,
}

impl UnitFailure {
    pub(crate) fn from_error(err: &anyhow::Error) -> Self {
        Self {
            message: err.to_string(),
            traceback: format!("{:?}", err),
        }
    }

    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        Self {
            message: format!("processor panicked: {}", detail),
            traceback: format!("panic: {}", detail),
        }
    }
}

impl std::fmt::Display for UnitFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Run a processor on one unit, containing errors and panics
pub(crate) fn run_unit<U, P>(
    processor: &P,
    unit: &U,
    args: &ProcessorArgs,
) -> Result<Outcome, UnitFailure>
where
    P: Processor<U> + ?Sized,
{
    match panic::catch_unwind(AssertUnwindSafe(|| processor.process(unit, args))) {
        Ok(Ok(outcome)) => Ok(outcome),
        Ok(Err(err)) => Err(UnitFailure::from_error(&err)),
        Err(payload) => Err(UnitFailure::from_panic(payload)),
    }
}

type ErrorHandler<T> = Box<dyn Fn(usize, &T, &anyhow::Error, &ProcessorArgs) + Send + Sync>;

/// Adapts a per-item function into a chunk processor
///
/// Each item is processed independently; failures are collected instead of
/// failing the whole chunk. The chunk outcome is a map with `results`,
/// `errors`, `total`, `successful` and `failed`.
pub struct ItemProcessor<T, F> {
    name: String,
    f: F,
    on_error: Option<ErrorHandler<T>>,
}

impl<T, F> ItemProcessor<T, F>
where
    F: Fn(&T, &ProcessorArgs) -> anyhow::Result<Outcome> + Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
            on_error: None,
        }
    }

    /// Callback invoked with `(item_index, item, error, args)` for every failed item
    pub fn on_error<H>(mut self, handler: H) -> Self
    where
        H: Fn(usize, &T, &anyhow::Error, &ProcessorArgs) + Send + Sync + 'static,
    {
        self.on_error = Some(Box::new(handler));
        self
    }

    fn process_items<'a>(
        &self,
        items: impl ExactSizeIterator<Item = &'a T>,
        args: &ProcessorArgs,
    ) -> Outcome
    where
        T: 'a,
    {
        let total = items.len();
        let mut results = Vec::new();
        let mut errors = Vec::new();

        for (index, item) in items.enumerate() {
            match (self.f)(item, args) {
                Ok(outcome) => results.push(outcome),
                Err(err) => {
                    if let Some(handler) = &self.on_error {
                        handler(index, item, &err, args);
                    }
                    errors.push(Outcome::map([
                        ("item_index", Outcome::from(index)),
                        ("error", Outcome::Text(err.to_string())),
                        ("traceback", Outcome::Text(format!("{:?}", err))),
                    ]));
                }
            }
        }

        let successful = results.len();
        let failed = errors.len();
        Outcome::map([
            ("results", Outcome::List(results)),
            ("errors", Outcome::List(errors)),
            ("total", Outcome::from(total)),
            ("successful", Outcome::from(successful)),
            ("failed", Outcome::from(failed)),
        ])
    }
}

impl<T, F> Processor<Vec<T>> for ItemProcessor<T, F>
where
    T: Send + Sync + 'static,
    F: Fn(&T, &ProcessorArgs) -> anyhow::Result<Outcome> + Send + Sync + 'static,
{
    fn process(&self, unit: &Vec<T>, args: &ProcessorArgs) -> anyhow::Result<Outcome> {
        Ok(self.process_items(unit.iter(), args))
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

impl<F> Processor<Table> for ItemProcessor<Map<String, Value>, F>
where
    F: Fn(&Map<String, Value>, &ProcessorArgs) -> anyhow::Result<Outcome> + Send + Sync + 'static,
{
    fn process(&self, unit: &Table, args: &ProcessorArgs) -> anyhow::Result<Outcome> {
        let records: Vec<Map<String, Value>> = unit.records().collect();
        Ok(self.process_items(records.iter(), args))
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}
