//! [`FakeRemote`]: an in-memory [`RemoteClient`] for engine tests.
//!
//! Collections are addressed the way the real API addresses them:
//! `<collection>/` for the listing (and for creation), `<collection>/<alias>`
//! for a single item. Every call is logged so tests can assert on the exact
//! request sequence.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use serde_json::{Map, Value, json};
use solsync_core::{Method, RemoteClient, RemoteError, RemoteResult};

#[derive(Default)]
struct State {
    /// collection -> items in insertion (server) order
    collections: BTreeMap<String, Vec<Map<String, Value>>>,
    requests: Vec<(Method, String)>,
    failures: HashMap<(Method, String), RemoteError>,
    stamp: Option<String>,
    bare_listing: bool,
}

/// In-memory solution API
///
/// # Example
///
/// ```rust,no_run
/// use serde_json::json;
/// use solsync_core::Method;
/// use solsync_test_utils::FakeRemote;
///
/// let remote = FakeRemote::new();
/// remote.insert("library", json!({"alias": "sol_util", "name": "util", "script": "return 1"}));
/// assert_eq!(remote.count(Method::Get), 0);
/// ```
#[derive(Default)]
pub struct FakeRemote {
    state: Mutex<State>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp every created or updated item with this `updated_at` text.
    pub fn with_updated_at(self, stamp: &str) -> Self {
        self.state.lock().unwrap().stamp = Some(stamp.to_string());
        self
    }

    /// Answer listings with a bare JSON array instead of `{"items": [...]}`.
    pub fn with_bare_listing(self) -> Self {
        self.state.lock().unwrap().bare_listing = true;
        self
    }

    /// Seed an item; it must be a JSON object.
    pub fn insert(&self, collection: &str, item: Value) {
        let Value::Object(fields) = item else {
            panic!("FakeRemote::insert: item must be an object, got {item}");
        };
        self.state
            .lock()
            .unwrap()
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(fields);
    }

    /// Make every `method` call on `path` fail with `error`.
    pub fn fail(&self, method: Method, path: &str, error: RemoteError) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert((method, path.to_string()), error);
    }

    /// Every call made so far, in order.
    pub fn requests(&self) -> Vec<(Method, String)> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Number of calls made with `method`.
    pub fn count(&self, method: Method) -> usize {
        self.requests().iter().filter(|(m, _)| *m == method).count()
    }

    /// Current state of one item, if it exists.
    pub fn item(&self, collection: &str, alias: &str) -> Option<Value> {
        let state = self.state.lock().unwrap();
        find(&state, collection, alias).map(|i| Value::Object(state.collections[collection][i].clone()))
    }

    /// Current items of a collection, in server order.
    pub fn items(&self, collection: &str) -> Vec<Value> {
        let state = self.state.lock().unwrap();
        state
            .collections
            .get(collection)
            .map(|items| items.iter().cloned().map(Value::Object).collect())
            .unwrap_or_default()
    }

    fn call(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
    ) -> RemoteResult<Value> {
        let mut state = self.state.lock().unwrap();
        state.requests.push((method, path.to_string()));
        if let Some(error) = state.failures.get(&(method, path.to_string())) {
            return Err(error.clone());
        }

        let not_found = || RemoteError::NotFound {
            path: path.to_string(),
        };
        let (collection, alias) = path.split_once('/').ok_or_else(not_found)?;

        match (method, alias) {
            (Method::Get, "") => {
                let items: Vec<Value> = state
                    .collections
                    .get(collection)
                    .map(|items| items.iter().cloned().map(Value::Object).collect())
                    .unwrap_or_default();
                if state.bare_listing {
                    Ok(Value::Array(items))
                } else {
                    Ok(json!({ "items": items }))
                }
            }
            (Method::Get, alias) => {
                let index = find(&state, collection, alias).ok_or_else(not_found)?;
                Ok(Value::Object(state.collections[collection][index].clone()))
            }
            (Method::Put, alias) => {
                let index = find(&state, collection, alias).ok_or_else(not_found)?;
                let stamp = state.stamp.clone();
                let item = &mut state.collections.get_mut(collection).ok_or_else(not_found)?[index];
                merge_payload(item, payload, stamp);
                Ok(Value::Object(item.clone()))
            }
            (Method::Post, "") => {
                let mut item = Map::new();
                let stamp = state.stamp.clone();
                merge_payload(&mut item, payload, stamp);
                let alias = derive_alias(&item);
                item.insert("alias".into(), Value::String(alias));
                state
                    .collections
                    .entry(collection.to_string())
                    .or_default()
                    .push(item.clone());
                Ok(Value::Object(item))
            }
            (Method::Delete, alias) if !alias.is_empty() => {
                let index = find(&state, collection, alias).ok_or_else(not_found)?;
                if let Some(items) = state.collections.get_mut(collection) {
                    items.remove(index);
                }
                Ok(Value::Null)
            }
            _ => Err(not_found()),
        }
    }
}

fn find(state: &State, collection: &str, alias: &str) -> Option<usize> {
    state
        .collections
        .get(collection)?
        .iter()
        .position(|item| item.get("alias").and_then(Value::as_str) == Some(alias))
}

fn merge_payload(item: &mut Map<String, Value>, payload: Option<&Value>, stamp: Option<String>) {
    if let Some(Value::Object(fields)) = payload {
        for (k, v) in fields {
            item.insert(k.clone(), v.clone());
        }
    }
    if let Some(stamp) = stamp {
        item.insert("updated_at".into(), Value::String(stamp));
    }
}

/// The alias the server assigns on creation: `<sid>_<name>` or
/// `<sid>_<service>_<event>`.
fn derive_alias(item: &Map<String, Value>) -> String {
    let text = |k: &str| item.get(k).and_then(Value::as_str).unwrap_or_default();
    if item.contains_key("name") {
        format!("{}_{}", text("solution_id"), text("name"))
    } else {
        format!("{}_{}_{}", text("solution_id"), text("service"), text("event"))
    }
}

impl RemoteClient for FakeRemote {
    fn get(&self, path: &str) -> RemoteResult<Value> {
        self.call(Method::Get, path, None)
    }

    fn put(&self, path: &str, payload: &Value) -> RemoteResult<Value> {
        self.call(Method::Put, path, Some(payload))
    }

    fn post(&self, path: &str, payload: &Value) -> RemoteResult<Value> {
        self.call(Method::Post, path, Some(payload))
    }

    fn delete(&self, path: &str) -> RemoteResult<Value> {
        self.call(Method::Delete, path, None)
    }
}
