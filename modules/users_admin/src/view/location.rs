//! Shared URL query-string state.
//!
//! Both the list controller and the action workflow write into the same
//! location. Every write goes through [`Location::update`], which applies the
//! caller's edits to the *current* parameters under one lock, so writers only
//! touch their own keys and never clobber each other's.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Query-string keys used by the users page.
pub mod keys {
    pub const PAGE: &str = "page";
    pub const QUERY: &str = "query";
    pub const STATUS: &str = "status";
    pub const USER_ID: &str = "userId";
    pub const ACTION: &str = "action";
}

#[derive(Clone, Default)]
pub struct Location {
    params: Arc<Mutex<Vec<(String, String)>>>,
    writes: Arc<AtomicU64>,
}

impl Location {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string, with or without the leading `?`.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let params = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        Self {
            params: Arc::new(Mutex::new(params)),
            writes: Arc::default(),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.params
            .lock()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    pub fn params(&self) -> Vec<(String, String)> {
        self.params.lock().clone()
    }

    /// Serialized form without the leading `?`; empty when no parameters are set.
    pub fn query_string(&self) -> String {
        let params = self.params.lock();
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params.iter())
            .finish()
    }

    /// Number of committed writes. Reads never bump it.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Merge-on-write: `edit` sees the latest parameters and changes only
    /// the keys it names.
    pub fn update<F>(&self, edit: F)
    where
        F: FnOnce(&mut ParamsEdit<'_>),
    {
        let mut params = self.params.lock();
        edit(&mut ParamsEdit {
            params: &mut params,
        });
        self.writes.fetch_add(1, Ordering::Relaxed);
    }
}

impl std::fmt::Debug for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Location").field(&self.query_string()).finish()
    }
}

pub struct ParamsEdit<'a> {
    params: &'a mut Vec<(String, String)>,
}

impl ParamsEdit<'_> {
    /// Replace the first occurrence of `key` in place (dropping duplicates), or append it.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.params.iter().position(|(k, _)| k == key) {
            Some(first) => {
                self.params[first].1 = value;
                let mut idx = 0;
                self.params.retain(|(k, _)| {
                    let keep = k != key || idx == first;
                    idx += 1;
                    keep
                });
            }
            None => self.params.push((key.to_string(), value)),
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.params.retain(|(k, _)| k != key);
    }

    /// `Some` sets the key, `None` deletes it.
    pub fn set_or_remove(&mut self, key: &str, value: Option<String>) {
        match value {
            Some(v) => self.set(key, v),
            None => self.remove(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_leading_question_mark() {
        let loc = Location::parse("?page=2&query=john%20s");
        assert_eq!(loc.get(keys::PAGE).as_deref(), Some("2"));
        assert_eq!(loc.get(keys::QUERY).as_deref(), Some("john s"));
        assert_eq!(loc.get(keys::STATUS), None);
    }

    #[test]
    fn update_keeps_foreign_keys_and_order() {
        let loc = Location::parse("tab=users&page=3");
        loc.update(|p| {
            p.set(keys::PAGE, "4");
            p.set(keys::STATUS, "active");
        });
        assert_eq!(loc.query_string(), "tab=users&page=4&status=active");

        loc.update(|p| p.set_or_remove(keys::PAGE, None));
        assert_eq!(loc.query_string(), "tab=users&status=active");
        assert_eq!(loc.write_count(), 2);
    }

    #[test]
    fn writers_sharing_a_location_compose() {
        let list_side = Location::parse("page=2");
        let modal_side = list_side.clone();

        modal_side.update(|p| {
            p.set(keys::USER_ID, "user-5");
            p.set(keys::ACTION, "edit");
        });
        list_side.update(|p| p.set(keys::PAGE, "3"));

        assert_eq!(modal_side.query_string(), "page=3&userId=user-5&action=edit");
    }

    #[test]
    fn duplicate_keys_collapse_on_set() {
        let loc = Location::parse("page=1&page=2");
        loc.update(|p| p.set(keys::PAGE, "5"));
        assert_eq!(loc.query_string(), "page=5");
    }
}
