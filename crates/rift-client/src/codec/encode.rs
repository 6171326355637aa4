//! Wire encoding of the operator-keyed types.
//!
//! Predicates and responses go out as a single-key object keyed by the
//! operator or response type. Modifiers and behaviors are merged into the
//! same object, next to that key.

use super::envelope::{KEY_BEHAVIORS, KEY_CASE_SENSITIVE, KEY_EXCEPT, KEY_JSONPATH, KEY_XPATH};
use crate::model::{Operation, Predicate, Response, ResponseKind};
use serde::ser::{Serialize, SerializeMap, Serializer};

impl<R: Serialize> Serialize for Predicate<R> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        let key = self.operator();
        match &self.operation {
            Operation::Compare { request, .. } => map.serialize_entry(key, request)?,
            Operation::Exists(fields) => map.serialize_entry(key, fields)?,
            Operation::And(children) | Operation::Or(children) => {
                map.serialize_entry(key, children)?
            }
            Operation::Not(child) => map.serialize_entry(key, child)?,
            Operation::Inject(script) => map.serialize_entry(key, script)?,
        }
        // caseSensitive defaults to false on the server
        if self.case_sensitive {
            map.serialize_entry(KEY_CASE_SENSITIVE, &true)?;
        }
        if let Some(except) = &self.except {
            map.serialize_entry(KEY_EXCEPT, except)?;
        }
        if let Some(json_path) = &self.json_path {
            map.serialize_entry(KEY_JSONPATH, json_path)?;
        }
        if let Some(xpath) = &self.xpath {
            map.serialize_entry(KEY_XPATH, xpath)?;
        }
        map.end()
    }
}

impl<P: Serialize> Serialize for Response<P> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        let key = self.type_name();
        match &self.kind {
            ResponseKind::Is(payload) => map.serialize_entry(key, payload)?,
            ResponseKind::Proxy(proxy) => map.serialize_entry(key, proxy)?,
            ResponseKind::Inject(script) | ResponseKind::Fault(script) => {
                map.serialize_entry(key, script)?
            }
        }
        if let Some(behaviors) = &self.behaviors {
            map.serialize_entry(KEY_BEHAVIORS, behaviors)?;
        }
        map.end()
    }
}
