//! JSON documents of unbounded depth
//!
//! A tree built from sorted input is a chain, and its JSON form nests one
//! object per value. `serde_json::Value` clones, drops, encodes and decodes
//! by native recursion, so documents here go through [`TreeJson`] and the
//! stack-growing [`to_string`] / [`from_str`] instead.

use std::mem;
use std::ops::Deref;

use serde::de::DeserializeOwned;
use serde::ser::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter};
use serde_json::{Map, Value as Json};

/// Owned JSON document that may nest deeper than the call stack.
///
/// Clone and drop are iterative. Encoding it with plain `serde_json`
/// entry points still recurses; use the functions of this module.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreeJson(Json);

impl TreeJson {
    pub fn null() -> Self {
        Self(Json::Null)
    }

    /// Take the document out. The caller becomes responsible for dropping
    /// it with [`dispose`].
    pub fn into_inner(mut self) -> Json {
        mem::take(&mut self.0)
    }
}

impl From<Json> for TreeJson {
    fn from(value: Json) -> Self {
        Self(value)
    }
}

impl Deref for TreeJson {
    type Target = Json;

    fn deref(&self) -> &Json {
        &self.0
    }
}

impl PartialEq<Json> for TreeJson {
    fn eq(&self, other: &Json) -> bool {
        self.0 == *other
    }
}

impl Clone for TreeJson {
    fn clone(&self) -> Self {
        Self(clone_deep(&self.0))
    }
}

impl Drop for TreeJson {
    fn drop(&mut self) {
        dispose(mem::take(&mut self.0));
    }
}

/// Drop a value without recursing into nested containers.
pub fn dispose(value: Json) {
    let mut stack = vec![value];
    while let Some(value) = stack.pop() {
        match value {
            Json::Array(items) => stack.extend(items),
            Json::Object(map) => stack.extend(map.into_iter().map(|(_, v)| v)),
            _ => {}
        }
    }
}

fn clone_deep(value: &Json) -> Json {
    enum Step<'a> {
        Visit(&'a Json),
        Array(usize),
        Object(Vec<&'a String>),
    }

    let mut steps = vec![Step::Visit(value)];
    let mut built: Vec<Json> = Vec::new();
    while let Some(step) = steps.pop() {
        match step {
            Step::Visit(Json::Array(items)) => {
                steps.push(Step::Array(items.len()));
                steps.extend(items.iter().rev().map(Step::Visit));
            }
            Step::Visit(Json::Object(map)) => {
                steps.push(Step::Object(map.keys().collect()));
                steps.extend(map.values().rev().map(Step::Visit));
            }
            Step::Visit(scalar) => built.push(scalar.clone()),
            Step::Array(len) => {
                let items = built.split_off(built.len() - len);
                built.push(Json::Array(items));
            }
            Step::Object(keys) => {
                let values = built.split_off(built.len() - keys.len());
                let map: Map<String, Json> = keys.into_iter().cloned().zip(values).collect();
                built.push(Json::Object(map));
            }
        }
    }
    built.pop().unwrap_or(Json::Null)
}

/// Encode `value` as compact JSON, growing the stack as nesting requires.
pub fn to_string<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    encode(value, CompactFormatter)
}

/// Like [`to_string`], indented. Output grows with depth times nesting.
pub fn to_string_pretty<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    encode(value, PrettyFormatter::new())
}

fn encode<T, F>(value: &T, formatter: F) -> serde_json::Result<String>
where
    T: Serialize + ?Sized,
    F: Formatter,
{
    let mut out = Vec::with_capacity(128);
    {
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        value.serialize(serde_stacker::Serializer::new(&mut ser))?;
    }
    String::from_utf8(out).map_err(serde_json::Error::custom)
}

/// Parse JSON of any depth.
pub fn from_str<T: DeserializeOwned>(text: &str) -> serde_json::Result<T> {
    let mut de = serde_json::Deserializer::from_str(text);
    de.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}
