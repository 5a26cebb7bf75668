//! JSON patches against the object as the API server stores it.
//!
//! The typed resource serializes some fields even when the stored object
//! omits them (`sshPublicKey`, `privateIPConfigs`), so a diff of two typed
//! values can `replace` a path the stored object does not have. The typed
//! changes are replayed onto the raw object and the patch is taken from there.

use json_patch::Patch;
use serde_json::{Map, Value};

/// Patch that carries `raw` through the changes between `before` and `after`.
///
/// `before` and `after` are typed views of `raw`. Fields of `raw` they do not
/// model are never touched.
pub fn rebase(raw: &Value, before: &Value, after: &Value) -> serde_json::Result<Patch> {
    let mut target = raw.clone();
    for operation in json_patch::diff(before, after).0 {
        let operation = serde_json::to_value(&operation)?;
        let path = operation
            .get("path")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let tokens = pointer_tokens(path);
        match operation.get("op").and_then(Value::as_str) {
            Some("add" | "replace") => {
                let value = operation.get("value").cloned().unwrap_or(Value::Null);
                set(&mut target, &tokens, value);
            }
            Some("remove") => remove(&mut target, &tokens),
            _ => {}
        }
    }
    Ok(json_patch::diff(raw, &target))
}

/// Unescaped reference tokens of an RFC 6901 pointer.
fn pointer_tokens(pointer: &str) -> Vec<String> {
    pointer
        .split('/')
        .skip(1)
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
        .collect()
}

/// Write `value` at `tokens`, creating missing parent objects.
fn set(doc: &mut Value, tokens: &[String], value: Value) {
    let Some((token, rest)) = tokens.split_first() else {
        *doc = value;
        return;
    };

    if let Value::Array(items) = doc {
        match token.parse::<usize>().ok().filter(|i| *i < items.len()) {
            Some(i) => {
                if let Some(item) = items.get_mut(i) {
                    set(item, rest, value);
                }
            }
            None if rest.is_empty() => items.push(value),
            None => {}
        }
        return;
    }

    if !doc.is_object() {
        *doc = Value::Object(Map::new());
    }
    if let Value::Object(fields) = doc {
        set(
            fields.entry(token.clone()).or_insert(Value::Null),
            rest,
            value,
        );
    }
}

/// Remove the value at `tokens` if it exists.
fn remove(doc: &mut Value, tokens: &[String]) {
    let Some((token, rest)) = tokens.split_first() else {
        return;
    };

    match doc {
        Value::Object(fields) if rest.is_empty() => {
            fields.remove(token);
        }
        Value::Object(fields) => {
            if let Some(child) = fields.get_mut(token) {
                remove(child, rest);
            }
        }
        Value::Array(items) => {
            let Ok(i) = token.parse::<usize>() else {
                return;
            };
            if rest.is_empty() {
                if i < items.len() {
                    items.remove(i);
                }
            } else if let Some(child) = items.get_mut(i) {
                remove(child, rest);
            }
        }
        _ => {}
    }
}
