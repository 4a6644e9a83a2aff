//! Computing patches between two documents.

use crate::operation::{Patch, PatchOperation};
use crate::pointer::JsonPointer;
use serde_json::Value;

/// Computes a patch that turns `from` into `to`.
///
/// Applying the result to `from` always yields `to`. Objects are compared
/// member by member (removals first, then changes and additions in key
/// order). Arrays are compared slot by slot over their common prefix, then
/// trimmed from the end or extended. Anything else that differs is replaced
/// wholesale. Equal documents produce an empty patch.
pub fn diff(from: &Value, to: &Value) -> Patch {
    let mut patch = Patch::new();
    diff_into(&JsonPointer::root(), from, to, &mut patch);
    patch
}

fn diff_into(path: &JsonPointer, from: &Value, to: &Value, out: &mut Patch) {
    if from == to {
        return;
    }

    match (from, to) {
        (Value::Object(old), Value::Object(new)) => {
            for key in old.keys().filter(|k| !new.contains_key(*k)) {
                out.push(PatchOperation::Remove {
                    path: path.child(key.as_str()),
                });
            }
            for (key, new_value) in new {
                match old.get(key) {
                    Some(old_value) => diff_into(&path.child(key.as_str()), old_value, new_value, out),
                    None => out.push(PatchOperation::Add {
                        path: path.child(key.as_str()),
                        value: new_value.clone(),
                    }),
                }
            }
        }
        (Value::Array(old), Value::Array(new)) => {
            let common = old.len().min(new.len());
            for (index, (old_value, new_value)) in old.iter().zip(new.iter()).enumerate() {
                diff_into(&path.child(index.to_string()), old_value, new_value, out);
            }
            // Trailing removals go from the end so earlier indices stay valid.
            for index in (common..old.len()).rev() {
                out.push(PatchOperation::Remove {
                    path: path.child(index.to_string()),
                });
            }
            for (index, value) in new.iter().enumerate().skip(common) {
                out.push(PatchOperation::Add {
                    path: path.child(index.to_string()),
                    value: value.clone(),
                });
            }
        }
        _ => out.push(PatchOperation::Replace {
            path: path.clone(),
            value: to.clone(),
        }),
    }
}
