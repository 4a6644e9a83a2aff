//! Patch operations and documents.

use crate::error::{PatchError, PatchResult};
use crate::pointer::{parse_index, JsonPointer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single JSON Patch operation.
///
/// Serialized in the RFC 6902 form, e.g.
/// `{"op": "replace", "path": "/0/complete", "value": true}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    /// Inserts a value, or replaces an object member.
    Add {
        /// Target location.
        path: JsonPointer,
        /// Value to add.
        value: Value,
    },
    /// Removes the value at the target location.
    Remove {
        /// Target location.
        path: JsonPointer,
    },
    /// Replaces the value at the target location.
    Replace {
        /// Target location.
        path: JsonPointer,
        /// New value.
        value: Value,
    },
    /// Removes the value at `from` and adds it at `path`.
    Move {
        /// Source location.
        from: JsonPointer,
        /// Target location.
        path: JsonPointer,
    },
    /// Adds a copy of the value at `from` to `path`.
    Copy {
        /// Source location.
        from: JsonPointer,
        /// Target location.
        path: JsonPointer,
    },
    /// Checks that the value at `path` equals `value`.
    Test {
        /// Tested location.
        path: JsonPointer,
        /// Expected value.
        value: Value,
    },
}

impl PatchOperation {
    /// Returns the operation name as it appears in the `op` member.
    pub fn name(&self) -> &'static str {
        match self {
            PatchOperation::Add { .. } => "add",
            PatchOperation::Remove { .. } => "remove",
            PatchOperation::Replace { .. } => "replace",
            PatchOperation::Move { .. } => "move",
            PatchOperation::Copy { .. } => "copy",
            PatchOperation::Test { .. } => "test",
        }
    }

    /// Returns the target location.
    pub fn path(&self) -> &JsonPointer {
        match self {
            PatchOperation::Add { path, .. }
            | PatchOperation::Remove { path }
            | PatchOperation::Replace { path, .. }
            | PatchOperation::Move { path, .. }
            | PatchOperation::Copy { path, .. }
            | PatchOperation::Test { path, .. } => path,
        }
    }

    /// Applies this operation to `document` in place.
    ///
    /// On error the document may be partially modified; use
    /// [`Patch::apply`] for all-or-nothing application.
    pub fn apply_to(&self, document: &mut Value) -> PatchResult<()> {
        match self {
            PatchOperation::Add { path, value } => add(document, path, value.clone()),
            PatchOperation::Remove { path } => remove(document, path).map(|_| ()),
            PatchOperation::Replace { path, value } => {
                let target = path
                    .resolve_mut(document)
                    .ok_or_else(|| PatchError::path_not_found(path))?;
                *target = value.clone();
                Ok(())
            }
            PatchOperation::Move { from, path } => {
                if from == path {
                    // Still has to exist.
                    return from
                        .resolve(document)
                        .map(|_| ())
                        .ok_or_else(|| PatchError::path_not_found(from));
                }
                if from.is_proper_prefix_of(path) {
                    return Err(PatchError::MoveIntoChild {
                        from: from.to_string(),
                        path: path.to_string(),
                    });
                }
                let value = remove(document, from)?;
                add(document, path, value)
            }
            PatchOperation::Copy { from, path } => {
                let value = from
                    .resolve(document)
                    .cloned()
                    .ok_or_else(|| PatchError::path_not_found(from))?;
                add(document, path, value)
            }
            PatchOperation::Test { path, value } => match path.resolve(document) {
                Some(actual) if actual == value => Ok(()),
                _ => Err(PatchError::TestFailed {
                    path: path.to_string(),
                }),
            },
        }
    }
}

fn add(document: &mut Value, path: &JsonPointer, value: Value) -> PatchResult<()> {
    let Some((parent_path, token)) = path.split_last() else {
        *document = value;
        return Ok(());
    };
    let parent = parent_path
        .resolve_mut(document)
        .ok_or_else(|| PatchError::path_not_found(&parent_path))?;

    match parent {
        Value::Object(map) => {
            map.insert(token.to_string(), value);
            Ok(())
        }
        Value::Array(items) => {
            let index = if token == "-" {
                items.len()
            } else {
                parse_index(token)
                    .filter(|i| *i <= items.len())
                    .ok_or_else(|| PatchError::InvalidIndex {
                        path: path.to_string(),
                        token: token.to_string(),
                    })?
            };
            items.insert(index, value);
            Ok(())
        }
        _ => Err(PatchError::NotAContainer {
            path: parent_path.to_string(),
        }),
    }
}

fn remove(document: &mut Value, path: &JsonPointer) -> PatchResult<Value> {
    let (parent_path, token) = path.split_last().ok_or(PatchError::RemoveRoot)?;
    let parent = parent_path
        .resolve_mut(document)
        .ok_or_else(|| PatchError::path_not_found(path))?;

    match parent {
        Value::Object(map) => map
            .remove(token)
            .ok_or_else(|| PatchError::path_not_found(path)),
        Value::Array(items) => {
            let index = parse_index(token)
                .filter(|i| *i < items.len())
                .ok_or_else(|| PatchError::InvalidIndex {
                    path: path.to_string(),
                    token: token.to_string(),
                })?;
            Ok(items.remove(index))
        }
        _ => Err(PatchError::NotAContainer {
            path: parent_path.to_string(),
        }),
    }
}

/// A JSON Patch document: an ordered list of operations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Patch {
    operations: Vec<PatchOperation>,
}

impl Patch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a patch from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::Malformed`] if the bytes are not a JSON Patch array.
    pub fn from_slice(bytes: &[u8]) -> PatchResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Returns the operations in order.
    pub fn operations(&self) -> &[PatchOperation] {
        &self.operations
    }

    /// Returns the number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns true if the patch has no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Appends an operation.
    pub fn push(&mut self, operation: PatchOperation) {
        self.operations.push(operation);
    }

    /// Applies the patch to a copy of `document` and returns the result.
    ///
    /// Either every operation succeeds or `document` is left as it was and
    /// the first failure is returned.
    pub fn apply(&self, document: &Value) -> PatchResult<Value> {
        let mut working = document.clone();
        for (index, operation) in self.operations.iter().enumerate() {
            operation
                .apply_to(&mut working)
                .map_err(|source| PatchError::OperationFailed {
                    index,
                    op: operation.name(),
                    source: Box::new(source),
                })?;
        }
        Ok(working)
    }
}

impl From<Vec<PatchOperation>> for Patch {
    fn from(operations: Vec<PatchOperation>) -> Self {
        Self { operations }
    }
}

impl FromIterator<PatchOperation> for Patch {
    fn from_iter<I: IntoIterator<Item = PatchOperation>>(iter: I) -> Self {
        Self {
            operations: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Patch {
    type Item = PatchOperation;
    type IntoIter = std::vec::IntoIter<PatchOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patch(value: Value) -> Patch {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn parses_all_operation_kinds() {
        let p = patch(json!([
            {"op": "add", "path": "/a", "value": 1},
            {"op": "remove", "path": "/a"},
            {"op": "replace", "path": "/b", "value": 2},
            {"op": "move", "from": "/b", "path": "/c"},
            {"op": "copy", "from": "/c", "path": "/d"},
            {"op": "test", "path": "/d", "value": 2}
        ]));
        let names: Vec<_> = p.operations().iter().map(PatchOperation::name).collect();
        assert_eq!(names, ["add", "remove", "replace", "move", "copy", "test"]);
    }

    #[test]
    fn unknown_op_is_malformed() {
        let result = Patch::from_slice(br#"[{"op": "frobnicate", "path": "/a"}]"#);
        assert!(matches!(result, Err(PatchError::Malformed(_))));
    }

    #[test]
    fn missing_value_is_malformed() {
        assert!(Patch::from_slice(br#"[{"op": "add", "path": "/a"}]"#).is_err());
    }

    #[test]
    fn add_appends_and_inserts_into_arrays() {
        let doc = json!([1, 3]);
        let out = patch(json!([
            {"op": "add", "path": "/1", "value": 2},
            {"op": "add", "path": "/-", "value": 4}
        ]))
        .apply(&doc)
        .unwrap();
        assert_eq!(out, json!([1, 2, 3, 4]));
    }

    #[test]
    fn add_past_end_fails() {
        let result = patch(json!([{"op": "add", "path": "/5", "value": 0}])).apply(&json!([]));
        assert!(result.is_err());
    }

    #[test]
    fn add_at_root_replaces_document() {
        let out = patch(json!([{"op": "add", "path": "", "value": {"x": 1}}]))
            .apply(&json!([1, 2]))
            .unwrap();
        assert_eq!(out, json!({"x": 1}));
    }

    #[test]
    fn remove_and_replace() {
        let doc = json!({"a": 1, "b": [1, 2, 3]});
        let out = patch(json!([
            {"op": "remove", "path": "/b/0"},
            {"op": "replace", "path": "/a", "value": "x"}
        ]))
        .apply(&doc)
        .unwrap();
        assert_eq!(out, json!({"a": "x", "b": [2, 3]}));
    }

    #[test]
    fn replace_missing_member_fails() {
        let result = patch(json!([{"op": "replace", "path": "/nope", "value": 1}])).apply(&json!({}));
        assert!(result.is_err());
    }

    #[test]
    fn remove_root_fails() {
        let result = patch(json!([{"op": "remove", "path": ""}])).apply(&json!({}));
        assert!(matches!(
            result,
            Err(PatchError::OperationFailed { source, .. }) if matches!(*source, PatchError::RemoveRoot)
        ));
    }

    #[test]
    fn move_between_array_slots() {
        let out = patch(json!([{"op": "move", "from": "/0", "path": "/2"}]))
            .apply(&json!(["a", "b", "c"]))
            .unwrap();
        assert_eq!(out, json!(["b", "c", "a"]));
    }

    #[test]
    fn move_into_own_child_fails() {
        let result = patch(json!([{"op": "move", "from": "/a", "path": "/a/b"}]))
            .apply(&json!({"a": {}}));
        assert!(result.is_err());
    }

    #[test]
    fn copy_duplicates_value() {
        let out = patch(json!([{"op": "copy", "from": "/0", "path": "/-"}]))
            .apply(&json!([{"id": 1}]))
            .unwrap();
        assert_eq!(out, json!([{"id": 1}, {"id": 1}]));
    }

    #[test]
    fn failing_test_leaves_document_unchanged() {
        let doc = json!([{"id": 1, "complete": false}]);
        let p = patch(json!([
            {"op": "replace", "path": "/0/complete", "value": true},
            {"op": "test", "path": "/0/id", "value": 2}
        ]));

        let err = p.apply(&doc).unwrap_err();
        assert!(err.is_test_failure());
        assert!(matches!(err, PatchError::OperationFailed { index: 1, op: "test", .. }));
        assert_eq!(doc, json!([{"id": 1, "complete": false}]));
    }

    #[test]
    fn serializes_in_rfc_form() {
        let p: Patch = vec![PatchOperation::Remove {
            path: JsonPointer::root().child("0"),
        }]
        .into();
        assert_eq!(
            serde_json::to_value(&p).unwrap(),
            json!([{"op": "remove", "path": "/0"}])
        );
    }
}
