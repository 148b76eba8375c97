//! The `Record` trait and field-level access.
//!
//! A session is generic over the record type it browses. The only things
//! it needs from a record are its identity, a way to produce blank
//! records, and access to fields by name when the name is supplied at
//! runtime (for example by a form bound to a column).
//!
//! Field access defaults to the record's serde representation: a struct
//! deriving `Serialize`/`Deserialize` declares its field set statically,
//! and a runtime key that is not part of that set is rejected with
//! [`FieldError::Unknown`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Debug;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Errors raised when reading or writing a record field by name.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FieldError {
    #[error("Unknown field '{field}'")]
    Unknown { field: String },

    #[error("Invalid value for field '{field}': {message}")]
    InvalidValue { field: String, message: String },

    #[error("Record does not serialize as an object with named fields")]
    NotAnObject,
}

/// A record that can be browsed and edited by a session.
///
/// # Example
///
/// ```rust
/// use datasource::core::Record;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
/// struct Customer {
///     id: Option<u64>,
///     name: String,
/// }
///
/// impl Record for Customer {
///     type Id = u64;
///
///     fn id(&self) -> Option<u64> {
///         self.id
///     }
/// }
///
/// let mut customer = Customer { id: Some(7), name: "Ada".into() };
/// customer.set_field("name", "Grace".into()).unwrap();
/// assert_eq!(customer.name, "Grace");
/// assert!(customer.set_field("email", "x".into()).is_err());
/// ```
pub trait Record:
    Clone + PartialEq + Debug + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Opaque, comparable identity.
    type Id: Clone + PartialEq + Debug + Send + Sync + 'static;

    /// Identity of the record, absent until the adapter has persisted it.
    fn id(&self) -> Option<Self::Id>;

    /// A record with no values, used when there is nothing to derive from.
    fn empty() -> Self {
        Self::default()
    }

    /// A record with the same field set as `self` and every value cleared.
    fn cleared(&self) -> Self {
        Self::default()
    }

    /// Names of the fields this record carries.
    fn field_names(&self) -> Vec<String> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Check if `field` is a member of this record's shape.
    fn has_field(&self, field: &str) -> bool {
        self.field_names().iter().any(|name| name == field)
    }

    /// Overwrite a single field.
    ///
    /// Leaves the record untouched on error.
    fn set_field(&mut self, field: &str, value: Value) -> Result<(), FieldError> {
        let mut map = match serde_json::to_value(&*self) {
            Ok(Value::Object(map)) => map,
            _ => return Err(FieldError::NotAnObject),
        };
        if !map.contains_key(field) {
            return Err(FieldError::Unknown {
                field: field.to_string(),
            });
        }
        map.insert(field.to_string(), value);
        *self = serde_json::from_value(Value::Object(map)).map_err(|e| {
            FieldError::InvalidValue {
                field: field.to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(())
    }
}

/// Check that every name in `fields` is a member of `record`'s shape.
///
/// Accumulates ALL unknown names instead of stopping at the first.
pub fn validate_fields<R, I, K>(record: &R, fields: I) -> Validation<(), NonEmptyVec<FieldError>>
where
    R: Record,
    I: IntoIterator<Item = K>,
    K: AsRef<str>,
{
    let known = record.field_names();
    let checks: Vec<Validation<(), NonEmptyVec<FieldError>>> = fields
        .into_iter()
        .map(|field| {
            let field = field.as_ref();
            if known.iter().any(|name| name == field) {
                Validation::success(())
            } else {
                Validation::fail(FieldError::Unknown {
                    field: field.to_string(),
                })
            }
        })
        .collect();

    Validation::all_vec(checks).map(|_| ())
}

/// Map-backed record whose shape is only known at runtime.
///
/// Its identity is the value under the `"id"` key. Clearing keeps every
/// key and sets its value to `null`.
///
/// # Example
///
/// ```rust
/// use datasource::core::{DynRecord, Record};
/// use serde_json::{json, Value};
///
/// let record = DynRecord::new().with("id", 1).with("name", "Ada");
/// assert_eq!(record.id(), Some(json!(1)));
///
/// let blank = record.cleared();
/// assert_eq!(blank.field_names(), record.field_names());
/// assert_eq!(blank.get("name"), Some(&Value::Null));
/// ```
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DynRecord {
    fields: Map<String, Value>,
}

impl DynRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a field, builder style.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl From<Map<String, Value>> for DynRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl Record for DynRecord {
    type Id = Value;

    fn id(&self) -> Option<Value> {
        self.fields.get("id").filter(|v| !v.is_null()).cloned()
    }

    fn cleared(&self) -> Self {
        let fields = self
            .fields
            .keys()
            .map(|key| (key.clone(), Value::Null))
            .collect();
        Self { fields }
    }

    fn field_names(&self) -> Vec<String> {
        self.fields.keys().cloned().collect()
    }

    fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    fn set_field(&mut self, field: &str, value: Value) -> Result<(), FieldError> {
        match self.fields.get_mut(field) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(FieldError::Unknown {
                field: field.to_string(),
            }),
        }
    }
}
