//! Appwrite list-documents query builder.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

/// A single list-documents query clause.
///
/// Serialized as the JSON query strings accepted by Appwrite 1.5+
/// (`queries[]={"method":"equal",...}`).
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// `attribute` equals any of `values`.
    Equal {
        /// Attribute name.
        attribute: String,
        /// Accepted values.
        values: Vec<Value>,
    },
    /// Order by `attribute`, highest first.
    OrderDesc(String),
    /// Return at most this many documents.
    Limit(u32),
}

/// Wire representation of a query clause.
#[derive(Serialize)]
struct QueryRepr<'a> {
    method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    attribute: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    values: Option<Vec<Value>>,
}

impl Query {
    /// Exact-match clause on a single value.
    #[must_use]
    pub fn equal(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Equal {
            attribute: attribute.into(),
            values: vec![value.into()],
        }
    }

    /// Descending order clause.
    #[must_use]
    pub fn order_desc(attribute: impl Into<String>) -> Self {
        Self::OrderDesc(attribute.into())
    }

    /// Limit clause.
    #[must_use]
    pub const fn limit(limit: u32) -> Self {
        Self::Limit(limit)
    }

    /// Serializes the clause to its JSON query string.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn to_query_string(&self) -> Result<String> {
        let repr = match self {
            Self::Equal { attribute, values } => QueryRepr {
                method: "equal",
                attribute: Some(attribute),
                values: Some(values.clone()),
            },
            Self::OrderDesc(attribute) => QueryRepr {
                method: "orderDesc",
                attribute: Some(attribute),
                values: None,
            },
            Self::Limit(limit) => QueryRepr {
                method: "limit",
                attribute: None,
                values: Some(vec![Value::from(*limit)]),
            },
        };
        serde_json::to_string(&repr).context("failed to serialize query")
    }
}
