use std::collections::HashMap;

use crate::collection::{Collection, Document};
use crate::common::{compare_values, Value, DOC_ID};
use crate::errors::{ErrorKind, JsonDbError, JsonDbResult};
use crate::query::{Condition, LogicalOperator, Projection, Query, Row};

/// Runs a parsed query against a set of collections.
///
/// The source collection is scanned in full under its read lock; indexes
/// are not consulted. Rows come back in the backend's enumeration order,
/// after `offset` and `limit` are applied.
///
/// # Errors
/// * `NotFound` if the collection does not exist
/// * any storage error raised while listing the collection
pub fn execute_query(
    query: &Query,
    collections: &HashMap<String, Collection>,
) -> JsonDbResult<Vec<Row>> {
    let collection = match collections.get(&query.collection) {
        Some(collection) => collection,
        None => {
            log::error!("Collection {} not found", query.collection);
            return Err(JsonDbError::new(
                &format!("Collection {} not found", query.collection),
                ErrorKind::NotFound,
            ));
        }
    };

    let mut rows: Vec<Row> = collection
        .list_documents()?
        .iter()
        .filter(|document| match &query.condition {
            Some(condition) => evaluate(condition, document),
            None => true,
        })
        .map(|document| project(&query.projection, document))
        .collect();

    // an offset at or past the end leaves the rows untouched
    if query.offset > 0 && query.offset < rows.len() {
        rows.drain(..query.offset);
    }

    if let Some(limit) = query.limit {
        rows.truncate(limit);
    }

    log::debug!("{} returned {} rows", query, rows.len());
    Ok(rows)
}

/// Evaluates a condition tree against a document.
///
/// A comparison on a field the document does not have is false. `And` and
/// `Or` short-circuit left to right.
pub fn evaluate(condition: &Condition, document: &Document) -> bool {
    match condition {
        Condition::Comparison {
            field,
            operator,
            value,
        } => match document.field_value(field) {
            Some(actual) => operator.accepts(compare_values(&actual, value)),
            None => false,
        },
        Condition::Logical {
            operator: LogicalOperator::And,
            children,
        } => children.iter().all(|child| evaluate(child, document)),
        Condition::Logical {
            operator: LogicalOperator::Or,
            children,
        } => children.iter().any(|child| evaluate(child, document)),
    }
}

/// Builds the result row of a document.
pub fn project(projection: &Projection, document: &Document) -> Row {
    match projection {
        Projection::All => document.to_row(),
        Projection::Fields(fields) => {
            let mut row = Row::with_capacity(fields.len());
            for field in fields {
                if field == DOC_ID {
                    row.insert(DOC_ID.to_string(), Value::String(document.id().to_string()));
                } else if let Some(value) = document.get(field) {
                    row.insert(field.clone(), value.clone());
                }
            }
            row
        }
    }
}
