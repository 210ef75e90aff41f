use once_cell::sync::Lazy;
use regex::Regex;

use crate::common::Value;
use crate::errors::{ErrorKind, JsonDbError, JsonDbResult};
use crate::query::{Condition, LogicalOperator, Operator, Projection, Query};

static SELECT_CLAUSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)SELECT\s+(.*?)\s+FROM").unwrap());
static FROM_CLAUSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)FROM\s+(.*?)(\s+WHERE|\s+LIMIT|\s+OFFSET|$)").unwrap());
static WHERE_CLAUSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)WHERE\s+(.*?)(\s+LIMIT|\s+OFFSET|$)").unwrap());
static LIMIT_CLAUSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)LIMIT\s+(\d+)").unwrap());
static OFFSET_CLAUSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)OFFSET\s+(\d+)").unwrap());
static AND_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i) AND ").unwrap());
static OR_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i) OR ").unwrap());

/// Parses query text into a [Query].
///
/// Grammar, keywords case-insensitive:
///
/// ```text
/// SELECT <field, field, ... | *> FROM <collection> [WHERE <condition>] [LIMIT <n>] [OFFSET <n>]
/// ```
///
/// A condition is split on ` AND ` first, then on ` OR `; a part without
/// either is a comparison `field <op> literal` with `op` one of
/// `>=`, `<=`, `!=`, `>`, `<`, `=`. Literals are `'strings'`, `true`/`false`,
/// decimals (anything containing `.`) and integers.
///
/// # Errors
/// Returns `InvalidArgument` with a descriptive message for any text that
/// does not follow the grammar.
///
/// # Examples
///
/// ```rust
/// use jsondb::query::{parse_query, Projection};
///
/// let query = parse_query("SELECT name, email FROM users WHERE active = true LIMIT 10").unwrap();
/// assert_eq!(query.collection, "users");
/// assert_eq!(query.projection, Projection::Fields(vec!["name".into(), "email".into()]));
/// assert_eq!(query.limit, Some(10));
/// ```
pub fn parse_query(text: &str) -> JsonDbResult<Query> {
    let fields = match SELECT_CLAUSE.captures(text) {
        Some(captures) => captures.get(1).map_or("", |m| m.as_str()),
        None => return Err(invalid("Invalid SELECT clause", text)),
    };
    let projection = parse_projection(fields, text)?;

    let collection = match FROM_CLAUSE.captures(text) {
        Some(captures) => captures.get(1).map_or("", |m| m.as_str()).trim(),
        None => return Err(invalid("Invalid FROM clause", text)),
    };
    if collection.is_empty() {
        return Err(invalid("Missing collection name", text));
    }

    let condition = match WHERE_CLAUSE.captures(text) {
        Some(captures) => Some(parse_condition(
            captures.get(1).map_or("", |m| m.as_str()),
        )?),
        None => None,
    };

    let limit = match LIMIT_CLAUSE.captures(text) {
        Some(captures) => Some(parse_count("LIMIT", captures.get(1).map_or("", |m| m.as_str()))?),
        None => None,
    };

    let offset = match OFFSET_CLAUSE.captures(text) {
        Some(captures) => parse_count("OFFSET", captures.get(1).map_or("", |m| m.as_str()))?,
        None => 0,
    };

    Ok(Query {
        projection,
        collection: collection.to_string(),
        condition,
        limit,
        offset,
    })
}

/// Parses the text of a WHERE clause into a condition tree.
pub fn parse_condition(text: &str) -> JsonDbResult<Condition> {
    if let Some(children) = split_logical(&AND_SEPARATOR, text)? {
        return Ok(Condition::Logical {
            operator: LogicalOperator::And,
            children,
        });
    }

    if let Some(children) = split_logical(&OR_SEPARATOR, text)? {
        return Ok(Condition::Logical {
            operator: LogicalOperator::Or,
            children,
        });
    }

    for operator in Operator::SEARCH_ORDER {
        let symbol = operator.symbol();
        if let Some(position) = text.find(symbol) {
            let field = text[..position].trim();
            let literal = text[position + symbol.len()..].trim();
            if field.is_empty() {
                return Err(invalid("Missing field name in condition", text));
            }

            return Ok(Condition::Comparison {
                field: field.to_string(),
                operator,
                value: parse_literal(literal)?,
            });
        }
    }

    Err(invalid("Condition has no comparison operator", text))
}

/// Types a literal by its spelling.
pub fn parse_literal(text: &str) -> JsonDbResult<Value> {
    if text.len() >= 2 && text.starts_with('\'') && text.ends_with('\'') {
        return Ok(Value::String(text[1..text.len() - 1].to_string()));
    }

    if text.eq_ignore_ascii_case("true") {
        return Ok(Value::Bool(true));
    }
    if text.eq_ignore_ascii_case("false") {
        return Ok(Value::Bool(false));
    }

    if text.contains('.') {
        return match text.parse::<f64>() {
            Ok(value) => Ok(Value::Float(value)),
            Err(_) => Err(invalid("Malformed decimal literal", text)),
        };
    }

    match text.parse::<i64>() {
        Ok(value) => Ok(Value::Integer(value)),
        Err(_) => Err(invalid("Malformed integer literal", text)),
    }
}

fn parse_projection(fields: &str, text: &str) -> JsonDbResult<Projection> {
    let fields: Vec<String> = fields
        .split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(String::from)
        .collect();

    match fields.as_slice() {
        [] => Err(invalid("Empty field list", text)),
        [wildcard] if wildcard == "*" => Ok(Projection::All),
        _ => Ok(Projection::Fields(fields)),
    }
}

fn split_logical(separator: &Regex, text: &str) -> JsonDbResult<Option<Vec<Condition>>> {
    if !separator.is_match(text) {
        return Ok(None);
    }

    let children = separator
        .split(text)
        .map(parse_condition)
        .collect::<JsonDbResult<Vec<_>>>()?;
    Ok(Some(children))
}

fn parse_count(clause: &str, digits: &str) -> JsonDbResult<usize> {
    match digits.parse::<usize>() {
        Ok(count) => Ok(count),
        Err(err) => {
            log::error!("{} value {} is out of range: {}", clause, digits, err);
            Err(JsonDbError::new(
                &format!("{} value {} is out of range: {}", clause, digits, err),
                ErrorKind::InvalidArgument,
            ))
        }
    }
}

fn invalid(reason: &str, text: &str) -> JsonDbError {
    log::error!("{}: {}", reason, text);
    JsonDbError::new(&format!("{}: {}", reason, text), ErrorKind::InvalidArgument)
}
