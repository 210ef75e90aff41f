use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use indexmap::IndexMap;
use itertools::Itertools;

use crate::common::Value;

/// A query result row: field name to value, in projection order.
pub type Row = IndexMap<String, Value>;

/// The selected fields of a query.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// `*`: the identifier followed by every content field.
    All,
    /// An explicit field list; `_id` may appear in it.
    Fields(Vec<String>),
}

/// A comparison operator of a leaf condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Operator {
    /// Operator symbols in the order the parser looks for them.
    pub const SEARCH_ORDER: [Operator; 6] = [
        Operator::Gte,
        Operator::Lte,
        Operator::Ne,
        Operator::Gt,
        Operator::Lt,
        Operator::Eq,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
        }
    }

    /// Whether an ordering between a field value and a literal satisfies the operator.
    pub fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Ne => ordering != Ordering::Equal,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Gte => ordering != Ordering::Less,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Lte => ordering != Ordering::Greater,
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

impl Display for LogicalOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogicalOperator::And => write!(f, "AND"),
            LogicalOperator::Or => write!(f, "OR"),
        }
    }
}

/// A node of the WHERE clause tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `field <operator> literal`
    Comparison {
        field: String,
        operator: Operator,
        value: Value,
    },
    /// All (`And`) or any (`Or`) of the children must pass.
    Logical {
        operator: LogicalOperator,
        children: Vec<Condition>,
    },
}

impl Condition {
    pub fn comparison(field: &str, operator: Operator, value: impl Into<Value>) -> Condition {
        Condition::Comparison {
            field: field.to_string(),
            operator,
            value: value.into(),
        }
    }

    pub fn and(children: Vec<Condition>) -> Condition {
        Condition::Logical {
            operator: LogicalOperator::And,
            children,
        }
    }

    pub fn or(children: Vec<Condition>) -> Condition {
        Condition::Logical {
            operator: LogicalOperator::Or,
            children,
        }
    }
}

impl Display for Condition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::Comparison {
                field,
                operator,
                value,
            } => write!(f, "{} {} {}", field, operator, value),
            Condition::Logical { operator, children } => {
                let separator = format!(" {} ", operator);
                write!(f, "{}", children.iter().join(&separator))
            }
        }
    }
}

/// The parsed form of a query text.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub projection: Projection,
    pub collection: String,
    /// `None` lets every document pass.
    pub condition: Option<Condition>,
    /// `None` is unbounded.
    pub limit: Option<usize>,
    pub offset: usize,
}

impl Query {
    /// A `SELECT * FROM <collection>` query.
    pub fn select_all(collection: &str) -> Query {
        Query {
            projection: Projection::All,
            collection: collection.to_string(),
            condition: None,
            limit: None,
            offset: 0,
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Query {
        self.condition = Some(condition);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Query {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Query {
        self.offset = offset;
        self
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.projection {
            Projection::All => write!(f, "SELECT * FROM {}", self.collection)?,
            Projection::Fields(fields) => {
                write!(f, "SELECT {} FROM {}", fields.iter().join(", "), self.collection)?
            }
        }
        if let Some(condition) = &self.condition {
            write!(f, " WHERE {}", condition)?;
        }
        if let Some(limit) = self.limit {
            write!(f, " LIMIT {}", limit)?;
        }
        if self.offset > 0 {
            write!(f, " OFFSET {}", self.offset)?;
        }
        Ok(())
    }
}
