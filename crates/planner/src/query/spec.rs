//! Backend-neutral description of one query: conjunctive filters, an
//! optional ordering and an optional row window.
//!
//! A spec is a plain value built up functionally and handed whole to a
//! capability, so nothing is left half-configured between calls.

use crate::query::{
    ast::{
        common::{OrderDir, TableRef},
        expr::{BinaryOperator, Expr},
        select::Select,
    },
    builder::select::SelectBuilder,
    ident, value,
};
use model::core::value::Value;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

/// Comparison used by a filter predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl CompareOp {
    /// Seek operator for cursor pagination: past the cursor in walk order.
    pub fn seek(reverse: bool) -> Self {
        if reverse { CompareOp::Lt } else { CompareOp::Gt }
    }

    /// Whether `left op right` holds given `left.compare(right)`.
    pub fn matches(&self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::NotEq => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::LtEq => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::GtEq => ordering != Ordering::Less,
        }
    }

    fn binary_operator(&self) -> BinaryOperator {
        match self {
            CompareOp::Eq => BinaryOperator::Eq,
            CompareOp::NotEq => BinaryOperator::NotEq,
            CompareOp::Lt => BinaryOperator::Lt,
            CompareOp::LtEq => BinaryOperator::LtEq,
            CompareOp::Gt => BinaryOperator::Gt,
            CompareOp::GtEq => BinaryOperator::GtEq,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "<>",
            CompareOp::Lt => "<",
            CompareOp::LtEq => "<=",
            CompareOp::Gt => ">",
            CompareOp::GtEq => ">=",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub op: CompareOp,
    pub value: Value,
}

impl Filter {
    pub fn to_expr(&self) -> Expr {
        Expr::binary(
            ident(&self.field),
            self.op.binary_operator(),
            value(self.value.clone()),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub field: String,
    pub dir: OrderDir,
}

/// Filters, ordering and window for one fetch or count.
///
/// `limit` and `offset` set to `None` mean "no limit" and "no offset".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl QuerySpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a predicate; predicates are combined with `AND`.
    pub fn filter(mut self, field: &str, op: CompareOp, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.to_string(),
            op,
            value: value.into(),
        });
        self
    }

    /// Sets the sort order, replacing any previous one.
    pub fn order_by(mut self, field: &str, dir: OrderDir) -> Self {
        self.order = Some(Order {
            field: field.to_string(),
            dir,
        });
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Drops limit and offset, keeping filters and order.
    pub fn unbounded(mut self) -> Self {
        self.limit = None;
        self.offset = None;
        self
    }

    /// Lowers the spec to a row-returning `SELECT` over `table`.
    pub fn to_select(&self, table: &TableRef, columns: Vec<Expr>) -> Select {
        let mut builder = SelectBuilder::new()
            .select(columns)
            .from(table.clone());

        for filter in &self.filters {
            builder = builder.and_where(filter.to_expr());
        }

        if let Some(order) = &self.order {
            builder = builder.order_by(ident(&order.field), Some(order.dir));
        }

        if let Some(limit) = self.limit {
            builder = builder.limit(value(Value::Uint(limit)));
        }

        if let Some(offset) = self.offset {
            builder = builder.offset(value(Value::Uint(offset)));
        }

        builder.build()
    }

    /// Lowers the spec to `SELECT COUNT(*)` over `table`, honouring filters
    /// only. Order and window do not affect a count.
    pub fn to_count(&self, table: &TableRef) -> Select {
        let mut builder = SelectBuilder::new()
            .select(vec![Expr::CountAll])
            .from(table.clone());

        for filter in &self.filters {
            builder = builder.and_where(filter.to_expr());
        }

        builder.build()
    }
}
