//! A small predicate expression builder rendered into SQLite SQL.
//!
//! Filters are composed as a tree of [`Predicate`] values (AND/OR over comparison and
//! substring clauses) and then pushed into a [`sqlx::QueryBuilder`]. Every value is
//! bound as a parameter; column names are `&'static str` and therefore never come
//! from user input.

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{QueryBuilder, Sqlite};

/// Escape character used in every `LIKE` clause this module produces.
pub const LIKE_ESCAPE: char = '!';

/// Escapes `%`, `_` and the escape character so `value` matches literally inside `LIKE`.
pub fn escape_like_pattern(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            out.push(LIKE_ESCAPE);
        }
        out.push(ch);
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Real(f64),
    Bool(bool),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Op {
    fn as_sql(self) -> &'static str {
        match self {
            Op::Eq => " = ",
            Op::Lt => " < ",
            Op::Le => " <= ",
            Op::Gt => " > ",
            Op::Ge => " >= ",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches every row.
    True,
    Compare { column: &'static str, op: Op, value: Value },
    /// Substring match, rendered as `LIKE '%needle%'`.
    Contains { column: &'static str, needle: String },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn compare(column: &'static str, op: Op, value: impl Into<Value>) -> Self {
        Predicate::Compare { column, op, value: value.into() }
    }

    pub fn eq(column: &'static str, value: impl Into<Value>) -> Self {
        Self::compare(column, Op::Eq, value)
    }

    pub fn ge(column: &'static str, value: impl Into<Value>) -> Self {
        Self::compare(column, Op::Ge, value)
    }

    pub fn le(column: &'static str, value: impl Into<Value>) -> Self {
        Self::compare(column, Op::Le, value)
    }

    pub fn gt(column: &'static str, value: impl Into<Value>) -> Self {
        Self::compare(column, Op::Gt, value)
    }

    pub fn lt(column: &'static str, value: impl Into<Value>) -> Self {
        Self::compare(column, Op::Lt, value)
    }

    pub fn contains(column: &'static str, needle: impl Into<String>) -> Self {
        Predicate::Contains { column, needle: needle.into() }
    }

    /// Conjunction. `True` operands are dropped and nested `And`s are flattened.
    pub fn and(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Predicate::True, p) | (p, Predicate::True) => p,
            (Predicate::And(mut a), Predicate::And(b)) => {
                a.extend(b);
                Predicate::And(a)
            }
            (Predicate::And(mut a), p) => {
                a.push(p);
                Predicate::And(a)
            }
            (p, Predicate::And(mut b)) => {
                b.insert(0, p);
                Predicate::And(b)
            }
            (a, b) => Predicate::And(vec![a, b]),
        }
    }

    /// Disjunction. `True` absorbs the other operand.
    pub fn or(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Predicate::True, _) | (_, Predicate::True) => Predicate::True,
            (Predicate::Or(mut a), Predicate::Or(b)) => {
                a.extend(b);
                Predicate::Or(a)
            }
            (Predicate::Or(mut a), p) => {
                a.push(p);
                Predicate::Or(a)
            }
            (a, b) => Predicate::Or(vec![a, b]),
        }
    }

    /// Conjunction of all clauses; an empty list is `True`.
    pub fn all(clauses: impl IntoIterator<Item = Predicate>) -> Predicate {
        clauses.into_iter().fold(Predicate::True, Predicate::and)
    }

    /// Disjunction of the given clauses. An empty list is `True`, not `False`:
    /// a filter with no selected alternative constrains nothing.
    pub fn any(clauses: impl IntoIterator<Item = Predicate>) -> Predicate {
        let mut clauses = clauses.into_iter();
        match clauses.next() {
            None => Predicate::True,
            Some(first) => clauses.fold(first, Predicate::or),
        }
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Predicate::True)
    }

    /// Appends this predicate to `qb` as a boolean SQL expression.
    pub fn push_to(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            Predicate::True => {
                qb.push("1 = 1");
            }
            Predicate::Compare { column, op, value } => {
                qb.push(*column).push(op.as_sql());
                push_value(qb, value);
            }
            Predicate::Contains { column, needle } => {
                qb.push(*column)
                    .push(" LIKE ")
                    .push_bind(format!("%{}%", escape_like_pattern(needle)))
                    .push(" ESCAPE '")
                    .push(LIKE_ESCAPE)
                    .push("'");
            }
            Predicate::And(parts) => push_joined(qb, parts, " AND "),
            Predicate::Or(parts) => push_joined(qb, parts, " OR "),
        }
    }
}

fn push_joined(qb: &mut QueryBuilder<'_, Sqlite>, parts: &[Predicate], sep: &str) {
    if parts.is_empty() {
        qb.push("1 = 1");
        return;
    }
    qb.push("(");
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            qb.push(sep);
        }
        part.push_to(qb);
    }
    qb.push(")");
}

fn push_value(qb: &mut QueryBuilder<'_, Sqlite>, value: &Value) {
    match value {
        Value::Int(v) => qb.push_bind(*v),
        Value::Real(v) => qb.push_bind(*v),
        Value::Bool(v) => qb.push_bind(*v),
        Value::Text(v) => qb.push_bind(v.clone()),
        Value::Date(v) => qb.push_bind(*v),
        Value::DateTime(v) => qb.push_bind(*v),
    };
}

/// Starts a `SELECT` with the given head (everything up to `WHERE`) and appends `predicate`.
pub fn select_where<'a>(head: &str, predicate: &Predicate) -> QueryBuilder<'a, Sqlite> {
    let mut qb = QueryBuilder::new(head);
    qb.push(" WHERE ");
    predicate.push_to(&mut qb);
    qb
}
