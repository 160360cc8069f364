//! Write tasks and the column-restricted update builder.

use rusqlite::types::Value;

/// One parameterized write statement, executed by a store's worker.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteTask {
    sql: String,
    params: Vec<Value>,
}

impl WriteTask {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Append `AND condition` to the statement, binding `value` to the
    /// condition's single `?` placeholder.
    pub fn and_where(mut self, condition: &'static str, value: Value) -> Self {
        self.params.push(value);
        let numbered = condition.replace('?', &format!("?{}", self.params.len()));
        self.sql = format!("{} AND {numbered}", self.sql);
        self
    }
}

/// A column that an update is allowed to assign.
///
/// Implemented by per-table enums so that only compile-time names ever reach
/// the statement text.
pub trait Column: Copy {
    fn name(self) -> &'static str;
}

/// Ordered `SET` list for a partial update.
#[derive(Debug)]
pub struct Assignments<C> {
    fields: Vec<(C, Value)>,
}

impl<C: Column> Default for Assignments<C> {
    fn default() -> Self {
        Self { fields: Vec::new() }
    }
}

impl<C: Column> Assignments<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: C, value: Value) -> &mut Self {
        self.fields.push((column, value));
        self
    }

    /// Assign only when a value was supplied.
    pub fn set_opt<T>(&mut self, column: C, value: Option<T>, to_value: impl FnOnce(T) -> Value) -> &mut Self {
        if let Some(v) = value {
            self.fields.push((column, to_value(v)));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Build `UPDATE table SET .. WHERE key_column = ?`, or `None` when
    /// nothing was assigned.
    pub fn into_update(self, table: &'static str, key_column: &'static str, key: Value) -> Option<WriteTask> {
        if self.fields.is_empty() {
            return None;
        }

        let mut set = Vec::with_capacity(self.fields.len());
        let mut params = Vec::with_capacity(self.fields.len() + 1);
        for (i, (column, value)) in self.fields.into_iter().enumerate() {
            set.push(format!("{} = ?{}", column.name(), i + 1));
            params.push(value);
        }
        params.push(key);

        let sql = format!(
            "UPDATE {table} SET {} WHERE {key_column} = ?{}",
            set.join(", "),
            params.len()
        );
        Some(WriteTask::new(sql, params))
    }
}
