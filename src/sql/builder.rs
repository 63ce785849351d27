//! Builds parameterized INSERT, SELECT, UPDATE, DELETE for a fixed table description.

use super::PgBindValue;
use crate::model::Page;

/// Table name and its column list (first column is the `BIGSERIAL` primary key).
pub struct Table {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

impl Table {
    fn pk(&self) -> &'static str {
        self.columns[0]
    }

    fn data_columns(&self) -> &'static [&'static str] {
        &self.columns[1..]
    }
}

/// Quote identifier for PostgreSQL.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn column_list(table: &Table) -> String {
    table
        .columns
        .iter()
        .map(|c| quoted(c))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: impl Into<PgBindValue>) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v.into());
        n
    }
}

/// WHERE predicate on one column.
#[derive(Clone, Debug)]
pub enum Filter {
    Eq(&'static str, PgBindValue),
    NotEq(&'static str, PgBindValue),
    /// Case-insensitive literal substring match.
    Contains(&'static str, String),
}

#[derive(Clone, Copy, Debug)]
pub struct OrderBy {
    pub column: &'static str,
    pub descending: bool,
}

impl OrderBy {
    pub fn asc(column: &'static str) -> Self {
        OrderBy {
            column,
            descending: false,
        }
    }

    pub fn desc(column: &'static str) -> Self {
        OrderBy {
            column,
            descending: true,
        }
    }
}

/// Escape `%`, `_` and `\` so the string matches literally inside LIKE/ILIKE (escape char `\`).
pub fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn where_clause(q: &mut QueryBuf, filters: &[Filter]) -> String {
    let parts: Vec<String> = filters
        .iter()
        .map(|f| match f {
            Filter::Eq(col, v) => {
                let n = q.push_param(v.clone());
                format!("{} = ${}", quoted(col), n)
            }
            Filter::NotEq(col, v) => {
                let n = q.push_param(v.clone());
                format!("{} <> ${}", quoted(col), n)
            }
            Filter::Contains(col, needle) => {
                let n = q.push_param(format!("%{}%", escape_like(needle)));
                format!("{} ILIKE ${} ESCAPE '\\'", quoted(col), n)
            }
        })
        .collect();
    if parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", parts.join(" AND "))
    }
}

/// SELECT by primary key. Caller adds id as sole param.
pub fn select_by_id(table: &Table) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = $1",
        column_list(table),
        quoted(table.name),
        quoted(table.pk())
    );
    q
}

/// SELECT rows matching all filters, ordered, with LIMIT/OFFSET from `page`.
pub fn select_list(table: &Table, filters: &[Filter], order: &[OrderBy], page: Page) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_sql = where_clause(&mut q, filters);
    let order_sql = if order.is_empty() {
        format!(" ORDER BY {}", quoted(table.pk()))
    } else {
        let parts: Vec<String> = order
            .iter()
            .map(|o| {
                format!(
                    "{} {}",
                    quoted(o.column),
                    if o.descending { "DESC" } else { "ASC" }
                )
            })
            .collect();
        format!(" ORDER BY {}", parts.join(", "))
    };
    q.sql = format!(
        "SELECT {} FROM {}{}{} LIMIT {} OFFSET {}",
        column_list(table),
        quoted(table.name),
        where_sql,
        order_sql,
        page.limit,
        page.skip
    );
    q
}

/// `SELECT EXISTS(...)` over rows matching all filters.
pub fn exists(table: &Table, filters: &[Filter]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_sql = where_clause(&mut q, filters);
    q.sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {}{})",
        quoted(table.name),
        where_sql
    );
    q
}

/// INSERT all data columns (values in column order), RETURNING the full row.
pub fn insert(table: &Table, values: Vec<PgBindValue>) -> QueryBuf {
    debug_assert_eq!(values.len(), table.data_columns().len());
    let mut q = QueryBuf::new();
    let placeholders: Vec<String> = values
        .into_iter()
        .map(|v| format!("${}", q.push_param(v)))
        .collect();
    let cols: Vec<String> = table.data_columns().iter().map(|c| quoted(c)).collect();
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(table.name),
        cols.join(", "),
        placeholders.join(", "),
        column_list(table)
    );
    q
}

/// UPDATE all data columns of the row with `id`, RETURNING the full row.
pub fn update(table: &Table, id: i64, values: Vec<PgBindValue>) -> QueryBuf {
    debug_assert_eq!(values.len(), table.data_columns().len());
    let mut q = QueryBuf::new();
    let sets: Vec<String> = table
        .data_columns()
        .iter()
        .zip(values)
        .map(|(col, v)| format!("{} = ${}", quoted(col), q.push_param(v)))
        .collect();
    let id_param = q.push_param(id);
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
        quoted(table.name),
        sets.join(", "),
        quoted(table.pk()),
        id_param,
        column_list(table)
    );
    q
}

/// DELETE by primary key. Caller adds id as sole param.
pub fn delete(table: &Table) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "DELETE FROM {} WHERE {} = $1",
        quoted(table.name),
        quoted(table.pk())
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;

    const ITEMS: Table = Table {
        name: "items",
        columns: &["id", "name", "done"],
    };

    #[test]
    fn list_with_filters_order_and_page() {
        let q = select_list(
            &ITEMS,
            &[
                Filter::Contains("name", "a_b".into()),
                Filter::Eq("done", true.into()),
            ],
            &[OrderBy::desc("name"), OrderBy::asc("id")],
            Page { skip: 20, limit: 10 },
        );
        assert_eq!(
            q.sql,
            "SELECT \"id\", \"name\", \"done\" FROM \"items\" WHERE \"name\" ILIKE $1 ESCAPE '\\' \
             AND \"done\" = $2 ORDER BY \"name\" DESC, \"id\" ASC LIMIT 10 OFFSET 20"
        );
        assert_eq!(
            q.params,
            vec![PgBindValue::String("%a\\_b%".into()), PgBindValue::Bool(true)]
        );
    }

    #[test]
    fn list_without_filters_orders_by_pk() {
        let q = select_list(&ITEMS, &[], &[], Page::default());
        assert_eq!(
            q.sql,
            "SELECT \"id\", \"name\", \"done\" FROM \"items\" ORDER BY \"id\" LIMIT 100 OFFSET 0"
        );
        assert!(q.params.is_empty());
    }

    #[test]
    fn exists_with_exclusion() {
        let q = exists(
            &ITEMS,
            &[Filter::Eq("name", "x".into()), Filter::NotEq("id", 3i64.into())],
        );
        assert_eq!(
            q.sql,
            "SELECT EXISTS(SELECT 1 FROM \"items\" WHERE \"name\" = $1 AND \"id\" <> $2)"
        );
        assert_eq!(q.params.len(), 2);
    }

    #[test]
    fn insert_and_update_skip_pk() {
        let q = insert(&ITEMS, vec!["n".into(), false.into()]);
        assert_eq!(
            q.sql,
            "INSERT INTO \"items\" (\"name\", \"done\") VALUES ($1, $2) RETURNING \"id\", \"name\", \"done\""
        );

        let q = update(&ITEMS, 9, vec!["n".into(), PgBindValue::from(None::<bool>)]);
        assert_eq!(
            q.sql,
            "UPDATE \"items\" SET \"name\" = $1, \"done\" = $2 WHERE \"id\" = $3 RETURNING \"id\", \"name\", \"done\""
        );
        assert_eq!(q.params[1], PgBindValue::Null);
        assert_eq!(q.params[2], PgBindValue::I64(9));
    }

    #[test]
    fn escape_like_handles_wildcards() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("doe"), "doe");
    }
}
