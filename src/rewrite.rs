//! Rewriting of generated SQL so that it addresses legacy columns
//!
//! Query builders produce SQL using the transformed names that application
//! code works with. Before that SQL reaches the database, every free-standing
//! occurrence of a transformed name must be replaced with the legacy column
//! name it stands for.
//!
//! An occurrence is free-standing when the characters on either side of it, if
//! any, are not word characters (letters, digits, or `_`). Names are matched
//! literally and case-sensitively. No attempt is made to understand the SQL
//! itself: an occurrence inside a string literal or an `AS` alias is rewritten
//! like any other.
//!
//! ```
//! use colalias::{rewrite, NameMapper, TransformOptions};
//!
//! let mapper = NameMapper::build(["TotalAmount"], &TransformOptions::default()).unwrap();
//!
//! assert_eq!(
//!     rewrite::rewrite("SELECT AVG(total_amount) AS avg_total_amount FROM orders", &mapper),
//!     "SELECT AVG(TotalAmount) AS avg_total_amount FROM orders",
//! );
//! ```

use std::collections::BTreeMap;

use crate::NameMapper;

/// A hook applied to generated SQL immediately before it is executed
///
/// Host query pipelines hold one of these per table and pass every finder and
/// calculation statement through it.
pub trait SqlRewrite {
    /// Returns the SQL with all transformed names replaced by legacy names
    fn rewrite_sql(&self, sql: &str) -> String;
}

impl SqlRewrite for NameMapper {
    #[inline]
    fn rewrite_sql(&self, sql: &str) -> String {
        rewrite(sql, self)
    }
}

impl<T: SqlRewrite + ?Sized> SqlRewrite for &T {
    #[inline]
    fn rewrite_sql(&self, sql: &str) -> String {
        (**self).rewrite_sql(sql)
    }
}

/// Replaces every free-standing transformed name in `sql` with its legacy name
///
/// Names are considered in column definition order, and the occurrences of
/// each name from left to right. All matching happens against the original
/// SQL, so text inserted by one replacement is never matched again, whether by
/// the same name or by a later one. An occurrence that overlaps a span already
/// replaced for an earlier name is left alone.
pub fn rewrite(sql: &str, mapper: &NameMapper) -> String {
    // start -> (end, legacy name)
    let mut spans: BTreeMap<usize, (usize, &str)> = BTreeMap::new();

    for (transformed, legacy) in mapper.iter() {
        if transformed.is_empty() {
            continue;
        }

        let mut from = 0;
        while let Some(offset) = sql[from..].find(transformed) {
            let start = from + offset;
            let end = start + transformed.len();

            if is_free_standing(sql, start, end) && !overlaps(&spans, start, end) {
                spans.insert(start, (end, legacy));
                from = end;
            } else {
                from = start + sql[start..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }

    tracing::trace!(
        table = mapper.table().map(|t| t.as_str()),
        replacements = spans.len(),
        "rewrote transformed column names"
    );

    if spans.is_empty() {
        return sql.to_owned();
    }

    let mut output = String::with_capacity(sql.len() + sql.len() / 4);
    let mut cursor = 0;
    for (&start, &(end, legacy)) in &spans {
        output.push_str(&sql[cursor..start]);
        output.push_str(legacy);
        cursor = end;
    }
    output.push_str(&sql[cursor..]);
    output
}

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_free_standing(sql: &str, start: usize, end: usize) -> bool {
    let before = sql[..start].chars().next_back();
    let after = sql[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

fn overlaps(spans: &BTreeMap<usize, (usize, &str)>, start: usize, end: usize) -> bool {
    // Spans never overlap each other, so only the last one starting before
    // `end` can reach into `start..end`.
    spans
        .range(..end)
        .next_back()
        .is_some_and(|(_, &(span_end, _))| span_end > start)
}
