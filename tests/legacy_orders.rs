//! An example of putting friendly names over a legacy order-entry schema,
//! with a small query builder standing in for the host ORM.

use std::collections::HashMap;

use colalias::{
    naming::Builtin, LegacyTable, LegacyTableExt, NameMapper, SqlRewrite, TableNameRef,
    TransformOptions,
};

pub struct Orders;

impl LegacyTable for Orders {
    const TABLE_NAME: &'static TableNameRef = TableNameRef::from_static("ORDERS");
    const COLUMN_NAMES: &'static [&'static str] = &[
        "ROWID",
        "OrderID",
        "CustomerName",
        "TotalAmount",
        "OrderDate",
        "Status",
    ];

    fn transform_options() -> TransformOptions {
        TransformOptions::new(Builtin::Underscore).skip("ROWID")
    }

    fn name_mapper() -> &'static NameMapper {
        colalias::once_name_mapper!(Orders)
    }
}

/// A stand-in for the host's database connection, recording every statement
/// it is asked to run
#[derive(Debug, Default)]
pub struct Connection {
    pub executed: Vec<String>,
}

/// A stand-in for the host's query pipeline
///
/// Statements are generated with transformed names and passed through the
/// rewrite hook just before they reach the connection.
pub struct Pipeline<'a> {
    table: &'static TableNameRef,
    hook: &'a dyn SqlRewrite,
    connection: Connection,
}

impl<'a> Pipeline<'a> {
    pub fn new(table: &'static TableNameRef, hook: &'a dyn SqlRewrite) -> Self {
        Self {
            table,
            hook,
            connection: Connection::default(),
        }
    }

    fn execute(&mut self, sql: String) {
        let sql = self.hook.rewrite_sql(&sql);
        tracing::info!(sql = sql.as_str(), "executing statement");
        self.connection.executed.push(sql);
    }

    pub fn find(&mut self, conditions: &[&str], order_by: Option<&str>) {
        let mut sql = format!("SELECT * FROM {}", self.table);
        if !conditions.is_empty() {
            let conditions: Vec<_> = conditions.iter().map(|c| format!("{c} = ?")).collect();
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        if let Some(order_by) = order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }
        self.execute(sql);
    }

    pub fn calculate(&mut self, operation: &str, column: &str, group_by: Option<&str>) {
        let alias = format!("{}_{column}", operation.to_ascii_lowercase());
        let mut sql = match group_by {
            Some(group) => format!(
                "SELECT {operation}({column}) AS {alias}, {group} AS {group} FROM {}",
                self.table
            ),
            None => format!(
                "SELECT {operation}({column}) AS {alias} FROM {}",
                self.table
            ),
        };
        if let Some(group) = group_by {
            sql.push_str(" GROUP BY ");
            sql.push_str(group);
        }
        self.execute(sql);
    }

    pub fn into_connection(self) -> Connection {
        self.connection
    }
}

/// A dynamic finder: `find_by(["customer_name", "status"], [...])`
///
/// Returns the legacy-keyed conditions, or `None` if any name does not
/// address a column of the table.
pub fn find_by<'v>(
    names: &[&'static str],
    values: &[&'v str],
) -> Option<Vec<(&'static str, &'v str)>> {
    let mapper = Orders::name_mapper();
    if !mapper.attributes_exist(names) {
        return None;
    }
    Some(mapper.resolve_arguments(
        names.iter().copied(),
        values.iter().copied(),
    ))
}

pub fn load_row() -> HashMap<String, String> {
    HashMap::from([
        ("ROWID".to_owned(), "AAAR3sAAEAAAACXAAA".to_owned()),
        ("OrderID".to_owned(), "1001".to_owned()),
        ("CustomerName".to_owned(), "Ada Lovelace".to_owned()),
        ("TotalAmount".to_owned(), "42.50".to_owned()),
    ])
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test_log::test]
    fn finder_sql_reaches_the_database_with_legacy_names() {
        let mut pipeline = Pipeline::new(Orders::TABLE_NAME, Orders::name_mapper());

        pipeline.find(&["customer_name", "status"], Some("order_date DESC"));
        pipeline.find(&["ROWID"], None);

        let connection = pipeline.into_connection();
        assert_eq!(
            connection.executed,
            vec![
                "SELECT * FROM ORDERS WHERE CustomerName = ? AND Status = ? ORDER BY OrderDate \
                 DESC",
                "SELECT * FROM ORDERS WHERE ROWID = ?",
            ]
        );
    }

    #[test_log::test]
    fn calculation_sql_keeps_its_aliases() {
        let mut pipeline = Pipeline::new(Orders::TABLE_NAME, Orders::name_mapper());

        pipeline.calculate("AVG", "total_amount", None);
        pipeline.calculate("SUM", "total_amount", Some("status"));

        let connection = pipeline.into_connection();
        assert_eq!(
            connection.executed,
            vec![
                "SELECT AVG(TotalAmount) AS avg_total_amount FROM ORDERS",
                "SELECT SUM(TotalAmount) AS sum_total_amount, Status AS Status FROM ORDERS GROUP \
                 BY Status",
            ]
        );
    }

    #[test_log::test]
    fn dynamic_finders_translate_attribute_names() {
        let conditions = find_by(&["customer_name", "Status"], &["Ada Lovelace", "OPEN"]);
        assert_eq!(
            conditions,
            Some(vec![("CustomerName", "Ada Lovelace"), ("Status", "OPEN")])
        );

        assert_eq!(find_by(&["customer"], &["Ada"]), None);
    }

    #[test_log::test]
    fn rows_read_and_serialize_by_friendly_name() {
        let mut row = load_row();

        Orders::attributes_mut(&mut row).set("status", "SHIPPED".to_owned());

        let attrs = Orders::attributes(&row);
        assert_eq!(attrs.get("customer_name").unwrap(), "Ada Lovelace");
        assert_eq!(attrs.get("status").unwrap(), "SHIPPED");
        assert!(!attrs.is_present("order_date"));

        let json = serde_json::to_value(&attrs).unwrap();
        assert_eq!(json["total_amount"], "42.50");
        assert_eq!(json["TotalAmount"], "42.50");
        assert_eq!(json["ROWID"], "AAAR3sAAEAAAACXAAA");
        assert!(json.get("rowid").is_none());
        assert!(json.get("order_date").is_none());
    }

    #[test_log::test]
    fn mapper_is_shared_across_threads() {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                std::thread::spawn(move || {
                    let sql = format!("SELECT order_id FROM ORDERS WHERE order_id > {i}");
                    Orders::rewrite_sql(&sql)
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(
                handle.join().unwrap(),
                format!("SELECT OrderID FROM ORDERS WHERE OrderID > {i}")
            );
        }
    }

    #[test_log::test]
    fn table_mapping_round_trips() {
        let mapper = Orders::name_mapper();

        assert_eq!(mapper.len(), Orders::COLUMN_NAMES.len() - 1);
        for (transformed, legacy) in mapper.iter() {
            assert_eq!(mapper.transformed_name(legacy), Some(transformed));
            assert_eq!(Orders::resolve(Orders::resolve(transformed)), legacy);
        }
        assert_eq!(
            mapper.column_for("ORDERS.total_amount"),
            Some("TotalAmount")
        );
    }
}
