use itertools::Itertools;

use firn_catalog::TableName;

pub(crate) fn create_table(
    table: &TableName,
    columns: &[(String, String)],
    or_replace: bool,
) -> String {
    let defs = columns
        .iter()
        .map(|(name, data_type)| format!("{name} {data_type}"))
        .join(", ");
    if or_replace {
        format!("CREATE OR REPLACE TABLE {table} ({defs})")
    } else {
        format!("CREATE TABLE {table} ({defs})")
    }
}

pub(crate) fn drop_table(table: &TableName) -> String {
    format!("DROP TABLE IF EXISTS {table}")
}

pub(crate) fn add_column(table: &TableName, column: &str, data_type: &str) -> String {
    format!("ALTER TABLE {table} ADD COLUMN {column} {data_type}")
}

/// Converts a text column of JSON in place to VARIANT.
pub(crate) fn promote_to_variant(table: &TableName, column: &str) -> String {
    format!(
        "ALTER TABLE {table} ALTER COLUMN {column} SET DATA TYPE VARIANT USING PARSE_JSON({column})"
    )
}

/// Moves every staged row into the target in one statement. Columns flagged
/// as parsed are run through PARSE_JSON on the way; the rest pass through.
pub(crate) fn insert_select(
    target: &TableName,
    source: &TableName,
    columns: &[(String, bool)],
) -> String {
    let names = columns.iter().map(|(name, _)| name.as_str()).join(", ");
    let exprs = columns
        .iter()
        .map(|(name, parsed)| {
            if *parsed {
                format!("PARSE_JSON({name})")
            } else {
                name.clone()
            }
        })
        .join(", ");
    format!("INSERT INTO {target} ({names}) SELECT {exprs} FROM {source}")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn table(name: &str) -> TableName {
        TableName::parse(name, None, None).unwrap()
    }

    #[test]
    fn test_create_table() {
        let columns = vec![
            ("ID".to_string(), "INT".to_string()),
            ("DATA".to_string(), "VARCHAR".to_string()),
        ];
        assert_eq!(
            create_table(&table("DB.S.T"), &columns, false),
            "CREATE TABLE DB.S.T (ID INT, DATA VARCHAR)"
        );
        assert_eq!(
            create_table(&table("DB.S.T"), &columns, true),
            "CREATE OR REPLACE TABLE DB.S.T (ID INT, DATA VARCHAR)"
        );
    }

    #[test]
    fn test_drop_table() {
        assert_eq!(drop_table(&table("DB.S.T")), "DROP TABLE IF EXISTS DB.S.T");
    }

    #[test]
    fn test_add_column() {
        assert_eq!(
            add_column(&table("DB.S.T"), "META", "VARIANT"),
            "ALTER TABLE DB.S.T ADD COLUMN META VARIANT"
        );
    }

    #[test]
    fn test_promote_to_variant() {
        assert_eq!(
            promote_to_variant(&table("DB.S.T"), "DATA"),
            "ALTER TABLE DB.S.T ALTER COLUMN DATA SET DATA TYPE VARIANT USING PARSE_JSON(DATA)"
        );
    }

    #[test]
    fn test_insert_select() {
        let columns = vec![("ID".to_string(), false), ("DATA".to_string(), true)];
        assert_eq!(
            insert_select(&table("DB.S.T"), &table("DB.S.T_STAGING_1"), &columns),
            "INSERT INTO DB.S.T (ID, DATA) SELECT ID, PARSE_JSON(DATA) FROM DB.S.T_STAGING_1"
        );
    }
}
