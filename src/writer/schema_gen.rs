use super::schema::TableSchema;

/// Generate CREATE TABLE SQL for a table schema
pub fn generate_create_table(schema: &TableSchema) -> String {
    let mut columns = Vec::new();

    for (i, col) in schema.columns.iter().enumerate() {
        let pk = if i == 0 { " PRIMARY KEY" } else { "" };
        let null_constraint = if !col.nullable { " NOT NULL" } else { "" };
        columns.push(format!(
            "    {} {}{}{}",
            col.name,
            col.col_type.sql(),
            pk,
            null_constraint
        ));
    }

    for fk in schema.foreign_keys {
        columns.push(format!(
            "    FOREIGN KEY ({}) REFERENCES {}({})",
            fk.column, fk.references_table, fk.references_column
        ));
    }

    format!("CREATE TABLE {} (\n{}\n)", schema.name, columns.join(",\n"))
}

/// Generate CREATE INDEX statements for foreign key columns
pub fn generate_indexes(schema: &TableSchema) -> Vec<String> {
    schema
        .foreign_keys
        .iter()
        .map(|fk| {
            format!(
                "CREATE INDEX idx_{}_{} ON {}({})",
                schema.name, fk.column, schema.name, fk.column
            )
        })
        .collect()
}

/// Parameterized INSERT for every column of the table
pub fn generate_insert(schema: &TableSchema) -> String {
    let columns = schema.column_names();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        schema.name,
        columns.join(", "),
        placeholders.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::schema::{LEGS, ROUTES};

    #[test]
    fn test_generate_create_table() {
        let sql = generate_create_table(&ROUTES);
        assert!(sql.contains("CREATE TABLE routes"));
        assert!(sql.contains("route TEXT PRIMARY KEY NOT NULL"));
        assert!(sql.contains("region TEXT,"));
        assert!(sql.contains("FOREIGN KEY (airport1) REFERENCES airports(code)"));
    }

    #[test]
    fn test_generate_indexes() {
        let indexes = generate_indexes(&ROUTES);
        assert_eq!(indexes.len(), 2);
        assert!(indexes.iter().any(|i| i.contains("idx_routes_airport2")));
    }

    #[test]
    fn test_generate_insert() {
        assert_eq!(
            generate_insert(&LEGS),
            "INSERT INTO legs (sheet_row, origin, destination, route, mileage) VALUES (?1, ?2, ?3, ?4, ?5)"
        );
    }
}
