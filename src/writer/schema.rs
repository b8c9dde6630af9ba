//! Table definitions for the SQLite export

/// Column data type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
}

impl ColumnType {
    pub fn sql(self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
        }
    }
}

/// Column definition
#[derive(Debug, Clone)]
pub struct Column {
    pub name: &'static str,
    pub col_type: ColumnType,
    pub nullable: bool,
}

impl Column {
    /// Create an optional (nullable) column
    pub const fn new(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: true,
        }
    }

    /// Create a required (non-nullable) column
    pub const fn required(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: false,
        }
    }
}

/// Foreign key reference
#[derive(Debug, Clone)]
pub struct ForeignKey {
    pub column: &'static str,
    pub references_table: &'static str,
    pub references_column: &'static str,
}

impl ForeignKey {
    pub const fn new(
        column: &'static str,
        references_table: &'static str,
        references_column: &'static str,
    ) -> Self {
        Self {
            column,
            references_table,
            references_column,
        }
    }
}

/// Table schema definition; the first column is the primary key
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [Column],
    pub foreign_keys: &'static [ForeignKey],
}

impl TableSchema {
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }
}

pub static AIRPORTS: TableSchema = TableSchema {
    name: "airports",
    columns: &[
        Column::required("code", ColumnType::Text),
        Column::new("latitude", ColumnType::Real),
        Column::new("longitude", ColumnType::Real),
        Column::new("country", ColumnType::Text),
    ],
    foreign_keys: &[],
};

pub static ROUTES: TableSchema = TableSchema {
    name: "routes",
    columns: &[
        Column::required("route", ColumnType::Text),
        Column::required("airport1", ColumnType::Text),
        Column::required("airport2", ColumnType::Text),
        Column::required("count", ColumnType::Integer),
        Column::new("region", ColumnType::Text),
        Column::required("distance", ColumnType::Integer),
    ],
    foreign_keys: &[
        ForeignKey::new("airport1", "airports", "code"),
        ForeignKey::new("airport2", "airports", "code"),
    ],
};

pub static LEGS: TableSchema = TableSchema {
    name: "legs",
    columns: &[
        Column::required("sheet_row", ColumnType::Integer),
        Column::required("origin", ColumnType::Text),
        Column::required("destination", ColumnType::Text),
        Column::required("route", ColumnType::Text),
        Column::new("mileage", ColumnType::Integer),
    ],
    foreign_keys: &[ForeignKey::new("route", "routes", "route")],
};

/// Parents before children
pub static ALL_TABLES: &[&TableSchema] = &[&AIRPORTS, &ROUTES, &LEGS];
