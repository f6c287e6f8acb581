//! SQL scripts compiled into the binary, in application order

/// One schema step; `id` is the key recorded in `schema_version`
pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        id: "001_initial_schema",
        sql: include_str!("../../migrations/001_initial_schema.sql"),
    },
    Migration {
        id: "002_change_indexes",
        sql: include_str!("../../migrations/002_change_indexes.sql"),
    },
];

pub fn get_migrations() -> &'static [Migration] {
    MIGRATIONS
}
