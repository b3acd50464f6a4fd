use common::err::LResult;
use record::schema::{Catalogue, ColumnType, TableDef};

use crate::driver::DbDriver;

fn type_keyword(column_type: ColumnType) -> &'static str {
    match column_type {
        ColumnType::Int => "INTEGER",
        ColumnType::BigInt => "BIGINT",
        ColumnType::Real => "REAL",
        ColumnType::Text => "TEXT",
    }
}

/// CREATE TABLE IF NOT EXISTS for one catalogue table, every identifier
/// quoted through the driver.
pub fn create_table_sql(driver: &impl DbDriver, def: &TableDef) -> LResult<String> {
    def.validate()?;

    let mut parts: Vec<String> = def
        .columns
        .iter()
        .map(|(name, column_type)| {
            format!(
                "{} {}",
                driver.quote_identifier(name),
                type_keyword(*column_type)
            )
        })
        .collect();

    let keys: Vec<String> = def
        .pk
        .iter()
        .map(|key| driver.quote_identifier(key))
        .collect();
    parts.push(format!("PRIMARY KEY ({})", keys.join(", ")));

    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        driver.quote_identifier(&def.name),
        parts.join(", ")
    ))
}

/// Bring the whole catalogue up. Idempotent.
pub fn create_all(driver: &mut impl DbDriver) -> LResult<usize> {
    let mut created = 0;
    for def in Catalogue::global().defs() {
        let sql = create_table_sql(driver, def)?;
        driver.exec(&sql, &[])?;
        created += 1;
    }
    Ok(created)
}
