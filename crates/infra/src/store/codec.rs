//! CSV encoding shared by every table store.

use super::{StoreError, TableName, TableRow};

/// Encode rows as CSV, header first. An empty table still gets its header.
pub fn encode<R: TableRow>(rows: &[R]) -> Result<Vec<u8>, StoreError> {
    let table = R::TABLE;
    let encode_err = |e: csv::Error| StoreError::Encode {
        table,
        reason: e.to_string(),
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(table.columns()).map_err(encode_err)?;
    for row in rows {
        writer.serialize(row).map_err(encode_err)?;
    }

    writer.into_inner().map_err(|e| StoreError::Encode {
        table,
        reason: e.error().to_string(),
    })
}

/// Decode CSV bytes into rows, checking the header against the fixed schema.
pub fn decode<R: TableRow>(bytes: &[u8]) -> Result<Vec<R>, StoreError> {
    let table = R::TABLE;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| StoreError::malformed(table, e.to_string()))?
        .clone();
    check_header(table, headers.iter())?;

    reader
        .deserialize::<R>()
        .enumerate()
        .map(|(index, row)| {
            let row = row.map_err(|e| StoreError::malformed(table, e.to_string()))?;
            row.check()
                .map_err(|reason| StoreError::malformed(table, format!("row {}: {reason}", index + 1)))?;
            Ok(row)
        })
        .collect()
}

fn check_header<'a>(table: TableName, found: impl Iterator<Item = &'a str>) -> Result<(), StoreError> {
    let found: Vec<&str> = found.map(str::trim).collect();
    if found != table.columns() {
        return Err(StoreError::malformed(
            table,
            format!(
                "expected columns [{}], found [{}]",
                table.columns().join(", "),
                found.join(", ")
            ),
        ));
    }
    Ok(())
}
