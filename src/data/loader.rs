//! Read slot tables from spreadsheets (.xlsx/.xls/.ods via calamine) or CSV files.
//! First row is the header, first column the item name, every other column an attribute.

use std::collections::BTreeMap;
use std::path::Path;

use calamine::Reader;

use crate::data::record::{RawItem, RawValue, SlotTable};
use crate::error::{LoadoutError, Result};

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "ods"];
/// Probed in order when looking for `<slot>.<ext>` in a data directory.
const SLOT_FILE_EXTENSIONS: &[&str] = &["xlsx", "csv"];

fn cell_value(cell: &calamine::Data) -> RawValue {
    match cell {
        calamine::Data::Empty => RawValue::Empty,
        calamine::Data::Float(f) => RawValue::Number(*f),
        calamine::Data::Int(i) => RawValue::Number(*i as f64),
        calamine::Data::String(s) => RawValue::from_cell_text(s),
        calamine::Data::Bool(b) => RawValue::Text(b.to_string()),
        calamine::Data::DateTimeIso(s) | calamine::Data::DurationIso(s) => RawValue::Text(s.clone()),
        other => RawValue::Text(format!("{other:?}")),
    }
}

fn cell_name(cell: Option<&calamine::Data>) -> String {
    match cell {
        Some(calamine::Data::String(s)) => s.trim().to_string(),
        Some(calamine::Data::Float(f)) => format!("{f}"),
        Some(calamine::Data::Int(i)) => i.to_string(),
        Some(calamine::Data::Empty) | None => String::new(),
        Some(other) => format!("{other:?}"),
    }
}

/// Columns with a blank header carry no attribute name and are dropped.
fn item_from_row(header: &[String], name: String, values: Vec<RawValue>) -> RawItem {
    let attributes: BTreeMap<String, RawValue> = header
        .iter()
        .skip(1)
        .cloned()
        .zip(values)
        .filter(|(attribute, _)| !attribute.is_empty())
        .collect();
    RawItem { name, attributes }
}

fn read_spreadsheet(path: &Path, slot: &str) -> Result<SlotTable> {
    let mut workbook = calamine::open_workbook_auto(path)?;
    let Some(sheet_name) = workbook.sheet_names().first().cloned() else {
        return Ok(SlotTable::new(slot, Vec::new()));
    };
    let range = workbook.worksheet_range(&sheet_name)?;
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(SlotTable::new(slot, Vec::new()));
    };
    let header: Vec<String> = header_row.iter().map(|c| cell_name(Some(c))).collect();

    let mut items = Vec::new();
    for row in rows {
        if row.iter().all(|c| matches!(c, calamine::Data::Empty)) {
            continue;
        }
        let name = cell_name(row.first());
        let values = row.iter().skip(1).map(cell_value).collect();
        items.push(item_from_row(&header, name, values));
    }
    Ok(SlotTable::new(slot, items))
}

fn read_csv(path: &Path, slot: &str) -> Result<SlotTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let header: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();

    let mut items = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let name = record.get(0).unwrap_or_default().trim().to_string();
        let values = record.iter().skip(1).map(RawValue::from_cell_text).collect();
        items.push(item_from_row(&header, name, values));
    }
    Ok(SlotTable::new(slot, items))
}

/// Load a single slot table; the format is picked from the file extension.
pub fn load_slot_table(path: impl AsRef<Path>, slot: &str) -> Result<SlotTable> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
        read_spreadsheet(path, slot)
    } else if extension == "csv" {
        read_csv(path, slot)
    } else {
        Err(LoadoutError::UnsupportedTableFormat {
            path: path.to_path_buf(),
        })
    }
}

/// Load `<dir>/<slot>.xlsx` (or `.csv`) for every slot, in slot order.
pub fn load_slot_tables(dir: impl AsRef<Path>, slots: &[String]) -> Result<Vec<SlotTable>> {
    let dir = dir.as_ref();
    slots
        .iter()
        .map(|slot| {
            let path = SLOT_FILE_EXTENSIONS
                .iter()
                .map(|ext| dir.join(format!("{slot}.{ext}")))
                .find(|candidate| candidate.is_file())
                .ok_or_else(|| LoadoutError::SlotTableNotFound {
                    slot: slot.clone(),
                    dir: dir.to_path_buf(),
                })?;
            tracing::debug!(slot = %slot, path = %path.display(), "loading slot table");
            load_slot_table(&path, slot)
        })
        .collect()
}
