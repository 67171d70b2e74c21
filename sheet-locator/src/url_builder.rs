/// Deep link into one tab of the spreadsheet, optionally selecting a cell.
///
/// `{base}?gid={id}[&range={column}{row}]#gid={id}`
pub fn build_sheet_url(base: &str, grid_id: u64, row: Option<u32>, column: &str) -> String {
    match row {
        Some(row) => format!("{base}?gid={grid_id}&range={column}{row}#gid={grid_id}"),
        None => format!("{base}?gid={grid_id}#gid={grid_id}"),
    }
}

/// Editor URL for a spreadsheet id.
pub fn spreadsheet_edit_url(spreadsheet_id: &str) -> String {
    format!("https://docs.google.com/spreadsheets/d/{spreadsheet_id}/edit")
}
