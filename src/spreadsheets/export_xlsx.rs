use crate::domain::ListingRow;
use crate::errors::{AppError, AppResult};
use crate::spreadsheets::LISTING_HEADERS;
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use std::path::Path;

fn xlsx_err(what: &str) -> impl FnOnce(XlsxError) -> AppError + '_ {
    move |e| AppError::ExportError(format!("Failed to write {what}: {e}"))
}

fn write_text(ws: &mut Worksheet, r: u32, c: u16, v: &Option<String>) -> AppResult<()> {
    if let Some(v) = v {
        ws.write_string(r, c, v).map_err(xlsx_err("text cell"))?;
    }
    Ok(())
}

fn write_num(ws: &mut Worksheet, r: u32, c: u16, v: Option<f64>) -> AppResult<()> {
    if let Some(v) = v {
        ws.write_number(r, c, v).map_err(xlsx_err("number cell"))?;
    }
    Ok(())
}

fn build_workbook(rows: &[ListingRow], sheet_name: &str) -> AppResult<Workbook> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet_name)
        .map_err(xlsx_err("sheet name"))?;

    // Headers
    for (col, header) in LISTING_HEADERS.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(xlsx_err("header"))?;
    }

    // Rows
    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;

        write_text(worksheet, r, 0, &row.property_name)?;
        write_text(worksheet, r, 1, &row.address)?;
        write_text(worksheet, r, 2, &row.city)?;
        write_text(worksheet, r, 3, &row.state)?;
        write_num(worksheet, r, 4, row.min_price)?;
        write_num(worksheet, r, 5, row.max_price)?;
        write_num(worksheet, r, 6, row.avg_price())?;
        write_num(worksheet, r, 7, row.beds)?;
        write_num(worksheet, r, 8, row.baths)?;
        write_num(worksheet, r, 9, row.sqft)?;
    }

    Ok(workbook)
}

pub fn listings_xlsx_buffer(rows: &[ListingRow], sheet_name: &str) -> AppResult<Vec<u8>> {
    let mut workbook = build_workbook(rows, sheet_name)?;
    workbook.save_to_buffer().map_err(xlsx_err("workbook"))
}

pub fn export_listings_xlsx(rows: &[ListingRow], sheet_name: &str, path: &Path) -> AppResult<()> {
    let mut workbook = build_workbook(rows, sheet_name)?;
    workbook.save(path).map_err(xlsx_err("workbook"))
}
