//! Workbook reading and holdings extraction.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use holdwatch_core::snapshot::Holdings;
use log::{debug, info};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use super::profile::{AmcProfile, ColumnLayout, DisclosureRequest, PercentScale, SheetChoice};
use crate::errors::SourceError;
use crate::symbols::normalize_security_name;

/// Rows scanned for a header when the layout is auto-detected.
const HEADER_SCAN_ROWS: usize = 30;

/// A downloaded disclosure workbook (`.xls` or `.xlsx`).
pub struct Workbook {
    sheets: Sheets<Cursor<Vec<u8>>>,
}

impl Workbook {
    pub fn open(bytes: Vec<u8>) -> Result<Self, SourceError> {
        let sheets = open_workbook_auto_from_rs(Cursor::new(bytes))
            .map_err(|e| SourceError::Workbook(e.to_string()))?;
        Ok(Self { sheets })
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    pub fn grid(&mut self, sheet: &str) -> Result<SheetGrid, SourceError> {
        let range = self
            .sheets
            .worksheet_range(sheet)
            .map_err(|e| SourceError::Workbook(format!("sheet '{sheet}': {e}")))?;
        Ok(SheetGrid::from_range(&range))
    }
}

/// Cells of one sheet addressed by absolute row and column, so leading
/// empty rows and columns keep their positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetGrid {
    rows: Vec<Vec<Data>>,
}

impl SheetGrid {
    pub fn from_rows(rows: Vec<Vec<Data>>) -> Self {
        Self { rows }
    }

    pub fn from_range(range: &Range<Data>) -> Self {
        let Some((start_row, start_col)) = range.start() else {
            return Self::default();
        };
        let mut rows = vec![Vec::new(); start_row as usize];
        for row in range.rows() {
            let mut cells = vec![Data::Empty; start_col as usize];
            cells.extend(row.iter().cloned());
            rows.push(cells);
        }
        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn row(&self, row: usize) -> &[Data] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or_default()
    }

    fn cell(&self, row: usize, col: usize) -> Option<&Data> {
        self.rows.get(row)?.get(col)
    }
}

/// Text of a cell; `None` for empty and error cells.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(_) | Data::Error(_) | Data::Empty => None,
    }
}

fn cell_number(cell: &Data) -> Option<Decimal> {
    match cell {
        Data::Float(f) => Decimal::from_f64(*f),
        Data::Int(i) => Some(Decimal::from(*i)),
        Data::String(s) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    }
}

/// Name of the sheet that holds the fund.
pub fn choose_sheet(names: &[String], request: &DisclosureRequest) -> Result<String, SourceError> {
    let source_name = request.profile.id;
    let by_keywords = || {
        names
            .iter()
            .find(|name| {
                let lower = name.to_lowercase();
                request
                    .sheet_keywords
                    .iter()
                    .any(|keyword| lower.contains(&keyword.to_lowercase()))
            })
            .cloned()
    };

    let chosen = match request.profile.sheet {
        SheetChoice::First => names.first().cloned(),
        SheetChoice::SchemeNameOrFirst => {
            let scheme = request.scheme_name.to_lowercase();
            names
                .iter()
                .find(|name| name.to_lowercase().contains(&scheme))
                .or_else(|| names.first())
                .cloned()
        }
        SheetChoice::Code => request
            .sheet_code
            .as_ref()
            .and_then(|code| names.iter().find(|name| *name == code))
            .cloned(),
        SheetChoice::Keywords => by_keywords(),
        SheetChoice::SingleOrKeywords if names.len() == 1 => names.first().cloned(),
        SheetChoice::SingleOrKeywords => by_keywords(),
    };

    chosen.ok_or_else(|| {
        SourceError::not_found(
            source_name,
            format!(
                "no sheet for '{}' among {} sheets",
                request.sheet_code.as_deref().unwrap_or(&request.scheme_name),
                names.len()
            ),
        )
    })
}

/// Positions of the security name and percentage columns, and the first
/// data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Columns {
    pub name: usize,
    pub pct: usize,
    pub data_start: usize,
}

pub fn locate_columns(grid: &SheetGrid, profile: &AmcProfile) -> Result<Columns, SourceError> {
    let columns = match profile.layout {
        ColumnLayout::Fixed {
            name_col,
            pct_col,
            data_start,
        } => Some(Columns {
            name: name_col,
            pct: pct_col,
            data_start,
        }),
        ColumnLayout::FirstRowHeader => first_row_header(grid),
        ColumnLayout::AutoDetect => detect_header(grid),
    };
    columns.ok_or_else(|| SourceError::not_found(profile.id, "could not identify name and % columns"))
}

fn first_row_header(grid: &SheetGrid) -> Option<Columns> {
    let mut name = None;
    let mut pct = None;
    for (col, cell) in grid.row(0).iter().enumerate() {
        let Some(header) = cell_text(cell).map(|t| t.to_lowercase()) else {
            continue;
        };
        if header.contains('%') && (header.contains("nav") || header.contains("total")) {
            pct = Some(col);
        }
        if header.contains("security") || header.contains("name") || header.contains("company") {
            name = Some(col);
        }
    }
    Some(Columns {
        name: name?,
        pct: pct?,
        data_start: 1,
    })
}

fn detect_header(grid: &SheetGrid) -> Option<Columns> {
    for row in 0..grid.row_count().min(HEADER_SCAN_ROWS) {
        let cells: Vec<String> = grid
            .row(row)
            .iter()
            .map(|cell| cell_text(cell).unwrap_or_default().to_lowercase())
            .collect();
        let row_text = cells
            .iter()
            .filter(|c| !c.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(" ");

        let names_security = ["instrument", "security", "company"]
            .iter()
            .any(|k| row_text.contains(k));
        if !row_text.contains("name") || !names_security {
            continue;
        }

        let mut name = None;
        let mut pct = None;
        for (col, header) in cells.iter().enumerate() {
            if ["name", "instrument", "company"].iter().any(|k| header.contains(k)) {
                name = Some(col);
            }
            if header.contains('%')
                && ["nav", "portfolio", "asset"].iter().any(|k| header.contains(k))
            {
                pct = Some(col);
            }
        }
        if let (Some(name), Some(pct)) = (name, pct) {
            debug!("Header found on row {}: name col {}, % col {}", row, name, pct);
            return Some(Columns {
                name,
                pct,
                data_start: row + 1,
            });
        }
    }
    None
}

fn is_skipped(name: &str, profile: &AmcProfile) -> bool {
    let upper = name.to_uppercase();
    name.is_empty()
        || (profile.skip_paren_prefix && name.starts_with('('))
        || (profile.skip_paren_suffix && name.ends_with(')'))
        || profile.skip_keywords.iter().any(|k| upper.contains(k))
}

fn to_percent(value: Decimal, scale: PercentScale) -> Decimal {
    let hundred = Decimal::ONE_HUNDRED;
    match scale {
        PercentScale::Percent => value,
        PercentScale::Fraction => value * hundred,
        PercentScale::FractionBelowOne if value > Decimal::ZERO && value < Decimal::ONE => {
            value * hundred
        }
        PercentScale::FractionBelowOne => value,
    }
}

/// Holdings of at least `min_holding` percent, names normalised and
/// percentages rounded to one decimal.
pub fn extract_holdings(
    grid: &SheetGrid,
    columns: Columns,
    profile: &AmcProfile,
    min_holding: Decimal,
) -> Holdings {
    let mut holdings = Holdings::new();
    for row in columns.data_start..grid.row_count() {
        let Some(name) = grid.cell(row, columns.name).and_then(cell_text) else {
            continue;
        };
        let Some(value) = grid.cell(row, columns.pct).and_then(cell_number) else {
            continue;
        };

        let name = name.trim();
        if is_skipped(name, profile) {
            continue;
        }

        let pct = to_percent(value, profile.scale);
        if pct < min_holding || profile.max_pct.is_some_and(|max| pct > max) {
            continue;
        }
        holdings.insert(normalize_security_name(name, profile.strip), pct.round_dp(1));
    }
    holdings
}

/// Holdings for one fund from a downloaded workbook.
pub fn parse_workbook(
    bytes: Vec<u8>,
    request: &DisclosureRequest,
    min_holding: Decimal,
) -> Result<Holdings, SourceError> {
    let mut workbook = Workbook::open(bytes)?;
    let names = workbook.sheet_names();
    info!("{}: workbook has {} sheets", request.profile.id, names.len());

    let sheet = choose_sheet(&names, request)?;
    let grid = workbook.grid(&sheet)?;
    parse_grid(&grid, request, min_holding)
}

pub fn parse_grid(
    grid: &SheetGrid,
    request: &DisclosureRequest,
    min_holding: Decimal,
) -> Result<Holdings, SourceError> {
    let columns = locate_columns(grid, &request.profile)?;
    Ok(extract_holdings(grid, columns, &request.profile, min_holding))
}
