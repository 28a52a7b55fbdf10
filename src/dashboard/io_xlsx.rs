use crate::dashboard::*;

use calamine::{open_workbook, DataType, Reader, Xlsx};
use std::collections::BTreeMap;
use std::path::Path;

/// The optional worksheet holding the ceiling of each band.
pub const CEILINGS_SHEET: &str = "ceilings";

/// Reads a workbook with one worksheet per band, and optionally a
/// `ceilings` worksheet with `Band | Ceiling (MHz)` rows.
///
/// The version of the dataset is the stem of the file name.
pub fn read_xlsx_dataset(path: &str) -> DashboardResult<DatasetRegistry> {
    info!("Attempting to read workbook {:?}", path);
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    let version = Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string();

    let mut bands: BTreeMap<String, Vec<AllocationEntry>> = BTreeMap::new();
    let mut ceilings: BTreeMap<String, f64> = BTreeMap::new();
    for sheet in workbook.sheet_names().to_vec() {
        let wrange = workbook
            .worksheet_range(&sheet)
            .context(EmptyExcelSnafu {
                sheet: sheet.clone(),
            })?
            .context(OpeningExcelSnafu { path })?;

        let mut iter = wrange.rows();
        let header = iter.next().context(EmptyExcelSnafu {
            sheet: sheet.clone(),
        })?;
        debug!("read_xlsx_dataset: sheet {:?} header: {:?}", sheet, header);

        if sheet.trim().eq_ignore_ascii_case(CEILINGS_SHEET) {
            for (idx, row) in iter.enumerate() {
                let lineno = (idx + 2) as u64;
                if let Some((band, c)) = read_ceiling_row(&sheet, lineno, row)? {
                    ceilings.insert(band, c);
                }
            }
            debug!("read_xlsx_dataset: ceilings: {:?}", ceilings);
            continue;
        }

        let mut entries: Vec<AllocationEntry> = Vec::new();
        for (idx, row) in iter.enumerate() {
            // Header is row 1.
            let lineno = (idx + 2) as u64;
            if let Some(e) = read_allocation_row(&sheet, lineno, row)? {
                entries.push(e);
            }
        }
        debug!(
            "read_xlsx_dataset: sheet {:?}: {} allocations",
            sheet,
            entries.len()
        );
        bands.insert(sheet.trim().to_string(), entries);
    }

    let ds = DatasetFile {
        version,
        ceilings,
        bands,
    };
    build_registry(&ds)
}

static EMPTY_CELL: DataType = DataType::Empty;

fn cell_at(row: &[DataType], idx: usize) -> &DataType {
    row.get(idx).unwrap_or(&EMPTY_CELL)
}

fn wrong_cell(sheet: &str, lineno: u64, cell: &DataType) -> DashboardError {
    DashboardError::ExcelWrongCellType {
        sheet: sheet.to_string(),
        lineno,
        content: format!("{:?}", cell),
    }
}

/// Reads a `Region | Blocks | Quantum` row. Blank rows give `None`.
pub fn read_allocation_row(
    sheet: &str,
    lineno: u64,
    row: &[DataType],
) -> DashboardResult<Option<AllocationEntry>> {
    if row.iter().all(|c| matches!(c, DataType::Empty)) {
        return Ok(None);
    }
    let region = match cell_at(row, 0) {
        DataType::String(s) if !s.trim().is_empty() => s.trim().to_string(),
        c => return Err(wrong_cell(sheet, lineno, c)),
    };

    let blocks: Option<u32> = match cell_at(row, 1) {
        DataType::Empty => None,
        DataType::Int(i) => match u32::try_from(*i) {
            Ok(x) => Some(x),
            Err(_) => return Err(wrong_cell(sheet, lineno, cell_at(row, 1))),
        },
        DataType::Float(f) if *f >= 0.0 && *f <= u32::MAX as f64 && f.fract() == 0.0 => {
            Some(*f as u32)
        }
        DataType::String(s) if s.trim().is_empty() => None,
        DataType::String(s) => match s.trim().parse::<u32>() {
            Ok(x) => Some(x),
            Err(_) => return Err(wrong_cell(sheet, lineno, cell_at(row, 1))),
        },
        c => return Err(wrong_cell(sheet, lineno, c)),
    };

    let quantum_mhz: f64 = match cell_at(row, 2) {
        DataType::Float(f) => *f,
        DataType::Int(i) => *i as f64,
        DataType::String(s) => match s.trim().parse::<f64>() {
            Ok(x) => x,
            Err(_) => return Err(wrong_cell(sheet, lineno, cell_at(row, 2))),
        },
        c => return Err(wrong_cell(sheet, lineno, c)),
    };

    Ok(Some(AllocationEntry {
        region,
        blocks,
        quantum_mhz,
    }))
}

/// Reads a `Band | Ceiling (MHz)` row of the ceilings worksheet. Blank rows give `None`.
pub fn read_ceiling_row(
    sheet: &str,
    lineno: u64,
    row: &[DataType],
) -> DashboardResult<Option<(String, f64)>> {
    if row.iter().all(|c| matches!(c, DataType::Empty)) {
        return Ok(None);
    }
    let band = match cell_at(row, 0) {
        DataType::String(s) if !s.trim().is_empty() => s.trim().to_string(),
        c => return Err(wrong_cell(sheet, lineno, c)),
    };
    let ceiling_mhz: f64 = match cell_at(row, 1) {
        DataType::Float(f) => *f,
        DataType::Int(i) => *i as f64,
        DataType::String(s) => match s.trim().parse::<f64>() {
            Ok(x) => x,
            Err(_) => return Err(wrong_cell(sheet, lineno, cell_at(row, 1))),
        },
        c => return Err(wrong_cell(sheet, lineno, c)),
    };
    Ok(Some((band, ceiling_mhz)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(x: &str) -> DataType {
        DataType::String(x.to_string())
    }

    #[test]
    fn full_row() {
        let row = vec![s(" Delhi "), DataType::Int(4), DataType::Float(0.8)];
        let e = read_allocation_row("900MHz", 2, &row).unwrap().unwrap();
        assert_eq!(
            e,
            AllocationEntry {
                region: "Delhi".to_string(),
                blocks: Some(4),
                quantum_mhz: 0.8
            }
        );
    }

    #[test]
    fn blocks_not_published() {
        let row = vec![s("Delhi"), DataType::Empty, DataType::Int(450)];
        let e = read_allocation_row("26GHz", 3, &row).unwrap().unwrap();
        assert_eq!(e.blocks, None);
        assert_eq!(e.quantum_mhz, 450.0);

        // A blank string is an empty cell.
        let row = vec![s("Delhi"), s(""), s("12.5")];
        let e = read_allocation_row("26GHz", 3, &row).unwrap().unwrap();
        assert_eq!(e.blocks, None);
        assert_eq!(e.quantum_mhz, 12.5);
    }

    #[test]
    fn float_blocks() {
        let row = vec![s("Kerala"), DataType::Float(7.0), s("1.4")];
        let e = read_allocation_row("900MHz", 2, &row).unwrap().unwrap();
        assert_eq!(e.blocks, Some(7));
        assert_eq!(e.quantum_mhz, 1.4);

        let row = vec![s("Kerala"), DataType::Float(7.5), s("1.4")];
        assert!(read_allocation_row("900MHz", 2, &row).is_err());
    }

    #[test]
    fn oversized_blocks() {
        let row = vec![s("Delhi"), DataType::Int(u32::MAX as i64 + 1), DataType::Float(1.0)];
        assert!(matches!(
            read_allocation_row("800MHz", 3, &row),
            Err(DashboardError::ExcelWrongCellType { lineno: 3, .. })
        ));
        let row = vec![s("Delhi"), DataType::Int(-2), DataType::Float(1.0)];
        assert!(read_allocation_row("800MHz", 3, &row).is_err());
        let row = vec![s("Delhi"), DataType::Float(1e12), DataType::Float(1.0)];
        assert!(read_allocation_row("800MHz", 3, &row).is_err());

        let row = vec![s("Delhi"), DataType::Int(u32::MAX as i64), DataType::Float(1.0)];
        let e = read_allocation_row("800MHz", 3, &row).unwrap().unwrap();
        assert_eq!(e.blocks, Some(u32::MAX));
    }

    #[test]
    fn ceiling_rows() {
        let row = vec![s("800MHz"), DataType::Int(20)];
        assert_eq!(
            read_ceiling_row(CEILINGS_SHEET, 2, &row).unwrap(),
            Some(("800MHz".to_string(), 20.0))
        );
        let row = vec![s(" 26GHz "), s("3250")];
        assert_eq!(
            read_ceiling_row(CEILINGS_SHEET, 3, &row).unwrap(),
            Some(("26GHz".to_string(), 3250.0))
        );
        let row = vec![DataType::Empty, DataType::Empty];
        assert_eq!(read_ceiling_row(CEILINGS_SHEET, 4, &row).unwrap(), None);
        let row = vec![s("800MHz"), s("plenty")];
        assert!(matches!(
            read_ceiling_row(CEILINGS_SHEET, 5, &row),
            Err(DashboardError::ExcelWrongCellType { lineno: 5, .. })
        ));
    }

    #[test]
    fn ceilings_are_enforced() {
        // What the workbook reader hands over once the ceilings sheet is read.
        let mut ceilings = BTreeMap::new();
        let row = vec![s("800MHz"), DataType::Float(20.0)];
        let (band, c) = read_ceiling_row(CEILINGS_SHEET, 2, &row).unwrap().unwrap();
        ceilings.insert(band, c);
        let row = vec![s("Delhi"), DataType::Int(9), DataType::Float(22.5)];
        let entry = read_allocation_row("800MHz", 2, &row).unwrap().unwrap();
        let mut bands = BTreeMap::new();
        bands.insert("800MHz".to_string(), vec![entry]);
        let ds = DatasetFile {
            version: "t".to_string(),
            ceilings,
            bands,
        };
        assert!(matches!(
            build_registry(&ds),
            Err(DashboardError::InvalidDataset {
                source: SpectrumError::InvalidQuantum { .. }
            })
        ));
    }

    #[test]
    fn blank_row() {
        let row = vec![DataType::Empty, DataType::Empty, DataType::Empty];
        assert_eq!(read_allocation_row("800MHz", 5, &row).unwrap(), None);
    }

    #[test]
    fn wrong_cells() {
        let row = vec![DataType::Int(3), DataType::Int(1), DataType::Float(1.0)];
        let res = read_allocation_row("800MHz", 4, &row);
        assert!(matches!(
            res,
            Err(DashboardError::ExcelWrongCellType { lineno: 4, .. })
        ));

        // Missing quantum.
        let row = vec![s("Delhi"), DataType::Int(1)];
        assert!(matches!(
            read_allocation_row("800MHz", 7, &row),
            Err(DashboardError::ExcelWrongCellType { lineno: 7, .. })
        ));

        let row = vec![s("Delhi"), DataType::Int(1), s("a lot")];
        assert!(read_allocation_row("800MHz", 7, &row).is_err());
    }

    #[test]
    fn missing_workbook() {
        let res = read_xlsx_dataset("/nonexistent/auction.xlsx");
        assert!(matches!(res, Err(DashboardError::OpeningExcel { .. })));
    }
}
