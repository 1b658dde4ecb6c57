// ==========================================
// SKU 对账与托盘分配 - 台账写出
// ==========================================
// 职责: 把处理后的台账网格按原行序写回
// 格式: 按输出文件扩展名选择 XLSX 或 CSV（Excel 台账默认写回 XLSX）
// ==========================================

use crate::domain::ledger::LedgerGrid;
use crate::domain::types::CellValue;
use crate::exporter::error::{ExportError, ExportResult};
use csv::WriterBuilder;
use rust_xlsxwriter::{ColNum, RowNum, Workbook};
use std::io::Write;
use std::path::{Path, PathBuf};

/// 默认输出文件名后缀（不含扩展名）
pub const OUTPUT_SUFFIX: &str = "_with_totals";

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Xlsx,
}

impl OutputFormat {
    /// 按扩展名判断（xlsx/xls → Xlsx，其余 → Csv）
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "xlsx" | "xls" => OutputFormat::Xlsx,
            _ => OutputFormat::Csv,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Xlsx => "xlsx",
        }
    }
}

pub struct LedgerWriter;

impl LedgerWriter {
    /// CSV 写出到任意 Writer（行长度按原样保留）
    pub fn write_to<G: LedgerGrid, W: Write>(&self, grid: &G, writer: W) -> ExportResult<()> {
        let mut csv_writer = WriterBuilder::new().flexible(true).from_writer(writer);

        for row in 0..grid.row_count() {
            let record: Vec<String> = (0..grid.row_width(row))
                .map(|col| grid.cell(row, col).map(|c| c.to_text()).unwrap_or_default())
                .collect();
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush().map_err(|e| ExportError::FileWriteError {
            path: "<writer>".to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// XLSX 写出（单个工作表；数值写为数字，文本原样写入）
    pub fn write_xlsx<G: LedgerGrid>(&self, grid: &G, path: &Path) -> ExportResult<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        for row in 0..grid.row_count() {
            let xl_row = RowNum::try_from(row).map_err(|_| ExportError::SheetTooLarge {
                row,
                col: 0,
            })?;
            for col in 0..grid.row_width(row) {
                let cell = match grid.cell(row, col) {
                    Some(cell) => cell,
                    None => continue,
                };
                let xl_col = ColNum::try_from(col)
                    .map_err(|_| ExportError::SheetTooLarge { row, col })?;
                match cell {
                    CellValue::Empty => {}
                    CellValue::Text(s) => {
                        worksheet.write_string(xl_row, xl_col, s.as_str())?;
                    }
                    CellValue::Int(i) => {
                        worksheet.write_number(xl_row, xl_col, *i as f64)?;
                    }
                    CellValue::Float(f) => {
                        worksheet.write_number(xl_row, xl_col, *f)?;
                    }
                    CellValue::Bool(b) => {
                        worksheet.write_boolean(xl_row, xl_col, *b)?;
                    }
                }
            }
        }

        workbook.save(path)?;
        Ok(())
    }

    /// 写出到文件（格式由扩展名决定）
    pub fn write_file<G: LedgerGrid>(&self, grid: &G, path: &Path) -> ExportResult<()> {
        let format = OutputFormat::from_path(path);
        match format {
            OutputFormat::Xlsx => self.write_xlsx(grid, path)?,
            OutputFormat::Csv => {
                let file = std::fs::File::create(path).map_err(|e| ExportError::FileWriteError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
                self.write_to(grid, file)?;
            }
        }
        tracing::info!(
            path = %path.display(),
            format = format.extension(),
            rows = grid.row_count(),
            "台账已写出"
        );
        Ok(())
    }

    /// 默认输出路径: 与台账同目录，<台账文件名>_with_totals.<xlsx|csv>
    ///
    /// Excel 台账写回 XLSX（.xls 也写为 .xlsx），其余写 CSV
    pub fn default_output_path(ledger_path: &Path) -> PathBuf {
        let stem = ledger_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "ledger".to_string());
        let ext = OutputFormat::from_path(ledger_path).extension();
        ledger_path.with_file_name(format!("{}{}.{}", stem, OUTPUT_SUFFIX, ext))
    }
}
