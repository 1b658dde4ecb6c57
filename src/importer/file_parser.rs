// ==========================================
// SKU 对账与托盘分配 - 文件解析器实现
// ==========================================
// 职责: 文件 → 按位置寻址的行列表（不依赖表头名称）
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// ==========================================

use crate::domain::record::{RawRecord, SourceTable};
use crate::domain::types::CellValue;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始行（保留全部行，含表头与空行，保证行号与文件一致）
    fn parse_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>>;
}

/// 单元格文本处理方式
///
/// 来源文件去除首尾空白；主台账原样保留（非目标列必须逐字节写回）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellText {
    #[default]
    Trimmed,
    Verbatim,
}

impl CellText {
    fn apply(self, value: &str) -> CellValue {
        match self {
            CellText::Trimmed => CellValue::from_text(value.trim()),
            CellText::Verbatim => CellValue::from_text(value),
        }
    }
}

/// 检查文件存在
fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// CSV Parser 实现
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvParser {
    pub text: CellText,
}

impl FileParser for CsvParser {
    fn parse_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false) // 表头按普通行保留，由列配置决定跳过行数
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let cells = record
                .iter()
                .map(|value| self.text.apply(value))
                .collect();
            rows.push(RawRecord::new(cells));
        }

        Ok(rows)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcelParser {
    pub text: CellText,
}

impl ExcelParser {
    fn convert_cell(&self, cell: &Data) -> CellValue {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::Int(i) => CellValue::Int(*i),
            Data::Float(f) => CellValue::Float(*f),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::String(s) => self.text.apply(s),
            // 日期/错误等按显示文本保留
            other => self.text.apply(&other.to_string()),
        }
    }
}

impl FileParser for ExcelParser {
    fn parse_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRecord>> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;

        // 读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::EmptyWorkbook(file_path.display().to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        // calamine 的 Range 从第一个非空单元格开始，这里补齐偏移以保持绝对行列号
        let (row_offset, col_offset) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let mut rows: Vec<RawRecord> = (0..row_offset).map(|_| RawRecord::default()).collect();
        for data_row in range.rows() {
            let mut cells = vec![CellValue::Empty; col_offset];
            cells.extend(data_row.iter().map(|cell| self.convert_cell(cell)));
            rows.push(RawRecord::new(cells));
        }

        Ok(rows)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    /// 解析来源文件（单元格去首尾空白）
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<RawRecord>> {
        Self::parse_with(file_path.as_ref(), CellText::Trimmed)
    }

    /// 解析主台账（单元格原样保留）
    pub fn parse_ledger<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<RawRecord>> {
        Self::parse_with(file_path.as_ref(), CellText::Verbatim)
    }

    fn parse_with(path: &Path, text: CellText) -> ImportResult<Vec<RawRecord>> {
        match extension_of(path).as_str() {
            "csv" => CsvParser { text }.parse_rows(path),
            "xlsx" | "xls" => ExcelParser { text }.parse_rows(path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }

    /// 读取来源文件（名称取文件名，用于供应商识别）
    pub fn load_source<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<SourceTable> {
        let path = file_path.as_ref();
        let rows = self.parse(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        tracing::debug!(source = %name, rows = rows.len(), "来源文件已读取");
        Ok(SourceTable::new(name, rows))
    }
}
