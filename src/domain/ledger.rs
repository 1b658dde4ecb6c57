// ==========================================
// SKU 对账与托盘分配 - 主台账网格
// ==========================================
// 职责: 以 (行, 列) 定位的可写网格抽象
// 红线: 核心只写目标单元格（合计列/托盘列），其余内容原样透传
// ==========================================

use crate::domain::record::RawRecord;
use crate::domain::types::CellValue;

// ==========================================
// Trait: LedgerGrid
// ==========================================
// 用途: 对账/分配引擎访问台账的唯一接口
// 实现者: Grid（内存网格），其他文件表示可自行适配
pub trait LedgerGrid {
    /// 行数
    fn row_count(&self) -> usize;

    /// 某行的已用列数
    fn row_width(&self, row: usize) -> usize;

    /// 读取单元格（越界返回 None）
    fn cell(&self, row: usize, col: usize) -> Option<&CellValue>;

    /// 写入单元格；列越界时用空单元格补齐该行
    fn set_cell(&mut self, row: usize, col: usize, value: CellValue);

    /// 全部行的最大列数
    fn max_width(&self) -> usize {
        (0..self.row_count())
            .map(|r| self.row_width(r))
            .max()
            .unwrap_or(0)
    }
}

// ==========================================
// Grid - 内存网格实现
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    /// 由文本二维数组构造（测试与 CSV 读取共用）
    pub fn from_text_rows<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|s| CellValue::from_text(s.as_ref()))
                        .collect()
                })
                .collect(),
        }
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<CellValue>> {
        self.rows
    }
}

impl From<Vec<RawRecord>> for Grid {
    fn from(records: Vec<RawRecord>) -> Self {
        Self {
            rows: records.into_iter().map(|r| r.cells).collect(),
        }
    }
}

impl LedgerGrid for Grid {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn row_width(&self, row: usize) -> usize {
        self.rows.get(row).map(Vec::len).unwrap_or(0)
    }

    fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    fn set_cell(&mut self, row: usize, col: usize, value: CellValue) {
        if row >= self.rows.len() {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if col >= cells.len() {
            cells.resize(col + 1, CellValue::Empty);
        }
        cells[col] = value;
    }
}
