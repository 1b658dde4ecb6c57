// ==========================================
// SKU 对账与托盘分配 - 引擎错误类型
// ==========================================
// 说明: 只有结构性错误会中止运行，且中止时不产生任何部分输出
// ==========================================

use thiserror::Error;

/// 引擎错误类型（结构性错误）
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    #[error("主台账没有数据行 (总行数 {row_count}, 数据起始行 {data_start_row})")]
    EmptyLedger {
        row_count: usize,
        data_start_row: usize,
    },

    #[error("主台账表头行越界: header_row={header_row}, 总行数 {row_count}")]
    HeaderRowOutOfRange { header_row: usize, row_count: usize },

    #[error("未找到合计列标记 (表头行 {header_row}, 标记 \"{marker}\")")]
    TotalsMarkerNotFound { header_row: usize, marker: String },

    #[error("合计列与 key 列重合: {0}")]
    TotalsColumnIsKeyColumn(usize),

    #[error("托盘列区间 [{start}, {end}) 覆盖了{role}列 {column}")]
    SlotColumnsOverlap {
        start: usize,
        end: usize,
        column: usize,
        role: String,
    },

    #[error("托盘列区间越界: 起始列 {start}, 数量 {slot_count}")]
    SlotRangeOverflow { start: usize, slot_count: usize },

    #[error("托盘容量必须大于 0: {0}")]
    InvalidSlotCapacity(u64),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
