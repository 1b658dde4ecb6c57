// ==========================================
// SKU 对账与托盘分配 - 数据清洗器实现
// ==========================================
// 职责: 单元格 → key 文本 / 非负整数数量
// 规则: 无法解析的数量按 0 处理，不中止运行（计入诊断）
// ==========================================

use crate::domain::types::CellValue;

/// 数量解析结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityParse {
    pub quantity: u64,
    /// 是否发生了强制转换（置 0 或截断小数）
    pub coerced: bool,
}

impl QuantityParse {
    fn exact(quantity: u64) -> Self {
        Self {
            quantity,
            coerced: false,
        }
    }

    fn coerced(quantity: u64) -> Self {
        Self {
            quantity,
            coerced: true,
        }
    }
}

pub struct DataCleaner;

impl DataCleaner {
    /// 单元格转 key 文本（TRIM；Excel 整数值浮点数不带 ".0"）
    pub fn stringify_cell(&self, cell: &CellValue) -> String {
        cell.to_text().trim().to_string()
    }

    /// 解析数量
    ///
    /// # 规则
    /// - 空值 / 非数字文本 / 布尔 → 0
    /// - 负数 → 0
    /// - 小数 → 向零截断
    pub fn parse_quantity(&self, cell: &CellValue) -> QuantityParse {
        match cell {
            CellValue::Int(i) => Self::from_i64(*i),
            CellValue::Float(f) => Self::from_f64(*f),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if let Ok(i) = trimmed.parse::<i64>() {
                    Self::from_i64(i)
                } else if let Ok(f) = trimmed.parse::<f64>() {
                    Self::from_f64(f)
                } else {
                    QuantityParse::coerced(0)
                }
            }
            CellValue::Empty | CellValue::Bool(_) => QuantityParse::coerced(0),
        }
    }

    fn from_i64(value: i64) -> QuantityParse {
        match u64::try_from(value) {
            Ok(q) => QuantityParse::exact(q),
            Err(_) => QuantityParse::coerced(0),
        }
    }

    fn from_f64(value: f64) -> QuantityParse {
        if !value.is_finite() || value < 0.0 {
            return QuantityParse::coerced(0);
        }
        let truncated = value.trunc();
        QuantityParse {
            quantity: truncated as u64,
            coerced: truncated != value,
        }
    }
}
