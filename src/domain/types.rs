// ==========================================
// SKU 对账与托盘分配 - 领域类型定义
// ==========================================
// 职责: 单元格取值、分配模式等基础值类型
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 单元格取值 (Cell Value)
// ==========================================
// 来源表与主台账共用；核心只按 (行, 列) 读写，不解释样式/公式
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl CellValue {
    /// 是否为空单元格（空字符串/纯空白同样视为空）
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 由 CSV 文本构造（空串 → Empty）
    pub fn from_text(raw: &str) -> Self {
        if raw.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(raw.to_string())
        }
    }

    /// 文本形式（用于 key 提取与 CSV 写出）
    ///
    /// 整数值浮点数按整数输出（Excel 数字 5.0 → "5"）
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", *f as i64)
            }
            CellValue::Float(f) => f.to_string(),
            CellValue::Bool(b) => b.to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::from_text(value)
    }
}

impl From<u64> for CellValue {
    fn from(value: u64) -> Self {
        CellValue::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

// ==========================================
// 分配模式 (Allocation Mode)
// ==========================================
// PerRow: 每行从第一个托盘重新开始
// Global: 托盘剩余容量按台账行序跨行结转
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationMode {
    #[default]
    PerRow,
    Global,
}

impl fmt::Display for AllocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationMode::PerRow => write!(f, "per_row"),
            AllocationMode::Global => write!(f, "global"),
        }
    }
}

impl AllocationMode {
    /// 从字符串解析分配模式（大小写/连字符不敏感）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "per_row" | "perrow" | "row" => Some(AllocationMode::PerRow),
            "global" => Some(AllocationMode::Global),
            _ => None,
        }
    }
}
