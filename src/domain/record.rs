// ==========================================
// SKU 对账与托盘分配 - 来源记录领域模型
// ==========================================
// 职责: 原始行 / 标准化记录 / 汇总结果
// 生命周期: 单次运行内构造，运行结束即丢弃
// ==========================================

use crate::domain::types::CellValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// RawRecord - 来源表中的一行
// ==========================================
// 列位置 → 单元格；不依赖表头名称
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub cells: Vec<CellValue>,
}

impl RawRecord {
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// 按列位置取单元格（越界视为空）
    pub fn cell(&self, col: usize) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.cells.get(col).unwrap_or(&EMPTY)
    }

    /// 整行是否全部为空
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(CellValue::is_empty)
    }
}

// ==========================================
// SourceTable - 一个上传的供应商文件
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct SourceTable {
    /// 来源名称（通常为文件名，用于识别供应商类型）
    pub name: String,
    /// 全部行（含表头行，由 ColumnProfile.header_rows 决定跳过多少）
    pub rows: Vec<RawRecord>,
}

impl SourceTable {
    pub fn new(name: impl Into<String>, rows: Vec<RawRecord>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }
}

// ==========================================
// NormalizedRecord - 标准化 (key, quantity)
// ==========================================
// 不变式: quantity 恒为非负整数，无法解析时已被置 0
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub key: String,
    pub quantity: u64,
}

impl NormalizedRecord {
    pub fn new(key: impl Into<String>, quantity: u64) -> Self {
        Self {
            key: key.into(),
            quantity,
        }
    }
}

// ==========================================
// AggregateTotal - 按 key 汇总后的数量
// ==========================================
// BTreeMap 保证遍历顺序确定（报告/诊断输出稳定）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateTotal {
    totals: BTreeMap<String, u64>,
}

impl AggregateTotal {
    pub fn new() -> Self {
        Self::default()
    }

    /// 累加一个 key 的数量
    pub fn add(&mut self, key: &str, quantity: u64) {
        match self.totals.get_mut(key) {
            Some(total) => *total = total.saturating_add(quantity),
            None => {
                self.totals.insert(key.to_string(), quantity);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.totals.get(key).copied()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.totals.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// 全部 key 的数量之和
    pub fn grand_total(&self) -> u64 {
        self.totals.values().fold(0u64, |acc, v| acc.saturating_add(*v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.totals.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, u64)> for AggregateTotal {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut total = AggregateTotal::new();
        for (key, quantity) in iter {
            total.add(&key, quantity);
        }
        total
    }
}
