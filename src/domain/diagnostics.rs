// ==========================================
// SKU 对账与托盘分配 - 运行诊断
// ==========================================
// 职责: 收集所有可恢复异常，随主输出一起返回调用方
// 说明: 只有结构性错误会中止运行；其余情况全部落在这里
// ==========================================

use serde::{Deserialize, Serialize};

/// 来源文件的识别/提取摘要
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub name: String,
    /// 使用的列配置名称
    pub profile: String,
    /// 是否走了兜底配置
    pub fallback: bool,
    /// 提取出的记录数
    pub record_count: usize,
    /// 数量被强制置 0 或截断的单元格数
    pub coerced_quantity_cells: usize,
    /// 该来源的数量合计
    pub quantity_total: u64,
}

/// 来源中存在、主台账中不存在的 key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedKey {
    pub key: String,
    pub quantity: u64,
}

/// 托盘用尽导致的溢出记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverflowRecord {
    /// 台账行号（0 起）
    pub row: usize,
    pub key: String,
    pub total: u64,
    pub dropped: u64,
}

/// 在台账中重复出现的标准化 key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateKey {
    pub key: String,
    pub rows: Vec<usize>,
}

// ==========================================
// RunDiagnostics - 单次运行的诊断汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunDiagnostics {
    /// 无法识别类型、使用兜底列配置的来源
    pub unclassified_sources: Vec<String>,
    /// 每个来源的提取摘要
    pub sources: Vec<SourceSummary>,
    /// key 为空而被跳过的台账行
    pub skipped_ledger_rows: Vec<usize>,
    /// 台账中重复的 key
    pub duplicate_ledger_keys: Vec<DuplicateKey>,
    /// 来源中有、台账中没有的 key
    pub unmatched_source_keys: Vec<UnmatchedKey>,
    /// 写入台账的匹配数量合计（按去重后的 key 计）
    pub matched_quantity: u64,
    /// 托盘溢出明细
    pub overflow: Vec<OverflowRecord>,
    /// 托盘溢出丢弃总量
    pub overflow_dropped: u64,
}

impl RunDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// 未匹配 key 的数量合计
    pub fn unmatched_quantity(&self) -> u64 {
        self.unmatched_source_keys.iter().map(|u| u.quantity).sum()
    }

    /// 数量被强制转换的单元格总数
    pub fn coerced_quantity_cells(&self) -> usize {
        self.sources.iter().map(|s| s.coerced_quantity_cells).sum()
    }

    /// 是否存在任何需要关注的情况
    pub fn has_warnings(&self) -> bool {
        !self.unclassified_sources.is_empty()
            || !self.skipped_ledger_rows.is_empty()
            || !self.duplicate_ledger_keys.is_empty()
            || !self.unmatched_source_keys.is_empty()
            || self.overflow_dropped > 0
            || self.coerced_quantity_cells() > 0
    }
}
