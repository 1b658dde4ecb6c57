// ==========================================
// SKU 对账与托盘分配 - 主台账对账引擎
// ==========================================
// 输入: 主台账网格 + 汇总结果
// 输出: 合计列写入后的台账（同一网格，行序不变）+ 对账结果
// 红线: 只写合计列；key 为空的行完全不动；其他列逐字节保留
// ==========================================

use crate::config::run_config::LedgerLayout;
use crate::domain::diagnostics::{DuplicateKey, UnmatchedKey};
use crate::domain::ledger::LedgerGrid;
use crate::domain::record::AggregateTotal;
use crate::domain::types::CellValue;
use crate::engine::error::{EngineError, EngineResult};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::key_normalizer::normalize;
use std::collections::{BTreeMap, HashSet};
use std::ops::Range;
use tracing::instrument;

// ==========================================
// ResolvedLayout - 定位后的台账列
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLayout {
    pub key_column: usize,
    pub data_start_row: usize,
    pub totals_column: usize,
    /// 托盘列区间（未启用时为 None）
    pub slot_columns: Option<Range<usize>>,
}

/// 单行对账结果（只包含参与对账的行）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledRow {
    /// 台账行号（0 起）
    pub row: usize,
    /// 标准化后的 key
    pub key: String,
    /// 写入合计列的数量
    pub total: u64,
    /// 是否在汇总中找到
    pub matched: bool,
}

/// 对账结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// 按台账行序排列
    pub rows: Vec<ReconciledRow>,
    /// key 为空被跳过的行
    pub skipped_rows: Vec<usize>,
    /// 汇总中有、台账中没有的 key
    pub unmatched_source_keys: Vec<UnmatchedKey>,
    /// 台账中重复的 key
    pub duplicate_keys: Vec<DuplicateKey>,
    /// 匹配到台账的数量合计（按去重后的 key 计）
    pub matched_quantity: u64,
}

// ==========================================
// LedgerReconciler - 对账引擎
// ==========================================
pub struct LedgerReconciler {
    layout: LedgerLayout,
}

impl LedgerReconciler {
    pub fn new(layout: LedgerLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &LedgerLayout {
        &self.layout
    }

    /// 定位合计列与托盘列
    ///
    /// # 规则
    /// 1) 表头行必须存在（否则 HeaderRowOutOfRange）
    /// 2) 数据起始行之后必须至少有一行（否则 EmptyLedger）
    /// 3) 配置了 totals_column 时直接使用
    /// 4) 否则在表头行查找 totals_marker（TRIM 后大小写不敏感全等）
    /// 5) 找不到且 append_totals_column=true 时，在最右侧追加一列并写入标记
    /// 6) 托盘列缺省紧跟合计列
    /// 7) 合计列不能是 key 列；托盘列区间不能覆盖 key 列或合计列
    ///
    /// 出错时不修改网格（追加列标记在全部校验通过后才写入）
    pub fn resolve_layout<G: LedgerGrid>(&self, grid: &mut G) -> EngineResult<ResolvedLayout> {
        let layout = &self.layout;
        let row_count = grid.row_count();
        let data_start_row = layout.data_start_row();

        if layout.header_row >= row_count {
            return Err(EngineError::HeaderRowOutOfRange {
                header_row: layout.header_row,
                row_count,
            });
        }

        if row_count <= data_start_row {
            return Err(EngineError::EmptyLedger {
                row_count,
                data_start_row,
            });
        }

        let (totals_column, append) = match layout.totals_column {
            Some(col) => (col, false),
            None => match self.find_marker(grid) {
                Some(col) => (col, false),
                None if layout.append_totals_column => (grid.max_width(), true),
                None => {
                    return Err(EngineError::TotalsMarkerNotFound {
                        header_row: layout.header_row,
                        marker: layout.totals_marker.clone(),
                    })
                }
            },
        };

        if totals_column == layout.key_column {
            return Err(EngineError::TotalsColumnIsKeyColumn(totals_column));
        }

        let slot_columns = if layout.slot_count > 0 {
            let start = layout
                .slot_start_column
                .unwrap_or_else(|| totals_column.saturating_add(1));
            let end = start
                .checked_add(layout.slot_count)
                .ok_or(EngineError::SlotRangeOverflow {
                    start,
                    slot_count: layout.slot_count,
                })?;
            let range = start..end;
            for (column, role) in [(layout.key_column, "key"), (totals_column, "合计")] {
                if range.contains(&column) {
                    return Err(EngineError::SlotColumnsOverlap {
                        start,
                        end,
                        column,
                        role: role.to_string(),
                    });
                }
            }
            Some(range)
        } else {
            None
        };

        if append {
            grid.set_cell(
                layout.header_row,
                totals_column,
                CellValue::Text(layout.totals_marker.clone()),
            );
            tracing::info!(column = totals_column, marker = %layout.totals_marker, "未找到合计列，已追加");
        }

        Ok(ResolvedLayout {
            key_column: layout.key_column,
            data_start_row,
            totals_column,
            slot_columns,
        })
    }

    /// 在表头行查找合计列标记
    fn find_marker<G: LedgerGrid>(&self, grid: &G) -> Option<usize> {
        let marker = self.layout.totals_marker.trim().to_lowercase();
        let header_row = self.layout.header_row;
        (0..grid.row_width(header_row)).find(|&col| {
            grid.cell(header_row, col)
                .map(|cell| cell.to_text().trim().to_lowercase() == marker)
                .unwrap_or(false)
        })
    }

    /// 读取一行的标准化 key（空 key 返回 None）
    pub fn row_key<G: LedgerGrid>(grid: &G, row: usize, key_column: usize) -> Option<String> {
        let raw = grid
            .cell(row, key_column)
            .map(|cell| DataCleaner.stringify_cell(cell))
            .unwrap_or_default();
        if raw.is_empty() {
            None
        } else {
            Some(normalize(&raw))
        }
    }

    /// 对账：把汇总写入合计列
    ///
    /// # 规则
    /// - 找到: 写入汇总数量
    /// - 找不到: 写入 0（台账 SKU 无销售是正常情况）
    /// - key 为空: 整行不动（含合计列）
    #[instrument(skip(self, grid, layout, totals), fields(
        rows = grid.row_count(),
        keys = totals.len(),
        totals_column = layout.totals_column
    ))]
    pub fn reconcile<G: LedgerGrid>(
        &self,
        grid: &mut G,
        layout: &ResolvedLayout,
        totals: &AggregateTotal,
    ) -> ReconcileOutcome {
        let mut outcome = ReconcileOutcome::default();
        let mut key_rows: BTreeMap<String, Vec<usize>> = BTreeMap::new();

        for row in layout.data_start_row..grid.row_count() {
            let key = match Self::row_key(grid, row, layout.key_column) {
                Some(k) => k,
                None => {
                    outcome.skipped_rows.push(row);
                    continue;
                }
            };

            let found = totals.get(&key);
            let total = found.unwrap_or(0);
            grid.set_cell(row, layout.totals_column, CellValue::from(total));

            key_rows.entry(key.clone()).or_default().push(row);
            outcome.rows.push(ReconciledRow {
                row,
                key,
                total,
                matched: found.is_some(),
            });
        }

        let ledger_keys: HashSet<&str> = key_rows.keys().map(String::as_str).collect();
        for (key, quantity) in totals.iter() {
            if ledger_keys.contains(key) {
                outcome.matched_quantity = outcome.matched_quantity.saturating_add(quantity);
            } else {
                outcome.unmatched_source_keys.push(UnmatchedKey {
                    key: key.to_string(),
                    quantity,
                });
            }
        }

        outcome.duplicate_keys = key_rows
            .into_iter()
            .filter(|(_, rows)| rows.len() > 1)
            .map(|(key, rows)| DuplicateKey { key, rows })
            .collect();

        if !outcome.skipped_rows.is_empty() {
            tracing::debug!(count = outcome.skipped_rows.len(), "key 为空的台账行已跳过");
        }
        if !outcome.unmatched_source_keys.is_empty() {
            tracing::warn!(
                count = outcome.unmatched_source_keys.len(),
                "部分来源 SKU 在主台账中不存在"
            );
        }

        outcome
    }
}
