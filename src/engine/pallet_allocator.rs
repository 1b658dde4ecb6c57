// ==========================================
// SKU 对账与托盘分配 - 托盘分配引擎
// ==========================================
// 策略: 首次适配，从左到右顺序装载，不重排、不均衡
// 输入: 每行合计 + 固定容量的有序托盘 + 装载游标
// 输出: 每行在各托盘上的分配量
// 红线: 单个托盘累计装载量不超过容量；托盘用尽后的余量丢弃并上报
// ==========================================

use crate::domain::diagnostics::OverflowRecord;
use crate::domain::ledger::LedgerGrid;
use crate::domain::pallet::{SlotAssignment, SlotState};
use crate::domain::types::{AllocationMode, CellValue};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::reconciler::ReconciledRow;
use std::ops::Range;
use tracing::instrument;

/// 单次分配遍历的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationPass {
    /// (台账行号, 分配结果)，按台账行序
    pub assignments: Vec<(usize, SlotAssignment)>,
    /// 每个托盘列的累计分配量
    pub slot_totals: Vec<u64>,
    /// 溢出明细
    pub overflow: Vec<OverflowRecord>,
    /// 溢出丢弃总量
    pub dropped: u64,
    /// 遍历结束时的游标
    pub final_state: SlotState,
}

// ==========================================
// PalletAllocator - 托盘分配引擎
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PalletAllocator {
    capacity: u64,
    slot_count: usize,
}

impl PalletAllocator {
    /// 构造函数
    ///
    /// # 参数
    /// - `capacity`: 每个托盘的固定容量（整次运行不变）
    /// - `slot_count`: 托盘数量
    pub fn new(capacity: u64, slot_count: usize) -> EngineResult<Self> {
        if capacity == 0 {
            return Err(EngineError::InvalidSlotCapacity(capacity));
        }
        Ok(Self {
            capacity,
            slot_count,
        })
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 单行分配
    ///
    /// 从 state.current_slot 开始逐个托盘装载:
    /// 1) space_left = 容量 - 当前托盘已用
    /// 2) assign = min(space_left, remaining)，累加到该托盘在本行的分配量
    /// 3) 当前托盘装满则推进到下一个托盘
    /// 4) 托盘用尽仍有余量时，余量记为 dropped
    ///
    /// total == 0 时不触及任何托盘，游标不变
    pub fn allocate(&self, total: u64, state: SlotState) -> (SlotAssignment, SlotState) {
        let mut state = state;
        let mut assignment = SlotAssignment::untouched(self.slot_count);
        let mut remaining = total;

        while remaining > 0 && !state.is_exhausted(self.slot_count) {
            let space_left = self.capacity.saturating_sub(state.used_in_current);
            let assign = space_left.min(remaining);

            if assign > 0 {
                let slot = &mut assignment.slots[state.current_slot];
                *slot = Some(slot.unwrap_or(0) + assign);
            }

            remaining -= assign;
            state.used_in_current += assign;

            if state.used_in_current >= self.capacity {
                state.current_slot += 1;
                state.used_in_current = 0;
            }
        }

        assignment.dropped = remaining;
        (assignment, state)
    }

    /// 按台账行序分配全部行
    ///
    /// - PerRow: 每行开始前游标重置为 (0, 0)
    /// - Global: 游标在整个遍历中延续，同一托盘可由前一行的尾部和后一行的头部共享
    #[instrument(skip(self, rows), fields(
        rows = rows.len(),
        mode = %mode,
        capacity = self.capacity,
        slot_count = self.slot_count
    ))]
    pub fn allocate_rows(&self, mode: AllocationMode, rows: &[ReconciledRow]) -> AllocationPass {
        let mut pass = AllocationPass {
            slot_totals: vec![0; self.slot_count],
            ..AllocationPass::default()
        };
        let mut state = SlotState::new();

        for row in rows {
            if mode == AllocationMode::PerRow {
                state = SlotState::new();
            }

            let (assignment, next_state) = self.allocate(row.total, state);
            state = next_state;

            for (slot_total, assigned) in pass.slot_totals.iter_mut().zip(&assignment.slots) {
                *slot_total += assigned.unwrap_or(0);
            }

            if assignment.dropped > 0 {
                tracing::warn!(
                    row = row.row,
                    key = %row.key,
                    total = row.total,
                    dropped = assignment.dropped,
                    "托盘容量不足，超出部分未分配"
                );
                pass.dropped = pass.dropped.saturating_add(assignment.dropped);
                pass.overflow.push(OverflowRecord {
                    row: row.row,
                    key: row.key.clone(),
                    total: row.total,
                    dropped: assignment.dropped,
                });
            }

            pass.assignments.push((row.row, assignment));
        }

        pass.final_state = state;
        pass
    }

    /// 把分配结果写入托盘列
    ///
    /// 分配量写为整数；未触及的托盘写为空单元格（与"分配了 0"区分）
    pub fn write_assignments<G: LedgerGrid>(
        &self,
        grid: &mut G,
        slot_columns: &Range<usize>,
        pass: &AllocationPass,
    ) {
        for (row, assignment) in &pass.assignments {
            for (col, assigned) in slot_columns.clone().zip(&assignment.slots) {
                let value = match assigned {
                    Some(v) => CellValue::from(*v),
                    None => CellValue::Empty,
                };
                grid.set_cell(*row, col, value);
            }
        }
    }
}
