// ==========================================
// SKU 对账与托盘分配 - 托盘领域模型
// ==========================================
// 职责: 托盘装载状态与单行分配结果
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// SlotState - 托盘装载游标
// ==========================================
// 按值在分配调用间传递（传入/返回），不做全局可变状态
// 单调推进: current_slot 只增不减
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotState {
    /// 当前正在装载的托盘下标
    pub current_slot: usize,
    /// 当前托盘已使用容量
    pub used_in_current: u64,
}

impl SlotState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 所有托盘是否已装满
    pub fn is_exhausted(&self, slot_count: usize) -> bool {
        self.current_slot >= slot_count
    }
}

// ==========================================
// SlotAssignment - 单行在各托盘上的分配
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAssignment {
    /// 按托盘顺序的分配量；None 表示该行未触及此托盘（写出为空单元格）
    pub slots: Vec<Option<u64>>,
    /// 托盘用尽后未能分配的数量
    pub dropped: u64,
}

impl SlotAssignment {
    /// 全部未触及的分配结果
    pub fn untouched(slot_count: usize) -> Self {
        Self {
            slots: vec![None; slot_count],
            dropped: 0,
        }
    }

    /// 实际分配到托盘的数量
    pub fn assigned_total(&self) -> u64 {
        self.slots.iter().flatten().sum()
    }

    /// 紧凑形式（去掉未触及的托盘，便于测试断言与日志）
    pub fn touched(&self) -> Vec<u64> {
        self.slots.iter().flatten().copied().collect()
    }
}
