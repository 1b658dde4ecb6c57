// ==========================================
// SKU 对账与托盘分配 - 运行配置
// ==========================================
// 职责: 单次运行的全部静态配置（托盘容量/分配模式/台账布局/列配置）
// 说明: 所有字段都有默认值，配置文件只需写需要覆写的部分
// ==========================================

use crate::config::column_profile::{ColumnProfile, ProfileRegistry};
use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::types::AllocationMode;
use serde::{Deserialize, Serialize};

/// 默认托盘容量
pub const DEFAULT_SLOT_CAPACITY: u64 = 30;

/// 默认合计列表头标记
pub const DEFAULT_TOTALS_MARKER: &str = "Total";

// ==========================================
// LedgerLayout - 主台账布局
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerLayout {
    /// SKU 所在列
    pub key_column: usize,

    /// 表头行（用于定位合计列标记）
    pub header_row: usize,

    /// 第一行数据；缺省为 header_row + 1
    pub first_data_row: Option<usize>,

    /// 直接指定合计列；缺省时扫描表头行查找 totals_marker
    pub totals_column: Option<usize>,

    /// 合计列表头标记（大小写不敏感、去空白后全等匹配）
    pub totals_marker: String,

    /// 找不到标记时是否在末尾追加合计列
    pub append_totals_column: bool,

    /// 第一个托盘列；缺省为合计列之后紧邻的列
    pub slot_start_column: Option<usize>,

    /// 托盘列数量（0 表示不做托盘分配）
    pub slot_count: usize,
}

impl Default for LedgerLayout {
    fn default() -> Self {
        Self {
            key_column: 0,
            header_row: 0,
            first_data_row: None,
            totals_column: None,
            totals_marker: DEFAULT_TOTALS_MARKER.to_string(),
            append_totals_column: false,
            slot_start_column: None,
            slot_count: 0,
        }
    }
}

impl LedgerLayout {
    /// 实际的第一行数据
    pub fn data_start_row(&self) -> usize {
        self.first_data_row.unwrap_or(self.header_row + 1)
    }
}

// ==========================================
// RunConfig - 运行配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// 每个托盘的固定容量
    pub slot_capacity: u64,

    /// 分配模式
    pub allocation_mode: AllocationMode,

    /// 主台账布局
    pub ledger: LedgerLayout,

    /// 自定义来源列配置（优先于内置配置匹配）
    pub profiles: Vec<ColumnProfile>,

    /// 自定义兜底配置
    pub fallback_profile: Option<ColumnProfile>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            slot_capacity: DEFAULT_SLOT_CAPACITY,
            allocation_mode: AllocationMode::PerRow,
            ledger: LedgerLayout::default(),
            profiles: Vec::new(),
            fallback_profile: None,
        }
    }
}

impl RunConfig {
    /// 构建来源列配置注册表
    pub fn profile_registry(&self) -> ProfileRegistry {
        ProfileRegistry::with_custom(self.profiles.clone(), self.fallback_profile.clone())
    }

    /// 托盘分配是否启用
    pub fn slots_enabled(&self) -> bool {
        self.ledger.slot_count > 0
    }

    /// 校验配置
    ///
    /// # 规则
    /// - slot_capacity > 0
    /// - 直接指定的合计列不能与 key 列重合
    /// - 显式托盘列区间不能覆盖 key 列 / 合计列
    /// - 列配置的 key 列与数量列不能相同
    pub fn validate(&self) -> ConfigResult<()> {
        if self.slot_capacity == 0 {
            return Err(ConfigError::InvalidCapacity(self.slot_capacity));
        }

        let layout = &self.ledger;
        if layout.data_start_row() <= layout.header_row {
            return Err(ConfigError::InvalidLayout(format!(
                "first_data_row ({}) 必须位于表头行 ({}) 之后",
                layout.data_start_row(),
                layout.header_row
            )));
        }

        if layout.totals_column == Some(layout.key_column) {
            return Err(ConfigError::InvalidLayout(format!(
                "合计列与 key 列重合: {}",
                layout.key_column
            )));
        }

        if let (Some(start), true) = (layout.slot_start_column, layout.slot_count > 0) {
            let slot_range = start..start.saturating_add(layout.slot_count);
            if slot_range.contains(&layout.key_column) {
                return Err(ConfigError::InvalidLayout(format!(
                    "托盘列区间 [{}, {}) 覆盖了 key 列 {}",
                    slot_range.start, slot_range.end, layout.key_column
                )));
            }
            if let Some(totals) = layout.totals_column {
                if slot_range.contains(&totals) {
                    return Err(ConfigError::InvalidLayout(format!(
                        "托盘列区间 [{}, {}) 覆盖了合计列 {}",
                        slot_range.start, slot_range.end, totals
                    )));
                }
            }
        }

        for profile in self.profiles.iter().chain(self.fallback_profile.iter()) {
            if profile.key_column == profile.quantity_column {
                return Err(ConfigError::InvalidProfile {
                    profile: profile.name.clone(),
                    message: format!("key 列与数量列相同: {}", profile.key_column),
                });
            }
        }

        Ok(())
    }
}
