// ==========================================
// SKU 对账与托盘分配 - 领域模型层
// ==========================================
// 职责: 定义记录、台账网格、托盘状态、诊断等领域类型
// 红线: 不含文件读写逻辑,不含引擎逻辑
// ==========================================

pub mod diagnostics;
pub mod ledger;
pub mod pallet;
pub mod record;
pub mod types;

// 重导出核心类型
pub use diagnostics::{DuplicateKey, OverflowRecord, RunDiagnostics, SourceSummary, UnmatchedKey};
pub use ledger::{Grid, LedgerGrid};
pub use pallet::{SlotAssignment, SlotState};
pub use record::{AggregateTotal, NormalizedRecord, RawRecord, SourceTable};
pub use types::{AllocationMode, CellValue};
