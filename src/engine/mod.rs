// ==========================================
// SKU 对账与托盘分配 - 引擎层
// ==========================================
// 职责: 汇总、对账、托盘分配及其编排
// 红线: 引擎不做文件读写；所有可恢复异常进入诊断，不中止运行
// ==========================================

pub mod aggregator;
pub mod error;
pub mod orchestrator;
pub mod pallet_allocator;
pub mod reconciler;

// 重导出核心引擎
pub use aggregator::aggregate;
pub use error::{EngineError, EngineResult};
pub use orchestrator::{ReconcileOrchestrator, RunOutcome};
pub use pallet_allocator::{AllocationPass, PalletAllocator};
pub use reconciler::{LedgerReconciler, ReconcileOutcome, ReconciledRow, ResolvedLayout};
