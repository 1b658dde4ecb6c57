// ==========================================
// SKU 对账与托盘分配 - 导出层
// ==========================================
// 职责: 台账 CSV 写出、运行报告 JSON 写出
// ==========================================

pub mod error;
pub mod ledger_writer;
pub mod report;

pub use error::{ExportError, ExportResult};
pub use ledger_writer::{LedgerWriter, OutputFormat, OUTPUT_SUFFIX};
pub use report::RunReport;
