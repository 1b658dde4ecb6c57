// ==========================================
// SKU 对账与托盘分配 - 核心库
// ==========================================
// 流程: 供应商表格 → SKU 标准化 → 汇总 → 写入主台账 → 托盘分配
// 系统定位: 单次运行的纯函数流水线，不持久化任何状态
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 记录/台账/托盘/诊断
pub mod domain;

// 配置层 - 列配置与运行配置
pub mod config;

// 导入层 - 表格读取与记录提取
pub mod importer;

// 引擎层 - 汇总/对账/托盘分配
pub mod engine;

// 导出层 - 台账与报告写出
pub mod exporter;

// API 层 - 业务接口
pub mod api;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    AggregateTotal, AllocationMode, CellValue, Grid, LedgerGrid, NormalizedRecord, RawRecord,
    RunDiagnostics, SlotAssignment, SlotState, SourceTable,
};

pub use config::{ColumnProfile, ConfigManager, LedgerLayout, ProfileRegistry, RunConfig};

pub use importer::{extract, normalize, RecordExtractor};

pub use engine::{
    aggregate, LedgerReconciler, PalletAllocator, ReconcileOrchestrator, RunOutcome,
};

pub use api::{ApiError, ApiResult, ReconcileApi, ReconcileRequest, ReconcileResponse};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "SKU 对账与托盘分配";
