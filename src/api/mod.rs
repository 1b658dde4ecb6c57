// ==========================================
// SKU 对账与托盘分配 - API 层
// ==========================================
// 职责: 面向 CLI / 嵌入调用方的业务接口
// ==========================================

pub mod error;
pub mod reconcile_api;

pub use error::{ApiError, ApiResult};
pub use reconcile_api::{ReconcileApi, ReconcileRequest, ReconcileResponse};
