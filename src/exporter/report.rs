// ==========================================
// SKU 对账与托盘分配 - 运行报告
// ==========================================
// 职责: 汇总一次运行的输入、配置、诊断，序列化为 JSON
// ==========================================

use crate::config::run_config::RunConfig;
use crate::domain::diagnostics::RunDiagnostics;
use crate::domain::types::AllocationMode;
use crate::engine::orchestrator::RunOutcome;
use crate::exporter::error::{ExportError, ExportResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// 运行报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub ledger: String,
    pub output: Option<String>,
    pub allocation_mode: AllocationMode,
    pub slot_capacity: u64,
    pub slot_count: usize,
    pub totals_column: usize,
    /// 所有来源的数量合计
    pub grand_total: u64,
    /// 写入台账的数量合计
    pub matched_quantity: u64,
    /// 未匹配到台账的数量合计
    pub unmatched_quantity: u64,
    /// 分配到托盘的数量合计
    pub allocated_quantity: u64,
    pub diagnostics: RunDiagnostics,
}

impl RunReport {
    /// 由运行结果构造报告
    pub fn from_outcome(
        ledger: &str,
        output: Option<&Path>,
        config: &RunConfig,
        outcome: &RunOutcome,
    ) -> Self {
        let allocated_quantity: u64 = outcome
            .allocation
            .as_ref()
            .map(|pass| pass.slot_totals.iter().sum())
            .unwrap_or(0);

        Self {
            run_id: Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            ledger: ledger.to_string(),
            output: output.map(|p| p.display().to_string()),
            allocation_mode: config.allocation_mode,
            slot_capacity: config.slot_capacity,
            slot_count: config.ledger.slot_count,
            totals_column: outcome.layout.totals_column,
            grand_total: outcome.totals.grand_total(),
            matched_quantity: outcome.diagnostics.matched_quantity,
            unmatched_quantity: outcome.diagnostics.unmatched_quantity(),
            allocated_quantity,
            diagnostics: outcome.diagnostics.clone(),
        }
    }

    pub fn to_json(&self) -> ExportResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 写出 JSON 报告
    pub fn write_file(&self, path: &Path) -> ExportResult<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| ExportError::FileWriteError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        tracing::info!(path = %path.display(), run_id = %self.run_id, "运行报告已写出");
        Ok(())
    }
}
