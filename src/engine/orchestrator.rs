// ==========================================
// SKU 对账与托盘分配 - 引擎编排器
// ==========================================
// 流程: 来源 → 提取 → 汇总 → 对账（写合计列）→ 托盘分配（写托盘列）
// 说明: 单线程同步流水线；结构性错误在写入任何单元格之前返回
// ==========================================

use crate::config::run_config::RunConfig;
use crate::domain::diagnostics::RunDiagnostics;
use crate::domain::ledger::LedgerGrid;
use crate::domain::record::{AggregateTotal, NormalizedRecord, SourceTable};
use crate::engine::aggregator::aggregate;
use crate::engine::error::EngineResult;
use crate::engine::pallet_allocator::{AllocationPass, PalletAllocator};
use crate::engine::reconciler::{LedgerReconciler, ResolvedLayout};
use crate::importer::record_extractor::RecordExtractor;
use tracing::{debug, info};

// ==========================================
// RunOutcome - 单次运行结果
// ==========================================
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// 定位后的台账列
    pub layout: ResolvedLayout,
    /// 按 key 汇总的数量
    pub totals: AggregateTotal,
    /// 托盘分配结果（未启用时为 None）
    pub allocation: Option<AllocationPass>,
    /// 可恢复异常汇总
    pub diagnostics: RunDiagnostics,
}

// ==========================================
// ReconcileOrchestrator - 引擎编排器
// ==========================================
pub struct ReconcileOrchestrator {
    config: RunConfig,
    extractor: RecordExtractor,
    reconciler: LedgerReconciler,
}

impl ReconcileOrchestrator {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - config: 已校验的运行配置
    pub fn new(config: RunConfig) -> Self {
        Self {
            extractor: RecordExtractor::new(config.profile_registry()),
            reconciler: LedgerReconciler::new(config.ledger.clone()),
            config,
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// 执行完整流水线
    ///
    /// # 参数
    /// - ledger: 主台账网格（原地写入合计列/托盘列）
    /// - sources: 来源表（顺序不影响结果）
    ///
    /// # 返回
    /// - Ok(RunOutcome): 运行结果与诊断
    /// - Err: 结构性错误（台账无数据行/找不到合计列/托盘容量无效），此时台账未被修改
    pub fn run<G: LedgerGrid>(
        &self,
        ledger: &mut G,
        sources: &[SourceTable],
    ) -> EngineResult<RunOutcome> {
        info!(
            sources = sources.len(),
            ledger_rows = ledger.row_count(),
            mode = %self.config.allocation_mode,
            "开始对账"
        );

        // 0. 写入前完成所有结构校验
        let allocator = if self.config.slots_enabled() {
            Some(PalletAllocator::new(
                self.config.slot_capacity,
                self.config.ledger.slot_count,
            )?)
        } else {
            None
        };
        let layout = self.reconciler.resolve_layout(ledger)?;

        let mut diagnostics = RunDiagnostics::new();

        // 1. 提取
        let mut records: Vec<NormalizedRecord> = Vec::new();
        for source in sources {
            let extraction = self.extractor.extract_source(source);
            if extraction.summary.fallback {
                diagnostics.unclassified_sources.push(source.name.clone());
            }
            diagnostics.sources.push(extraction.summary);
            records.extend(extraction.records);
        }
        debug!(records = records.len(), "来源记录提取完成");

        // 2. 汇总
        let totals = aggregate(&records);
        debug!(keys = totals.len(), grand_total = totals.grand_total(), "汇总完成");

        // 3. 对账
        let outcome = self.reconciler.reconcile(ledger, &layout, &totals);
        diagnostics.skipped_ledger_rows = outcome.skipped_rows;
        diagnostics.duplicate_ledger_keys = outcome.duplicate_keys;
        diagnostics.unmatched_source_keys = outcome.unmatched_source_keys;
        diagnostics.matched_quantity = outcome.matched_quantity;

        // 4. 托盘分配
        let allocation = match (allocator, layout.slot_columns.as_ref()) {
            (Some(allocator), Some(slot_columns)) => {
                let pass = allocator.allocate_rows(self.config.allocation_mode, &outcome.rows);
                allocator.write_assignments(ledger, slot_columns, &pass);
                diagnostics.overflow = pass.overflow.clone();
                diagnostics.overflow_dropped = pass.dropped;
                Some(pass)
            }
            _ => None,
        };

        info!(
            reconciled_rows = outcome.rows.len(),
            skipped_rows = diagnostics.skipped_ledger_rows.len(),
            unmatched_keys = diagnostics.unmatched_source_keys.len(),
            overflow_dropped = diagnostics.overflow_dropped,
            "对账完成"
        );

        Ok(RunOutcome {
            layout,
            totals,
            allocation,
            diagnostics,
        })
    }
}
