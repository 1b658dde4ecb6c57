// ==========================================
// SKU 对账与托盘分配 - 对账 API
// ==========================================
// 职责: 文件路径 + 配置 → 读取 → 引擎流水线 → 写出台账/报告
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, RunConfig};
use crate::domain::ledger::Grid;
use crate::domain::record::SourceTable;
use crate::engine::ReconcileOrchestrator;
use crate::exporter::{LedgerWriter, RunReport};
use crate::importer::UniversalFileParser;
use std::path::{Path, PathBuf};

/// 对账请求
#[derive(Debug, Clone, Default)]
pub struct ReconcileRequest {
    /// 主台账文件
    pub ledger_path: PathBuf,
    /// 来源文件（顺序不影响结果）
    pub source_paths: Vec<PathBuf>,
    /// 输出台账路径；缺省为 <台账文件名>_with_totals.<xlsx|csv>（与台账格式一致）
    pub output_path: Option<PathBuf>,
    /// JSON 报告路径；缺省不写报告
    pub report_path: Option<PathBuf>,
}

/// 对账响应
#[derive(Debug, Clone)]
pub struct ReconcileResponse {
    pub output_path: PathBuf,
    pub report: RunReport,
}

// ==========================================
// ReconcileApi
// ==========================================
pub struct ReconcileApi {
    config: RunConfig,
    parser: UniversalFileParser,
}

impl ReconcileApi {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            parser: UniversalFileParser,
        }
    }

    /// 从配置文件（可选）+ 环境变量创建
    pub fn from_config_file(path: Option<&Path>) -> ApiResult<Self> {
        let config = ConfigManager::from_env().load(path)?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RunConfig {
        &mut self.config
    }

    /// 读取主台账
    pub fn load_ledger(&self, path: &Path) -> ApiResult<Grid> {
        Ok(Grid::from(self.parser.parse_ledger(path)?))
    }

    /// 读取全部来源文件（任一失败即返回错误）
    pub fn load_sources(&self, paths: &[PathBuf]) -> ApiResult<Vec<SourceTable>> {
        paths
            .iter()
            .map(|p| self.parser.load_source(p).map_err(ApiError::from))
            .collect()
    }

    /// 执行对账
    ///
    /// # 返回
    /// - Ok(ReconcileResponse): 输出路径 + 运行报告
    /// - Err(StructuralError): 台账结构错误，不写任何输出
    /// - Err: 文件读取/写出错误
    pub fn reconcile(&self, request: &ReconcileRequest) -> ApiResult<ReconcileResponse> {
        if request.ledger_path.as_os_str().is_empty() {
            return Err(ApiError::InvalidInput("未指定主台账文件".to_string()));
        }
        if request.source_paths.is_empty() {
            tracing::warn!("未提供来源文件，台账合计将全部写为 0");
        }

        // 配置可能被 config_mut 修改过，执行前再校验一次
        self.config.validate()?;
        let snapshot = ConfigManager::get_config_snapshot(&self.config)?;
        tracing::debug!(config = %snapshot, "对账开始");

        let mut ledger = self.load_ledger(&request.ledger_path)?;
        let sources = self.load_sources(&request.source_paths)?;

        let orchestrator = ReconcileOrchestrator::new(self.config.clone());
        let outcome = orchestrator.run(&mut ledger, &sources)?;

        let output_path = request
            .output_path
            .clone()
            .unwrap_or_else(|| LedgerWriter::default_output_path(&request.ledger_path));
        LedgerWriter.write_file(&ledger, &output_path)?;

        let report = RunReport::from_outcome(
            &request.ledger_path.display().to_string(),
            Some(&output_path),
            &self.config,
            &outcome,
        );
        if let Some(report_path) = &request.report_path {
            report.write_file(report_path)?;
        }

        Ok(ReconcileResponse {
            output_path,
            report,
        })
    }
}
