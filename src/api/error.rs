// ==========================================
// SKU 对账与托盘分配 - API 层错误类型
// ==========================================
// 职责: 汇总各层错误，转换为面向调用方的错误消息
// ==========================================

use crate::config::ConfigError;
use crate::engine::EngineError;
use crate::exporter::ExportError;
use crate::importer::ImportError;
use thiserror::Error;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 各层错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(#[from] ImportError),

    #[error("配置错误: {0}")]
    ConfigError(#[from] ConfigError),

    /// 结构性错误：本次运行不产生任何输出
    #[error("台账结构错误: {0}")]
    StructuralError(#[from] EngineError),

    #[error("导出失败: {0}")]
    ExportError(#[from] ExportError),
}

impl ApiError {
    /// 是否为结构性错误（CLI 据此选择退出码）
    pub fn is_structural(&self) -> bool {
        matches!(self, ApiError::StructuralError(_))
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
