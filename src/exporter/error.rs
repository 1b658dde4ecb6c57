// ==========================================
// SKU 对账与托盘分配 - 导出模块错误类型
// ==========================================

use thiserror::Error;

/// 导出模块错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("文件写入失败 ({path}): {message}")]
    FileWriteError { path: String, message: String },

    #[error("CSV 写出失败: {0}")]
    CsvWriteError(#[from] csv::Error),

    #[error("XLSX 写出失败: {0}")]
    XlsxWriteError(#[from] rust_xlsxwriter::XlsxError),

    #[error("台账超出 XLSX 行列上限: 行 {row}, 列 {col}")]
    SheetTooLarge { row: usize, col: usize },

    #[error("报告序列化失败: {0}")]
    ReportSerializeError(#[from] serde_json::Error),
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;
