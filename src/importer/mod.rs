// ==========================================
// SKU 对账与托盘分配 - 导入层
// ==========================================
// 职责: 外部表格读取、SKU 标准化、来源记录提取
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod file_parser;
pub mod key_normalizer;
pub mod record_extractor;

// 重导出核心类型
pub use data_cleaner::{DataCleaner, QuantityParse};
pub use error::{ImportError, ImportResult};
pub use file_parser::{CellText, CsvParser, ExcelParser, FileParser, UniversalFileParser};
pub use key_normalizer::{normalize, KEY_DELIMITER};
pub use record_extractor::{extract, Extraction, RecordExtractor};
