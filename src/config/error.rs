// ==========================================
// SKU 对账与托盘分配 - 配置模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 配置模块错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ConfigReadError { path: String, message: String },

    #[error("配置文件格式错误: {0}")]
    ConfigFormatError(#[from] serde_json::Error),

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ConfigValueError {
        key: String,
        value: String,
        message: String,
    },

    #[error("托盘容量必须大于 0: {0}")]
    InvalidCapacity(u64),

    #[error("台账布局无效: {0}")]
    InvalidLayout(String),

    #[error("列配置无效 (profile: {profile}): {message}")]
    InvalidProfile { profile: String, message: String },
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
