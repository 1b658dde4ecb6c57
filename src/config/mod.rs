// ==========================================
// SKU 对账与托盘分配 - 配置层
// ==========================================
// 职责: 来源列配置、运行配置、配置加载与覆写
// 存储: JSON 配置文件 + SKU_PALLET_* 环境变量
// ==========================================

pub mod column_profile;
pub mod config_manager;
pub mod error;
pub mod run_config;

// 重导出核心配置类型
pub use column_profile::{ColumnProfile, ProfileMatch, ProfileRegistry, FALLBACK_PROFILE_NAME};
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use run_config::{LedgerLayout, RunConfig, DEFAULT_SLOT_CAPACITY, DEFAULT_TOTALS_MARKER};
