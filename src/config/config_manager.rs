// ==========================================
// SKU 对账与托盘分配 - 配置管理器
// ==========================================
// 职责: 配置加载（JSON 文件）+ 环境变量覆写 + 校验
// 优先级: 环境变量 > 配置文件 > 默认值
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::run_config::RunConfig;
use crate::domain::types::AllocationMode;
use serde_json::json;
use std::collections::HashMap;
use std::path::Path;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    overrides: HashMap<String, String>,
}

impl ConfigManager {
    /// 从当前进程环境变量创建（只保留 SKU_PALLET_ 前缀的变量）
    pub fn from_env() -> Self {
        let overrides = std::env::vars()
            .filter(|(k, _)| k.starts_with(config_keys::PREFIX))
            .collect();
        Self { overrides }
    }

    /// 使用显式覆写表创建（测试/嵌入场景）
    pub fn with_overrides(overrides: HashMap<String, String>) -> Self {
        Self { overrides }
    }

    /// 读取覆写值（去空白，空串视为未设置）
    pub fn get_config_value(&self, key: &str) -> Option<&str> {
        self.overrides
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// 加载运行配置
    ///
    /// # 参数
    /// - path: 配置文件路径；None 时从默认值开始
    ///
    /// # 返回
    /// - Ok(RunConfig): 已应用覆写并通过校验的配置
    /// - Err: 文件读取/格式错误、校验失败
    pub fn load(&self, path: Option<&Path>) -> ConfigResult<RunConfig> {
        let mut config = match path {
            Some(p) => Self::read_file(p)?,
            None => RunConfig::default(),
        };

        self.apply_overrides(&mut config)?;
        config.validate()?;

        tracing::debug!(
            slot_capacity = config.slot_capacity,
            slot_count = config.ledger.slot_count,
            mode = %config.allocation_mode,
            custom_profiles = config.profiles.len(),
            "运行配置已加载"
        );
        Ok(config)
    }

    /// 从 JSON 文件读取配置
    fn read_file(path: &Path) -> ConfigResult<RunConfig> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ConfigReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// 应用环境变量覆写
    fn apply_overrides(&self, config: &mut RunConfig) -> ConfigResult<()> {
        if let Some(value) = self.get_config_value(config_keys::SLOT_CAPACITY) {
            config.slot_capacity = parse_number(config_keys::SLOT_CAPACITY, value)?;
        }

        if let Some(value) = self.get_config_value(config_keys::SLOT_COUNT) {
            config.ledger.slot_count = parse_number(config_keys::SLOT_COUNT, value)?;
        }

        if let Some(value) = self.get_config_value(config_keys::ALLOCATION_MODE) {
            match AllocationMode::parse(value) {
                Some(mode) => config.allocation_mode = mode,
                None => {
                    // 与数值项不同，模式写错时沿用文件值，只记录警告
                    tracing::warn!(
                        config_key = config_keys::ALLOCATION_MODE,
                        raw_value = %value,
                        "分配模式配置格式错误，沿用当前值 {}",
                        config.allocation_mode
                    );
                }
            }
        }

        if let Some(value) = self.get_config_value(config_keys::TOTALS_MARKER) {
            config.ledger.totals_marker = value.to_string();
        }

        Ok(())
    }

    /// 获取配置快照（JSON 格式，运行开始时写入日志）
    pub fn get_config_snapshot(config: &RunConfig) -> ConfigResult<String> {
        let snapshot = json!({
            "slot_capacity": config.slot_capacity,
            "allocation_mode": config.allocation_mode,
            "ledger": config.ledger,
            "profiles": config.profile_registry(),
        });
        Ok(serde_json::to_string(&snapshot)?)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T>
where
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| ConfigError::ConfigValueError {
            key: key.to_string(),
            value: value.to_string(),
            message: e.to_string(),
        })
}

// ==========================================
// 配置键常量（环境变量名）
// ==========================================
pub mod config_keys {
    pub const PREFIX: &str = "SKU_PALLET_";

    // 托盘
    pub const SLOT_CAPACITY: &str = "SKU_PALLET_SLOT_CAPACITY";
    pub const SLOT_COUNT: &str = "SKU_PALLET_SLOT_COUNT";
    pub const ALLOCATION_MODE: &str = "SKU_PALLET_ALLOCATION_MODE";

    // 台账
    pub const TOTALS_MARKER: &str = "SKU_PALLET_TOTALS_MARKER";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn manager(pairs: &[(&str, &str)]) -> ConfigManager {
        ConfigManager::with_overrides(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_load_defaults_without_file() {
        let config = manager(&[]).load(None).unwrap();
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "slot_capacity": 40, "ledger": {{ "slot_count": 2 }} }}"#).unwrap();

        let m = manager(&[
            (config_keys::SLOT_CAPACITY, "25"),
            (config_keys::ALLOCATION_MODE, "global"),
            (config_keys::TOTALS_MARKER, "Cantidad"),
        ]);
        let config = m.load(Some(file.path())).unwrap();

        assert_eq!(config.slot_capacity, 25);
        assert_eq!(config.ledger.slot_count, 2);
        assert_eq!(config.allocation_mode, AllocationMode::Global);
        assert_eq!(config.ledger.totals_marker, "Cantidad");
    }

    #[test]
    fn test_invalid_numeric_override_is_error() {
        let m = manager(&[(config_keys::SLOT_CAPACITY, "thirty")]);
        assert!(matches!(
            m.load(None),
            Err(ConfigError::ConfigValueError { .. })
        ));
    }

    #[test]
    fn test_invalid_mode_override_keeps_value() {
        let m = manager(&[(config_keys::ALLOCATION_MODE, "balanced")]);
        let config = m.load(None).unwrap();
        assert_eq!(config.allocation_mode, AllocationMode::PerRow);
    }

    #[test]
    fn test_zero_capacity_override_fails_validation() {
        let m = manager(&[(config_keys::SLOT_CAPACITY, "0")]);
        assert!(matches!(m.load(None), Err(ConfigError::InvalidCapacity(0))));
    }

    #[test]
    fn test_missing_file() {
        let result = manager(&[]).load(Some(Path::new("no_such_config.json")));
        assert!(matches!(result, Err(ConfigError::ConfigReadError { .. })));
    }

    #[test]
    fn test_snapshot_is_json() {
        let snapshot = ConfigManager::get_config_snapshot(&RunConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&snapshot).unwrap();
        assert_eq!(value["slot_capacity"], 30);
        assert_eq!(value["allocation_mode"], "per_row");
    }
}
