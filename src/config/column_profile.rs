// ==========================================
// SKU 对账与托盘分配 - 来源列配置
// ==========================================
// 职责: 每种供应商文件一份命名列配置 + 兜底配置
// 说明: 列位置集中在这里，提取逻辑不出现位置字面量
// ==========================================

use serde::{Deserialize, Serialize};

/// 兜底配置名称
pub const FALLBACK_PROFILE_NAME: &str = "default";

// ==========================================
// ColumnProfile - 来源列布局
// ==========================================
// 列下标从 0 开始
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// 配置名称（也是默认的文件名匹配片段）
    pub name: String,

    /// 文件名匹配片段（大小写不敏感的子串匹配）；缺省时使用 name
    #[serde(default)]
    pub name_pattern: Option<String>,

    /// SKU 所在列
    pub key_column: usize,

    /// 数量所在列
    pub quantity_column: usize,

    /// 开头需要跳过的非数据行数（表头）
    #[serde(default = "default_header_rows")]
    pub header_rows: usize,
}

fn default_header_rows() -> usize {
    1
}

impl ColumnProfile {
    pub fn new(name: &str, key_column: usize, quantity_column: usize, header_rows: usize) -> Self {
        Self {
            name: name.to_string(),
            name_pattern: None,
            key_column,
            quantity_column,
            header_rows,
        }
    }

    /// Vitaplena 导出文件: SKU 在第 4 列，数量在第 6 列
    pub fn vitaplena() -> Self {
        Self::new("vitaplena", 3, 5, 1)
    }

    /// Eggmarket 导出文件: SKU 在第 6 列，数量在第 7 列
    pub fn eggmarket() -> Self {
        Self::new("eggmarket", 5, 6, 1)
    }

    /// 无法识别时使用的兜底配置（与 Vitaplena 相同的列位置）
    pub fn fallback() -> Self {
        Self::new(FALLBACK_PROFILE_NAME, 3, 5, 1)
    }

    /// 文件名是否匹配本配置
    pub fn matches(&self, source_name: &str) -> bool {
        let pattern = self
            .name_pattern
            .as_deref()
            .unwrap_or(&self.name)
            .trim()
            .to_lowercase();
        !pattern.is_empty() && source_name.to_lowercase().contains(&pattern)
    }
}

// ==========================================
// ProfileMatch - 识别结果
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct ProfileMatch<'a> {
    pub profile: &'a ColumnProfile,
    /// true 表示未识别，使用了兜底配置
    pub fallback: bool,
}

// ==========================================
// ProfileRegistry - 按来源名称查找列配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRegistry {
    profiles: Vec<ColumnProfile>,
    fallback: ColumnProfile,
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProfileRegistry {
    /// 内置配置: vitaplena / eggmarket + 兜底
    pub fn builtin() -> Self {
        Self {
            profiles: vec![ColumnProfile::vitaplena(), ColumnProfile::eggmarket()],
            fallback: ColumnProfile::fallback(),
        }
    }

    /// 自定义配置优先于内置配置匹配
    pub fn with_custom(custom: Vec<ColumnProfile>, fallback: Option<ColumnProfile>) -> Self {
        let mut registry = Self::builtin();
        let mut profiles = custom;
        profiles.append(&mut registry.profiles);
        registry.profiles = profiles;
        if let Some(fb) = fallback {
            registry.fallback = fb;
        }
        registry
    }

    /// 按来源名称识别列配置（按注册顺序取第一个匹配）
    pub fn classify(&self, source_name: &str) -> ProfileMatch<'_> {
        match self.profiles.iter().find(|p| p.matches(source_name)) {
            Some(profile) => ProfileMatch {
                profile,
                fallback: false,
            },
            None => ProfileMatch {
                profile: &self.fallback,
                fallback: true,
            },
        }
    }

    pub fn profiles(&self) -> &[ColumnProfile] {
        &self.profiles
    }

    pub fn fallback(&self) -> &ColumnProfile {
        &self.fallback
    }
}
