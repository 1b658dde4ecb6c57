// ==========================================
// SKU 对账与托盘分配 - 来源记录提取器
// ==========================================
// 输入: 来源表 + 列配置
// 输出: 标准化 (key, quantity) 序列（不去重）
// 规则: 来源类型无法识别时使用兜底配置并记录警告（不中止）
// ==========================================

use crate::config::column_profile::{ColumnProfile, ProfileRegistry};
use crate::domain::diagnostics::SourceSummary;
use crate::domain::record::{NormalizedRecord, SourceTable};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::key_normalizer::normalize;
use tracing::instrument;

/// 单个来源的提取结果
#[derive(Debug, Clone)]
pub struct Extraction {
    pub records: Vec<NormalizedRecord>,
    pub summary: SourceSummary,
}

/// 按列配置提取标准化记录
///
/// 跳过 header_rows 行表头；整行为空的数据行视为文件尾部空行，不产生记录
pub fn extract(source: &SourceTable, profile: &ColumnProfile) -> Vec<NormalizedRecord> {
    extract_with_stats(source, profile).0
}

/// 提取并统计被强制转换的数量单元格
fn extract_with_stats(source: &SourceTable, profile: &ColumnProfile) -> (Vec<NormalizedRecord>, usize) {
    let cleaner = DataCleaner;
    let mut coerced = 0usize;

    let records = source
        .rows
        .iter()
        .skip(profile.header_rows)
        .filter(|row| !row.is_blank())
        .map(|row| {
            let key = normalize(&cleaner.stringify_cell(row.cell(profile.key_column)));
            let parsed = cleaner.parse_quantity(row.cell(profile.quantity_column));
            if parsed.coerced {
                coerced += 1;
            }
            NormalizedRecord::new(key, parsed.quantity)
        })
        .collect();

    (records, coerced)
}

// ==========================================
// RecordExtractor - 识别来源类型 + 提取
// ==========================================
pub struct RecordExtractor {
    registry: ProfileRegistry,
}

impl RecordExtractor {
    pub fn new(registry: ProfileRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    /// 识别来源类型并提取记录
    #[instrument(skip(self, source), fields(source = %source.name, rows = source.rows.len()))]
    pub fn extract_source(&self, source: &SourceTable) -> Extraction {
        let matched = self.registry.classify(&source.name);
        if matched.fallback {
            tracing::warn!(
                source = %source.name,
                key_column = matched.profile.key_column,
                quantity_column = matched.profile.quantity_column,
                "无法识别来源类型，使用默认列配置"
            );
        }

        let (records, coerced) = extract_with_stats(source, matched.profile);
        let quantity_total = records.iter().fold(0u64, |acc, r| acc.saturating_add(r.quantity));

        if coerced > 0 {
            tracing::debug!(source = %source.name, coerced, "部分数量单元格被强制转换");
        }

        Extraction {
            summary: SourceSummary {
                name: source.name.clone(),
                profile: matched.profile.name.clone(),
                fallback: matched.fallback,
                record_count: records.len(),
                coerced_quantity_cells: coerced,
                quantity_total,
            },
            records,
        }
    }
}

impl Default for RecordExtractor {
    fn default() -> Self {
        Self::new(ProfileRegistry::builtin())
    }
}
