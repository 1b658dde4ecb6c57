// ==========================================
// SKU 对账与托盘分配 - SKU 标准化
// ==========================================
// 规则: 含分隔符时取第一个分隔符之后的全部内容，否则原样返回；结果去首尾空白
// 来源 key 与台账 key 使用同一规则，保证 join 两侧口径一致
// ==========================================

/// SKU 前缀分隔符（供应商条码格式 "前缀:SKU"）
pub const KEY_DELIMITER: char = ':';

/// 标准化 SKU
///
/// # 示例
/// - "pfx:B2" → "B2"
/// - "B2" → "B2"
/// - "a:b:c" → "b:c"（只在第一个分隔符处切分）
/// - "pfx: B2 " → "B2"
pub fn normalize(raw: &str) -> String {
    let key = match raw.split_once(KEY_DELIMITER) {
        Some((_, rest)) => rest,
        None => raw,
    };
    key.trim().to_string()
}
