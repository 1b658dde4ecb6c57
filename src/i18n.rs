// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库，支持中文（默认）和英文
// 用途: CLI 运行摘要等面向用户的文本
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

use crate::exporter::RunReport;

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"zh-CN" 或 "en"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 翻译消息（无参数）
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数，占位符格式 %{name}）
///
/// # 示例
/// ```no_run
/// use sku_pallet::i18n::t_with_args;
/// let msg = t_with_args("run.done", &[("path", "/tmp/out.csv")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

/// 运行摘要（每项诊断一行，没有问题的项不输出）
pub fn summary_lines(report: &RunReport) -> Vec<String> {
    let diagnostics = &report.diagnostics;
    let mut lines = Vec::new();

    if let Some(output) = &report.output {
        lines.push(t_with_args("run.done", &[("path", output.as_str())]));
    }
    let total = report.grand_total.to_string();
    let matched = report.matched_quantity.to_string();
    let unmatched = report.unmatched_quantity.to_string();
    lines.push(t_with_args(
        "run.grand_total",
        &[
            ("total", total.as_str()),
            ("matched", matched.as_str()),
            ("unmatched", unmatched.as_str()),
        ],
    ));

    for name in &diagnostics.unclassified_sources {
        lines.push(t_with_args("run.unclassified", &[("name", name.as_str())]));
    }
    if !diagnostics.skipped_ledger_rows.is_empty() {
        let count = diagnostics.skipped_ledger_rows.len().to_string();
        lines.push(t_with_args("run.skipped_rows", &[("count", count.as_str())]));
    }
    if !diagnostics.duplicate_ledger_keys.is_empty() {
        let count = diagnostics.duplicate_ledger_keys.len().to_string();
        lines.push(t_with_args("run.duplicate_keys", &[("count", count.as_str())]));
    }
    if !diagnostics.unmatched_source_keys.is_empty() {
        let count = diagnostics.unmatched_source_keys.len().to_string();
        lines.push(t_with_args("run.unmatched_keys", &[("count", count.as_str())]));
    }
    if diagnostics.coerced_quantity_cells() > 0 {
        let count = diagnostics.coerced_quantity_cells().to_string();
        lines.push(t_with_args("run.coerced", &[("count", count.as_str())]));
    }
    if diagnostics.overflow_dropped > 0 {
        let dropped = diagnostics.overflow_dropped.to_string();
        lines.push(t_with_args("run.overflow", &[("dropped", dropped.as_str())]));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // rust-i18n 的 locale 为全局状态，且 Rust 测试默认并行执行；
    // 为避免测试互相干扰，这里对 i18n 相关测试串行化。
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        assert_eq!(current_locale(), "en");

        set_locale("zh-CN");
        assert_eq!(current_locale(), "zh-CN");
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        let msg = t_with_args("run.overflow", &[("dropped", "15")]);
        assert!(msg.contains("15"));
        assert!(msg.contains("托盘"));

        set_locale("en");
        let msg = t_with_args("run.overflow", &[("dropped", "15")]);
        assert!(msg.contains("15"));
        assert!(msg.contains("Pallet"));

        set_locale("zh-CN");
    }

    #[test]
    fn test_translate_simple() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        assert_eq!(t("common.success"), "Operation successful");
        set_locale("zh-CN");
        assert_eq!(t("common.success"), "操作成功");
    }
}
