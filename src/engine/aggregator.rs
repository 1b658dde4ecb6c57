// ==========================================
// SKU 对账与托盘分配 - 数量汇总
// ==========================================
// 规则: 按 key 分组做精确整数求和
// 性质: 与输入顺序无关（来源按上传顺序处理，顺序本身没有意义）
// ==========================================

use crate::domain::record::{AggregateTotal, NormalizedRecord};

/// 汇总标准化记录
///
/// 空输入返回空汇总
pub fn aggregate<'a, I>(records: I) -> AggregateTotal
where
    I: IntoIterator<Item = &'a NormalizedRecord>,
{
    let mut totals = AggregateTotal::new();
    for record in records {
        totals.add(&record.key, record.quantity);
    }
    totals
}
