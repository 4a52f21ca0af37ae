// ==========================================
// 餐饮后厨管理系统 - 单位配比解析器
// ==========================================
// 职责: 把自由文本配比("4 servings"/"2.5 kg"/"4")解析为
//       类型化的 {数量, 单位},失败时显式报错
// 红线: 禁止把不可解析输入静默转成 0/NaN
// ==========================================

use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

// ==========================================
// UnitRatio - 解析后的配比
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRatio {
    pub count: f64,           // 数量,保证 > 0 且有限
    pub unit: Option<String>, // 单位文本(可选,如 "servings")
}

/// 解析自由文本配比
///
/// # 规则
/// - 接受 "4"、"4 servings"、"2.5 kg" 形式(首段数字 + 可选单位)
/// - 数量必须为有限正数
/// - 其余输入一律返回 UnparsableRatio,不做静默兜底
///
/// # 示例
/// ```
/// use kitchen_boh::engine::ratio::parse_unit_ratio;
/// let ratio = parse_unit_ratio("4 servings").unwrap();
/// assert_eq!(ratio.count, 4.0);
/// assert_eq!(ratio.unit.as_deref(), Some("servings"));
/// ```
pub fn parse_unit_ratio(raw: &str) -> EngineResult<UnitRatio> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EngineError::UnparsableRatio(raw.to_string()));
    }

    let mut parts = trimmed.split_whitespace();
    let count_text = parts.next().unwrap_or("");
    let count: f64 = count_text
        .parse()
        .map_err(|_| EngineError::UnparsableRatio(raw.to_string()))?;

    if !count.is_finite() || count <= 0.0 {
        return Err(EngineError::UnparsableRatio(raw.to_string()));
    }

    let unit_text = parts.collect::<Vec<_>>().join(" ");
    let unit = if unit_text.is_empty() {
        None
    } else {
        Some(unit_text)
    };

    Ok(UnitRatio { count, unit })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_number() {
        let ratio = parse_unit_ratio("4").unwrap();
        assert_eq!(ratio.count, 4.0);
        assert_eq!(ratio.unit, None);
    }

    #[test]
    fn test_parse_number_with_unit() {
        let ratio = parse_unit_ratio("4 servings").unwrap();
        assert_eq!(ratio.count, 4.0);
        assert_eq!(ratio.unit.as_deref(), Some("servings"));

        let ratio = parse_unit_ratio("  2.5 kg ").unwrap();
        assert_eq!(ratio.count, 2.5);
        assert_eq!(ratio.unit.as_deref(), Some("kg"));
    }

    #[test]
    fn test_parse_multi_word_unit() {
        let ratio = parse_unit_ratio("6 small portions").unwrap();
        assert_eq!(ratio.count, 6.0);
        assert_eq!(ratio.unit.as_deref(), Some("small portions"));
    }

    #[test]
    fn test_reject_empty() {
        assert!(matches!(
            parse_unit_ratio(""),
            Err(EngineError::UnparsableRatio(_))
        ));
        assert!(matches!(
            parse_unit_ratio("   "),
            Err(EngineError::UnparsableRatio(_))
        ));
    }

    #[test]
    fn test_reject_non_numeric() {
        assert!(matches!(
            parse_unit_ratio("servings"),
            Err(EngineError::UnparsableRatio(_))
        ));
        assert!(matches!(
            parse_unit_ratio("four servings"),
            Err(EngineError::UnparsableRatio(_))
        ));
    }

    #[test]
    fn test_reject_non_positive() {
        assert!(matches!(
            parse_unit_ratio("0"),
            Err(EngineError::UnparsableRatio(_))
        ));
        assert!(matches!(
            parse_unit_ratio("-3 servings"),
            Err(EngineError::UnparsableRatio(_))
        ));
        assert!(matches!(
            parse_unit_ratio("NaN"),
            Err(EngineError::UnparsableRatio(_))
        ));
        assert!(matches!(
            parse_unit_ratio("inf"),
            Err(EngineError::UnparsableRatio(_))
        ));
    }
}
