use crate::design::design_model::{DesignResult, ModelType};

/// Which rule produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchedRule {
    /// Keyword rule at the given priority (1 = highest).
    Keyword { priority: usize, keyword: &'static str },
    /// Equipment type named an aircraft class.
    EquipmentType { keyword: &'static str },
    /// No keyword matched; the AI-supplied hint was used.
    Hint,
    /// Nothing matched and no usable hint.
    Default,
}

struct Rule {
    model: ModelType,
    keywords: &'static [&'static str],
    type_keywords: &'static [&'static str],
}

// Evaluated top to bottom, first match wins. Order matters: a strategic missile
// name must never fall through to fighter.
const RULES: &[Rule] = &[
    Rule {
        model: ModelType::Missile,
        keywords: &["东风", "导弹", "df-", "df", "missile", "rocket", "弹道", "洲际", "战略"],
        type_keywords: &[],
    },
    Rule {
        model: ModelType::Carrier,
        keywords: &["航母", "辽宁", "山东", "carrier", "舰", "船"],
        type_keywords: &[],
    },
    Rule {
        model: ModelType::Fighter,
        keywords: &[
            "飞机", "战斗机", "战机", "歼", "j-", "j20", "j10", "j15", "j11", "fighter",
        ],
        type_keywords: &["aircraft", "fighter"],
    },
    Rule {
        model: ModelType::Drone,
        keywords: &["无人", "drone", "uav", "彩虹", "rainbow"],
        type_keywords: &[],
    },
    Rule {
        model: ModelType::Armor,
        keywords: &["装甲", "armor", "防护"],
        type_keywords: &[],
    },
    Rule {
        model: ModelType::Exoskeleton,
        keywords: &["外骨骼", "exoskeleton"],
        type_keywords: &[],
    },
    Rule {
        model: ModelType::Tank,
        keywords: &["坦克", "tank", "99式", "59式", "15式"],
        type_keywords: &[],
    },
    Rule {
        model: ModelType::Artillery,
        keywords: &["火炮", "cannon", "火箭炮"],
        type_keywords: &[],
    },
];

pub const DEFAULT_MODEL: ModelType = ModelType::Tank;

/// Map an AI-provided name / equipment type pair to exactly one `ModelType`.
/// Total: every input, including two empty strings, yields a value.
pub fn classify(name: Option<&str>, equipment_type: Option<&str>, hint: Option<ModelType>) -> ModelType {
    classify_with_rule(name, equipment_type, hint).0
}

pub fn classify_result(result: &DesignResult) -> ModelType {
    classify(
        Some(result.name.as_str()),
        Some(result.equipment_type.as_str()),
        result.model_type,
    )
}

pub fn classify_with_rule(
    name: Option<&str>,
    equipment_type: Option<&str>,
    hint: Option<ModelType>,
) -> (ModelType, MatchedRule) {
    let name = name.unwrap_or("").to_lowercase();
    let equipment_type = equipment_type.unwrap_or("").to_lowercase();

    for (i, rule) in RULES.iter().enumerate() {
        if let Some(keyword) = rule
            .keywords
            .iter()
            .find(|k| name.contains(*k) || equipment_type.contains(*k))
        {
            return (
                rule.model,
                MatchedRule::Keyword {
                    priority: i + 1,
                    keyword: *keyword,
                },
            );
        }

        if let Some(keyword) = rule
            .type_keywords
            .iter()
            .find(|k| equipment_type.contains(*k))
        {
            return (rule.model, MatchedRule::EquipmentType { keyword: *keyword });
        }
    }

    match hint {
        Some(model) => (model, MatchedRule::Hint),
        None => (DEFAULT_MODEL, MatchedRule::Default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_table_covers_every_keyword_category_once() {
        let models: Vec<ModelType> = RULES.iter().map(|r| r.model).collect();
        assert_eq!(models.len(), 8);
        for m in ModelType::ALL {
            assert_eq!(models.iter().filter(|x| **x == m).count(), 1, "{}", m);
        }
    }

    #[test]
    fn keywords_are_lowercase() {
        for rule in RULES {
            for k in rule.keywords.iter().chain(rule.type_keywords) {
                assert_eq!(*k, k.to_lowercase());
            }
        }
    }
}
