use std::collections::BTreeMap;

use crate::design::classifier::classify_result;
use crate::design::design_model::{DesignResult, ModelType, Stats};

/// Example configuration shown when the user has no saved designs yet.
/// Never persisted and never selected.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoDesign {
    pub prompt: &'static str,
    pub result: DesignResult,
}

impl DemoDesign {
    pub fn model(&self) -> ModelType {
        classify_result(&self.result)
    }
}

pub fn demo_designs() -> Vec<DemoDesign> {
    vec![
        DemoDesign {
            prompt: "设计一款适合高原作战的新型主战坦克",
            result: DesignResult {
                equipment_type: "主战坦克".to_string(),
                model_type: Some(ModelType::Tank),
                name: "高原雄狮主战坦克".to_string(),
                description: "针对高海拔环境优化动力与散热的主战坦克".to_string(),
                stats: Stats::new(72, 88, 90, 35),
                design_suggestions: vec![
                    "采用涡轮增压柴油机补偿高原功率损失".to_string(),
                    "加装复合装甲模块".to_string(),
                ],
                technical_specs: specs(&[("weight", "52吨"), ("crew", "3人"), ("mainGun", "125mm滑膛炮")]),
                analysis: String::new(),
            },
        },
        DemoDesign {
            prompt: "设计一款长航时察打一体无人机",
            result: DesignResult {
                equipment_type: "无人机".to_string(),
                model_type: Some(ModelType::Drone),
                name: "苍穹长航时无人机".to_string(),
                description: "具备侦察与精确打击能力的中空长航时无人机".to_string(),
                stats: Stats::new(55, 20, 60, 78),
                design_suggestions: vec![
                    "采用大展弦比机翼提升续航".to_string(),
                    "配备卫星通信链路".to_string(),
                ],
                technical_specs: specs(&[("endurance", "40小时"), ("ceiling", "8000米")]),
                analysis: String::new(),
            },
        },
        DemoDesign {
            prompt: "设计一款提升单兵负重能力的外骨骼",
            result: DesignResult {
                equipment_type: "单兵装备".to_string(),
                model_type: Some(ModelType::Exoskeleton),
                name: "铁卫单兵外骨骼".to_string(),
                description: "减轻单兵负重、提升机动能力的动力外骨骼系统".to_string(),
                stats: Stats::new(65, 45, 30, 50),
                design_suggestions: vec!["使用碳纤维骨架减轻自重".to_string()],
                technical_specs: specs(&[("payload", "50公斤"), ("battery", "8小时")]),
                analysis: String::new(),
            },
        },
    ]
}

fn specs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
