use design_viewer::{
    AuthSession, DesignResult, DesignSession, ModelType, Stats,
    api::mock::MockDesignApi,
};

pub const TOKEN: &str = "test-token";

pub fn auth() -> AuthSession {
    AuthSession::new(TOKEN)
}

pub fn result(name: &str, equipment_type: &str) -> DesignResult {
    DesignResult {
        equipment_type: equipment_type.to_string(),
        model_type: None,
        name: name.to_string(),
        description: format!("{} description", name),
        stats: Stats::new(50, 60, 70, 80),
        design_suggestions: vec!["suggestion".to_string()],
        technical_specs: Default::default(),
        analysis: String::new(),
    }
}

pub fn result_with_hint(name: &str, equipment_type: &str, hint: ModelType) -> DesignResult {
    DesignResult {
        model_type: Some(hint),
        ..result(name, equipment_type)
    }
}

pub fn logged_in(api: MockDesignApi) -> DesignSession<MockDesignApi> {
    DesignSession::new(api, Some(auth()))
}
