// src/handlers/mobile.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

const MAIN_TEMPLATE: &str = include_str!("../../assets/mobile/formulas.html");
const MOBILE_SCRIPT: &str = include_str!("../../assets/mobile/formulas.js");

/// Request context passed by the host mobile-app bridge.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MobileRequest {
    #[serde(default)]
    pub args: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MobileTemplate {
    pub id: String,
    pub html: String,
}

/// Fixed-shape response of the mobile bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MobileResponse {
    pub templates: Vec<MobileTemplate>,
    pub javascript: String,
    pub otherdata: String,
}

/// Returns the app templates for the formulas question type.
/// The payloads are static and returned verbatim.
pub fn mobile_get_formulas(_request: &MobileRequest) -> MobileResponse {
    MobileResponse {
        templates: vec![MobileTemplate {
            id: "main".to_string(),
            html: MAIN_TEMPLATE.to_string(),
        }],
        javascript: MOBILE_SCRIPT.to_string(),
        otherdata: String::new(),
    }
}
