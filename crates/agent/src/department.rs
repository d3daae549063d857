//! Rule-based department routing
//!
//! Same priority-ordered substring strategy as intent detection, over
//! the department label set.

use heliodesk_core::{Department, DepartmentClassifier};

const SOLAR_DESIGN: &[&str] = &["solar design", "layout"];
const SOLAR_EQUIPMENT: &[&str] = &["panels", "inverters"];
const PERMITTING: &[&str] = &["permitting", "regulations"];

/// Substring-rule department router
#[derive(Debug, Default, Clone, Copy)]
pub struct DepartmentRouter;

impl DepartmentRouter {
    pub fn new() -> Self {
        Self
    }
}

impl DepartmentClassifier for DepartmentRouter {
    fn classify(&self, text: &str) -> Department {
        let lower = text.to_lowercase();
        let matches = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

        if matches(SOLAR_DESIGN) {
            Department::SolarDesign
        } else if matches(SOLAR_EQUIPMENT) {
            Department::SolarEquipment
        } else if matches(PERMITTING) {
            Department::Permitting
        } else {
            Department::GeneralSolarInquiry
        }
    }
}
