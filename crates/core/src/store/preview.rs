use crate::domain::preview::{Consultant, Vendor};
use crate::domain::reqdoc::VisibilityLevel;
use crate::seeds;
use serde::Serialize;

/// Who the SME is about to dispatch the requirement document to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchPreview {
    pub vendors: Vec<Vendor>,
    pub consultants: Vec<Consultant>,
    pub visibility: VisibilityLevel,
    pub vendor_count: usize,
    pub consultant_count: usize,
    pub total_selected: usize,
}

impl Default for DispatchPreview {
    fn default() -> Self {
        let mut preview = Self {
            vendors: seeds::vendors(),
            consultants: seeds::consultants(),
            visibility: VisibilityLevel::Limited,
            vendor_count: 0,
            consultant_count: 0,
            total_selected: 0,
        };
        preview.recount();
        preview
    }
}

impl DispatchPreview {
    pub fn toggle_vendor(&mut self, id: &str) {
        if let Some(v) = self.vendors.iter_mut().find(|v| v.id == id) {
            v.selected = !v.selected;
        }
        self.recount();
    }

    pub fn toggle_consultant(&mut self, id: &str) {
        if let Some(c) = self.consultants.iter_mut().find(|c| c.id == id) {
            c.selected = !c.selected;
        }
        self.recount();
    }

    pub fn add_vendor(&mut self, id: &str) {
        if let Some(v) = self.vendors.iter_mut().find(|v| v.id == id) {
            v.selected = true;
        }
        self.recount();
    }

    pub fn add_consultant(&mut self, id: &str) {
        if let Some(c) = self.consultants.iter_mut().find(|c| c.id == id) {
            c.selected = true;
        }
        self.recount();
    }

    pub fn set_visibility(&mut self, visibility: VisibilityLevel) {
        self.visibility = visibility;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn recount(&mut self) {
        self.vendor_count = self.vendors.iter().filter(|v| v.selected).count();
        self.consultant_count = self.consultants.iter().filter(|c| c.selected).count();
        self.total_selected = self.vendor_count + self.consultant_count;
    }
}
