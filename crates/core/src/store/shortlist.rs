use crate::domain::contract::MAX_SELECTED_SOLUTIONS;
use crate::domain::solution::SolutionOption;
use crate::seeds;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// Shortlist already full or id not in the catalog.
    Ignored,
}

/// Up to three solution options picked from a catalog, in pick order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Shortlist {
    all: Vec<SolutionOption>,
    selected: Vec<SolutionOption>,
}

impl Default for Shortlist {
    fn default() -> Self {
        Self::new(seeds::marketing_visibility_solutions())
    }
}

impl Shortlist {
    pub fn new(all: Vec<SolutionOption>) -> Self {
        Self {
            all,
            selected: Vec::new(),
        }
    }

    pub fn all(&self) -> &[SolutionOption] {
        &self.all
    }

    pub fn selected(&self) -> &[SolutionOption] {
        &self.selected
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.selected.iter().map(|s| s.id.clone()).collect()
    }

    pub fn toggle(&mut self, id: &str) -> ToggleOutcome {
        if let Some(pos) = self.selected.iter().position(|s| s.id == id) {
            self.selected.remove(pos);
            return ToggleOutcome::Removed;
        }
        if self.selected.len() >= MAX_SELECTED_SOLUTIONS {
            return ToggleOutcome::Ignored;
        }
        match self.all.iter().find(|s| s.id == id) {
            Some(option) => {
                self.selected.push(option.clone());
                ToggleOutcome::Added
            }
            None => ToggleOutcome::Ignored,
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caps_at_three_and_removes_on_second_toggle() {
        let mut shortlist = Shortlist::default();
        let ids: Vec<String> = shortlist.all().iter().map(|s| s.id.clone()).collect();

        for id in &ids[..3] {
            assert_eq!(shortlist.toggle(id), ToggleOutcome::Added);
        }
        assert_eq!(shortlist.toggle(&ids[3]), ToggleOutcome::Ignored);
        assert_eq!(shortlist.selected().len(), 3);

        assert_eq!(shortlist.toggle(&ids[1]), ToggleOutcome::Removed);
        assert_eq!(shortlist.toggle(&ids[3]), ToggleOutcome::Added);
        assert_eq!(shortlist.selected_ids(), vec![ids[0].clone(), ids[2].clone(), ids[3].clone()]);
    }

    #[test]
    fn unknown_ids_are_ignored_and_clear_empties() {
        let mut shortlist = Shortlist::default();
        assert_eq!(shortlist.toggle("trhls-1"), ToggleOutcome::Ignored);
        shortlist.toggle("ads-sprint-nongrant");
        shortlist.clear();
        assert!(shortlist.selected().is_empty());
    }
}
