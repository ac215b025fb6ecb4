//! Validation of caller-supplied payloads before they reach the store.

use crate::domain::marketplace::{NewProposal, NewQuotation};
use crate::domain::reqdoc::{Band, NewReqDoc};
use anyhow::ensure;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Upper bound on solution paths an SME can shortlist at once.
pub const MAX_SELECTED_SOLUTIONS: usize = 3;

impl NewReqDoc {
    pub fn validated(self) -> anyhow::Result<NewReqDoc> {
        let company_id = non_empty("companyId", self.company_id)?;
        let problem = non_empty("problem", self.problem)?;
        let goal = non_empty("goal", self.goal)?;
        let domain = non_empty("domain", self.domain)?;

        ordered_band("budgetBand", self.budget_band)?;
        ordered_band("timelineMonths", self.timeline_months)?;

        ensure!(
            self.qualification_score <= 100,
            "qualificationScore must be between 0 and 100 (got {})",
            self.qualification_score
        );

        let trhls_selected_ids = SolutionSelection {
            ids: self.trhls_selected_ids,
        }
        .validated()?
        .ids;

        Ok(NewReqDoc {
            company_id,
            problem,
            goal,
            domain,
            trhls_selected_ids,
            ..self
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionSelection {
    pub ids: Vec<String>,
}

impl SolutionSelection {
    pub fn validated(self) -> anyhow::Result<SolutionSelection> {
        ensure!(
            self.ids.len() <= MAX_SELECTED_SOLUTIONS,
            "at most {MAX_SELECTED_SOLUTIONS} solutions can be selected (got {})",
            self.ids.len()
        );

        let mut seen = BTreeSet::<String>::new();
        let mut ids = Vec::with_capacity(self.ids.len());
        for id in self.ids {
            let id = non_empty("solution id", id)?;
            ensure!(seen.insert(id.clone()), "duplicate solution id: {id}");
            ids.push(id);
        }

        Ok(SolutionSelection { ids })
    }
}

impl NewProposal {
    pub fn validated(self) -> anyhow::Result<NewProposal> {
        let consultant_user_id = non_empty("consultantUserId", self.consultant_user_id)?;
        let req_doc_id = non_empty("reqDocId", self.req_doc_id)?;
        let approach = non_empty("approach", self.approach)?;
        ordered_band("feeBand", self.fee_band)?;
        ordered_band("timeline", self.timeline)?;
        ensure!(self.version >= 1, "version must be >= 1");

        Ok(NewProposal {
            consultant_user_id,
            req_doc_id,
            approach,
            ..self
        })
    }
}

impl NewQuotation {
    pub fn validated(self) -> anyhow::Result<NewQuotation> {
        let vendor_user_id = non_empty("vendorUserId", self.vendor_user_id)?;
        let req_doc_id = non_empty("reqDocId", self.req_doc_id)?;
        let summary = non_empty("summary", self.summary)?;
        ordered_band("priceBand", self.price_band)?;
        ensure!(self.version >= 1, "version must be >= 1");

        Ok(NewQuotation {
            vendor_user_id,
            req_doc_id,
            summary,
            ..self
        })
    }
}

fn non_empty(field: &str, value: String) -> anyhow::Result<String> {
    let value = value.trim().to_string();
    ensure!(!value.is_empty(), "{field} must be non-empty");
    Ok(value)
}

fn ordered_band<T: PartialOrd + std::fmt::Display>(field: &str, band: Band<T>) -> anyhow::Result<()> {
    ensure!(
        band.0 <= band.1,
        "{field} min must not exceed max (got [{}, {}])",
        band.0,
        band.1
    );
    Ok(())
}
