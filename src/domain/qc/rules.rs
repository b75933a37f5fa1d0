//! QC rules over a fully computed document.
//!
//! Each rule appends its own messages; rules never depend on one another.

use crate::domain::document::{Document, TERMINATED_TAG};
use crate::domain::schedule::resolve_term_model;

/// Document types excluded from QC unless configured otherwise.
pub const DEFAULT_OUT_OF_SCOPE_TYPES: &[&str] = &["Master Service Agreement"];

/// Which documents QC applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QcSettings {
    pub out_of_scope_types: Vec<String>,
}

impl Default for QcSettings {
    fn default() -> Self {
        Self {
            out_of_scope_types: DEFAULT_OUT_OF_SCOPE_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl QcSettings {
    pub fn is_out_of_scope(&self, doc: &Document) -> bool {
        self.out_of_scope_types
            .iter()
            .any(|kind| doc.is_document_type(kind))
    }
}

/// A tag whose presence requires a date on the document.
struct TagDateRule {
    tag: &'static str,
    date_name: &'static str,
    has_date: fn(&Document) -> bool,
}

const TAG_DATE_RULES: &[TagDateRule] = &[
    TagDateRule {
        tag: TERMINATED_TAG,
        date_name: "termination date",
        has_date: |d| d.termination_date().is_some(),
    },
    TagDateRule {
        tag: "Operational",
        date_name: "operations commencement date",
        has_date: |d| d.operations_commencement_date().is_some(),
    },
    TagDateRule {
        tag: "Under Construction",
        date_name: "construction commencement date",
        has_date: |d| d.construction_commencement_date().is_some(),
    },
    TagDateRule {
        tag: "Closed",
        date_name: "closing date",
        has_date: |d| d.closing_date.is_some(),
    },
];

/// Runs every rule and returns the flags in rule order.
///
/// Out-of-scope document types and documents both tagged Terminated and
/// carrying a termination date yield no flags.
pub fn run_qc(doc: &Document, settings: &QcSettings) -> Vec<String> {
    if settings.is_out_of_scope(doc)
        || (doc.has_tag(TERMINATED_TAG) && doc.termination_date().is_some())
    {
        return Vec::new();
    }

    let mut flags = Vec::new();
    check_required_fields(doc, &mut flags);
    check_original_fields(doc, &mut flags);
    check_property_descriptions(doc, &mut flags);
    check_effective_or_amendment_date(doc, &mut flags);
    check_tag_dates(doc, &mut flags);
    check_terms(doc, &mut flags);
    check_term_payment_models(doc, &mut flags);
    check_date_payment_models(doc, &mut flags);
    flags
}

fn check_required_fields(doc: &Document, flags: &mut Vec<String>) {
    if doc.name.trim().is_empty() {
        flags.push("Missing document name".to_string());
    }
    if doc.document_type.is_none() {
        flags.push("Missing document type".to_string());
    }
    if doc.agreement_group.is_none() {
        flags.push("Missing agreement group".to_string());
    }
}

fn check_original_fields(doc: &Document, flags: &mut Vec<String>) {
    if doc.is_amendment() || doc.is_deed() {
        return;
    }
    if doc.effective_date.is_none() {
        flags.push("Missing effective date".to_string());
    }
    if doc.grantor.is_empty() {
        flags.push("Missing grantor".to_string());
    }
    if doc.property_description.is_empty() {
        flags.push("Missing property description".to_string());
    }
}

fn check_property_descriptions(doc: &Document, flags: &mut Vec<String>) {
    for (index, description) in doc.property_description.iter().enumerate() {
        let n = index + 1;
        if description.county.is_none() {
            flags.push(format!("Property description {}: missing county", n));
        }
        if description.state.is_none() {
            flags.push(format!("Property description {}: missing state", n));
        }
    }
}

fn check_effective_or_amendment_date(doc: &Document, flags: &mut Vec<String>) {
    match (doc.effective_date.is_some(), doc.amendment_date.is_some()) {
        (true, true) => flags.push("Both effective date and amendment date are set".to_string()),
        (false, false) => {
            flags.push("Neither effective date nor amendment date is set".to_string())
        }
        _ => {}
    }
}

fn check_tag_dates(doc: &Document, flags: &mut Vec<String>) {
    for rule in TAG_DATE_RULES {
        let tagged = doc.has_tag(rule.tag);
        let dated = (rule.has_date)(doc);
        if tagged && !dated {
            flags.push(format!("Tagged {} but missing {}", rule.tag, rule.date_name));
        }
    }
    if doc.termination_date().is_some() && !doc.has_tag(TERMINATED_TAG) {
        flags.push(format!("Termination date recorded but not tagged {}", TERMINATED_TAG));
    }
}

fn check_terms(doc: &Document, flags: &mut Vec<String>) {
    for (index, term) in doc.agreement_terms.iter().enumerate() {
        let n = index + 1;
        if term.term_ordinal.is_none() {
            flags.push(format!("Term {}: missing term ordinal", n));
        }
        if term.term_type.is_none() {
            flags.push(format!("Term {}: missing term type", n));
        }
        if term.term_length_years.is_none() {
            flags.push(format!("Term {}: missing term length", n));
        }
        if resolve_term_model(term, &doc.term_payment_models).is_none() {
            match term.model_name() {
                Some(name) => flags.push(format!("Term {}: no payment model named '{}'", n, name)),
                None => flags.push(format!("Term {}: no payment model", n)),
            }
        }
    }
}

fn check_term_payment_models(doc: &Document, flags: &mut Vec<String>) {
    let acres = doc.total_acres();
    for (index, model) in doc.term_payment_models.iter().enumerate() {
        let n = index + 1;
        if model.name.is_none() {
            flags.push(format!("Term payment model {}: missing model name", n));
        }
        if let Err(error) = model.frequency() {
            flags.push(format!("Term payment model {}: {}", n, error));
        }
        if !model.has_pricing_inputs(acres) {
            flags.push(format!("Term payment model {}: no pricing inputs", n));
        }
    }
}

fn check_date_payment_models(doc: &Document, flags: &mut Vec<String>) {
    for (index, model) in doc.date_payment_models.iter().enumerate() {
        let n = index + 1;
        if model.payment_amount.is_none() {
            flags.push(format!("Date payment model {}: missing payment amount", n));
        }
        if model.payment_date.is_none() && model.begin_date.is_none() {
            flags.push(format!("Date payment model {}: missing payment date or begin date", n));
        }
        if !model.is_one_time() {
            if let Err(error) = model.frequency() {
                flags.push(format!("Date payment model {}: {}", n, error));
            }
        }
    }
}
