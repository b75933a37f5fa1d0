//! Document model - the normalized agreement and its builder.
//!
//! Field names from the upstream fact bag become strongly-typed document
//! attributes here. The document owns its terms and payment models; the
//! schedule, merge, and QC passes produce new snapshots of it.

mod builder;
mod model;
mod nickname;
mod payment_model;

pub use builder::DocumentBuilder;
pub use model::{
    document_type_abbreviation, AgreementTerm, AmendmentRef, Document, DocumentPhase, Grantor,
    OperationalDetails, Payment, PaymentSource, PropertyDescription, TermType, Termination,
    DEED_DOCUMENT_TYPE, PURCHASED_TAG, TERMINATED_TAG,
};
pub use nickname::nickname_grantor;
pub use payment_model::{
    DatePaymentModel, Escalation, EscalationType, FirstPaymentPolicy, LagPolicy, PaymentFrequency,
    PricingMethod, ScheduledModel, TermPaymentModel,
};
