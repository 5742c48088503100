//! Contract query shapes
//!
//! Every listing is scoped to one signer and one owning application and
//! carries the hint of the index built for it. The design document for all
//! contract indexes is `contract`.
//!
//! | Mode | Extra filter | Order |
//! |------|--------------|-------|
//! | all | none | created_time desc |
//! | finished | `finished_time <= now` | finished_time desc |
//! | unfinished | `finished_time > now` | finished_time asc |
//! | approved | own approval, live | expiry_time asc |
//! | unsigned | no own action, live | expiry_time asc |
//!
//! "Live" means neither executed nor canceled and `expiry_time > now`.

use covenant_core::{
    ApplicationId, ContractId, Query, Selector, SignerId, Timestamp, FIELD_ID,
};

/// Design document holding the contract indexes
pub const DESIGN_DOC: &str = "contract";

/// Index names and their fields, leading field first
pub const CONTRACT_INDEXES: &[(&str, &[&str])] = &[
    ("id", &[FIELD_ID]),
    ("created-time", &["sign.signer", "application_id", "created_time"]),
    ("finished-time", &["sign.signer", "application_id", "finished_time"]),
    ("approved-expiry-time", &["sign.signer", "application_id", "expiry_time"]),
    ("unsigned-expiry-time", &["sign.signer", "application_id", "expiry_time"]),
];

/// Listing mode of the `list` route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    /// Every record of the signer and application
    All,
    /// `finished_time <= now`
    Finished,
    /// `finished_time > now`
    Unfinished,
    /// Approved by this signer and still live
    Approved,
    /// Neither approved nor disapproved by this signer and still live
    Unsigned,
}

impl ListMode {
    /// Parse the optional mode parameter
    ///
    /// Absent means `Unsigned`; an unrecognized value means `All`.
    pub fn from_option(option: Option<&str>) -> Self {
        match option {
            None => ListMode::Unsigned,
            Some("finished") => ListMode::Finished,
            Some("unfinished") => ListMode::Unfinished,
            Some("approved") => ListMode::Approved,
            Some("unsigned") => ListMode::Unsigned,
            Some(_) => ListMode::All,
        }
    }

    /// Mode name as accepted by `from_option`
    pub fn as_str(self) -> &'static str {
        match self {
            ListMode::All => "all",
            ListMode::Finished => "finished",
            ListMode::Unfinished => "unfinished",
            ListMode::Approved => "approved",
            ListMode::Unsigned => "unsigned",
        }
    }

    /// Build the query of this mode
    pub fn query(self, signer: &SignerId, application: &ApplicationId, now: Timestamp) -> Query {
        match self {
            ListMode::All => all(signer, application),
            ListMode::Finished => finished(signer, application, now),
            ListMode::Unfinished => unfinished(signer, application, now),
            ListMode::Approved => approved(signer, application, now),
            ListMode::Unsigned => unsigned(signer, application, now),
        }
    }
}

/// Every sibling record of contract `id`
pub fn by_id(id: &ContractId) -> Query {
    Query::new(Selector::eq(FIELD_ID, id.as_str())).use_index(DESIGN_DOC, "id")
}

fn scope(signer: &SignerId, application: &ApplicationId) -> Vec<Selector> {
    vec![
        Selector::exists(FIELD_ID),
        Selector::eq("sign.signer", signer.as_str()),
        Selector::eq("application_id", application.as_str()),
    ]
}

fn scoped(signer: &SignerId, application: &ApplicationId, extra: Vec<Selector>) -> Selector {
    let mut all = scope(signer, application);
    all.extend(extra);
    Selector::and(all)
}

/// Every record of `signer` under `application`, newest first
pub fn all(signer: &SignerId, application: &ApplicationId) -> Query {
    Query::new(scoped(signer, application, Vec::new()))
        .sort_desc("sign.signer")
        .sort_desc("application_id")
        .sort_desc("created_time")
        .use_index(DESIGN_DOC, "created-time")
}

/// Finished records, most recently finished first
pub fn finished(signer: &SignerId, application: &ApplicationId, now: Timestamp) -> Query {
    let extra = vec![Selector::lte("finished_time", now.to_rfc3339())];
    Query::new(scoped(signer, application, extra))
        .sort_desc("sign.signer")
        .sort_desc("application_id")
        .sort_desc("finished_time")
        .use_index(DESIGN_DOC, "finished-time")
}

/// Unfinished records, soonest to finish first
pub fn unfinished(signer: &SignerId, application: &ApplicationId, now: Timestamp) -> Query {
    let extra = vec![Selector::gt("finished_time", now.to_rfc3339())];
    Query::new(scoped(signer, application, extra))
        .sort_asc("sign.signer")
        .sort_asc("application_id")
        .sort_asc("finished_time")
        .use_index(DESIGN_DOC, "finished-time")
}

/// Live records this signer approved
pub fn approved(signer: &SignerId, application: &ApplicationId, now: Timestamp) -> Query {
    let extra = vec![
        Selector::exists("sign.approved_time"),
        Selector::missing("executed_time"),
        Selector::missing("canceled_time"),
        Selector::gt("expiry_time", now.to_rfc3339()),
    ];
    Query::new(scoped(signer, application, extra))
        .sort_asc("sign.signer")
        .sort_asc("application_id")
        .sort_asc("expiry_time")
        .use_index(DESIGN_DOC, "approved-expiry-time")
}

/// Live records still waiting for this signer
pub fn unsigned(signer: &SignerId, application: &ApplicationId, now: Timestamp) -> Query {
    let extra = vec![
        Selector::missing("sign.approved_time"),
        Selector::missing("sign.disapproved_time"),
        Selector::missing("executed_time"),
        Selector::missing("canceled_time"),
        Selector::gt("expiry_time", now.to_rfc3339()),
    ];
    Query::new(scoped(signer, application, extra))
        .sort_asc("sign.signer")
        .sort_asc("application_id")
        .sort_asc("expiry_time")
        .use_index(DESIGN_DOC, "unsigned-expiry-time")
}
