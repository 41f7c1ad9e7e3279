//! Listing categories and the status sets behind them.
//!
//! A category is evaluated from one organization's point of view. Each
//! category names the statuses that qualify a record when that
//! organization is the requester and, separately, when it is the
//! counterpart. The sets are asymmetric: they encode which side owns the
//! next move after a cancel, reject or revoke.

use serde::{Deserialize, Serialize};

use crate::models::affiliation::AffiliationStatus;

use AffiliationStatus::*;

/// Listing category requested by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterType {
    Unaffiliated,
    Affiliates,
    ActiveRequests,
    #[default]
    All,
}

/// Qualifying statuses for each side of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSets {
    pub as_requester: &'static [AffiliationStatus],
    pub as_counterpart: &'static [AffiliationStatus],
}

const UNAFFILIATED: StatusSets = StatusSets {
    as_requester: &[Removed, RevokedFrom, Cancelled],
    as_counterpart: &[Rejected, Removed, RevokedTo],
};

const AFFILIATES: StatusSets = StatusSets {
    as_requester: &[Affiliated],
    as_counterpart: &[Affiliated],
};

const ACTIVE_REQUESTS: StatusSets = StatusSets {
    as_requester: &[ActiveRequest, Rejected, RevokedTo],
    as_counterpart: &[ActiveRequest, Cancelled, RevokedFrom],
};

const ALL: StatusSets = StatusSets {
    as_requester: AffiliationStatus::PERSISTED,
    as_counterpart: AffiliationStatus::PERSISTED,
};

impl FilterType {
    pub fn status_sets(self) -> StatusSets {
        match self {
            FilterType::Unaffiliated => UNAFFILIATED,
            FilterType::Affiliates => AFFILIATES,
            FilterType::ActiveRequests => ACTIVE_REQUESTS,
            FilterType::All => ALL,
        }
    }
}

/// Statuses the original requester may re-raise from.
pub const REOPENABLE_BY_REQUESTER: &[AffiliationStatus] = &[Cancelled, RevokedFrom];

/// Statuses the original counterpart may re-raise from.
pub const REOPENABLE_BY_COUNTERPART: &[AffiliationStatus] = &[Rejected, RevokedTo];

/// Terminal statuses a record can be removed from.
pub const REMOVABLE: &[AffiliationStatus] = &[
    Cancelled,
    Rejected,
    RevokedFrom,
    RevokedTo,
    UnregisteredTo,
    UnregisteredFrom,
];
