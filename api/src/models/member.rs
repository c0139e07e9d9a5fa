use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Bumped whenever a field is added to [`Member`]. Older records still
/// deserialize because every later field carries a serde default.
pub const MEMBER_SCHEMA_VERSION: i32 = 2;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MembershipPlan {
    #[serde(rename = "monthly")]
    Monthly,
    #[serde(rename = "pro-plus")]
    ProPlus,
    #[serde(rename = "yearly")]
    Yearly,
}

impl MembershipPlan {
    pub const ALL: [MembershipPlan; 3] = [
        MembershipPlan::Monthly,
        MembershipPlan::ProPlus,
        MembershipPlan::Yearly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipPlan::Monthly => "monthly",
            MembershipPlan::ProPlus => "pro-plus",
            MembershipPlan::Yearly => "yearly",
        }
    }

    /// Price in whole currency units.
    pub fn price(&self) -> i64 {
        match self {
            MembershipPlan::Monthly => 499,
            MembershipPlan::ProPlus => 999,
            MembershipPlan::Yearly => 4999,
        }
    }

    pub fn discount_percentage(&self) -> i32 {
        match self {
            MembershipPlan::ProPlus | MembershipPlan::Yearly => 20,
            MembershipPlan::Monthly => 10,
        }
    }

    pub fn renewal_period(&self) -> Duration {
        match self {
            MembershipPlan::Yearly => Duration::days(365),
            _ => Duration::days(30),
        }
    }

    pub fn grants_first_booking_offer(&self) -> bool {
        matches!(self, MembershipPlan::ProPlus)
    }

    /// Plan named by a request. Missing or unrecognised names get monthly
    /// terms, the same plan the order was charged for.
    pub fn resolve(name: Option<&str>) -> Self {
        name.and_then(|n| n.parse().ok())
            .unwrap_or(MembershipPlan::Monthly)
    }
}

impl fmt::Display for MembershipPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MembershipPlan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" => Ok(MembershipPlan::Monthly),
            "pro-plus" => Ok(MembershipPlan::ProPlus),
            "yearly" => Ok(MembershipPlan::Yearly),
            other => Err(format!("Unknown plan: {}", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    #[default]
    Inactive,
    Active,
    Cancelled,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Inactive => "inactive",
            MemberStatus::Active => "active",
            MemberStatus::Cancelled => "cancelled",
        }
    }
}

/// Discount terms assigned by a checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipTerms {
    pub plan: MembershipPlan,
    pub discount_percentage: i32,
    pub has_first_booking_offer: bool,
    pub purchase_date: DateTime<Utc>,
    pub renewal_date: DateTime<Utc>,
}

impl MembershipTerms {
    pub fn for_plan(plan: MembershipPlan, now: DateTime<Utc>) -> Self {
        MembershipTerms {
            plan,
            discount_percentage: plan.discount_percentage(),
            has_first_booking_offer: plan.grants_first_booking_offer(),
            purchase_date: now,
            renewal_date: now + plan.renewal_period(),
        }
    }
}

/// Stored in the `members` collection.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub full_name: String,
    pub phone: String,
    #[serde(default)]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub plan: Option<MembershipPlan>,
    #[serde(default)]
    pub status: MemberStatus,
    #[serde(default)]
    pub discount_percentage: i32,
    #[serde(default)]
    pub has_first_booking_offer: bool,
    #[serde(default)]
    pub total_bookings: i64,
    #[serde(default)]
    pub total_savings: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub purchase_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub renewal_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub schema_version: i32,
}

impl Member {
    /// A fresh, inactive member with zeroed counters.
    pub fn new(email: String, full_name: String, phone: String, now: DateTime<Utc>) -> Self {
        Member {
            id: None,
            email,
            full_name,
            phone,
            password_hash: None,
            plan: None,
            status: MemberStatus::Inactive,
            discount_percentage: 0,
            has_first_booking_offer: false,
            total_bookings: 0,
            total_savings: 0.0,
            created_at: now,
            purchase_date: None,
            renewal_date: None,
            cancelled_at: None,
            updated_at: None,
            schema_version: MEMBER_SCHEMA_VERSION,
        }
    }

    pub fn apply_terms(&mut self, terms: &MembershipTerms) {
        self.plan = Some(terms.plan);
        self.status = MemberStatus::Active;
        self.discount_percentage = terms.discount_percentage;
        self.has_first_booking_offer = terms.has_first_booking_offer;
        self.purchase_date = Some(terms.purchase_date);
        self.renewal_date = Some(terms.renewal_date);
        self.schema_version = MEMBER_SCHEMA_VERSION;
    }

    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }

    pub fn id_hex(&self) -> String {
        self.id.map(|id| id.to_hex()).unwrap_or_default()
    }
}

/// Trims and lowercases an email so it can be used as the member key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
