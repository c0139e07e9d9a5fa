use std::sync::Arc;

use chrono::Utc;

use crate::error::{ApiError, StoreError};
use crate::models::api::{
    CheckoutRequest, MemberView, MembershipStats, MembershipStatus, ProfileUpdateRequest,
};
use crate::models::member::{normalize_email, Member, MembershipPlan, MembershipTerms};
use crate::repository::{BookingStore, MemberStore, ProfileUpdate};
use crate::services::{optional_field, require_field};

const MEMBER_NOT_FOUND: &str = "Member not found";

pub struct MembershipService {
    members: Arc<dyn MemberStore>,
    bookings: Arc<dyn BookingStore>,
}

impl MembershipService {
    pub fn new(members: Arc<dyn MemberStore>, bookings: Arc<dyn BookingStore>) -> Self {
        MembershipService { members, bookings }
    }

    pub async fn verify(&self, email: Option<String>) -> Result<MembershipStatus, ApiError> {
        let email = optional_field(email)
            .map(|e| normalize_email(&e))
            .ok_or_else(|| ApiError::Validation("Email required".to_string()))?;

        Ok(match self.members.find_by_email(&email).await? {
            Some(member) if member.is_active() => MembershipStatus::active(&member),
            _ => MembershipStatus::inactive(),
        })
    }

    /// Activates or renews a membership and assigns the plan's discount
    /// terms. Creates the member when the email is unknown.
    pub async fn checkout(&self, request: CheckoutRequest) -> Result<Member, ApiError> {
        let plan = require_field(request.plan)?;
        let full_name = require_field(request.full_name)?;
        let email = normalize_email(&require_field(request.email)?);
        let phone = require_field(request.phone)?;
        let plan = MembershipPlan::resolve(Some(&plan));

        let now = Utc::now();
        let terms = MembershipTerms::for_plan(plan, now);

        if !self
            .members
            .apply_checkout(&email, &full_name, &phone, &terms)
            .await?
        {
            let mut member = Member::new(email.clone(), full_name.clone(), phone.clone(), now);
            member.apply_terms(&terms);
            match self.members.insert(member).await {
                Ok(_) => {}
                // lost a race with a concurrent signup or checkout
                Err(StoreError::Duplicate(_)) => {
                    self.members
                        .apply_checkout(&email, &full_name, &phone, &terms)
                        .await?;
                }
                Err(err) => return Err(err.into()),
            }
        }

        tracing::info!(
            %email,
            plan = %plan,
            discount = terms.discount_percentage,
            first_booking_offer = terms.has_first_booking_offer,
            "membership activated"
        );

        self.members
            .find_by_email(&email)
            .await?
            .ok_or_else(|| ApiError::Upstream(format!("member {} vanished after checkout", email)))
    }

    pub async fn get(&self, email: &str) -> Result<MemberView, ApiError> {
        let email = normalize_email(email);
        self.members
            .find_by_email(&email)
            .await?
            .map(|member| MemberView::from(&member))
            .ok_or_else(|| ApiError::NotFound(MEMBER_NOT_FOUND.to_string()))
    }

    pub async fn update_profile(
        &self,
        email: &str,
        request: ProfileUpdateRequest,
    ) -> Result<(), ApiError> {
        let email = normalize_email(email);
        let full_name = optional_field(request.full_name);
        let phone = optional_field(request.phone);
        let update = ProfileUpdate {
            full_name: full_name.as_deref(),
            phone: phone.as_deref(),
        };

        if !self.members.update_profile(&email, update, Utc::now()).await? {
            return Err(ApiError::NotFound(MEMBER_NOT_FOUND.to_string()));
        }
        tracing::info!(%email, changed = !update.is_empty(), "membership profile updated");
        Ok(())
    }

    /// Soft delete: the record stays with status `cancelled`.
    pub async fn cancel(&self, email: &str) -> Result<(), ApiError> {
        let email = normalize_email(email);
        if !self.members.cancel(&email, Utc::now()).await? {
            return Err(ApiError::NotFound(MEMBER_NOT_FOUND.to_string()));
        }
        tracing::info!(%email, "membership cancelled");
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<MemberView>, ApiError> {
        let members = self.members.list().await?;
        Ok(members.iter().map(MemberView::from).collect())
    }

    pub async fn stats(&self) -> Result<MembershipStats, ApiError> {
        let members = self.members.list().await?;
        let total_bookings = self.bookings.count().await?;
        Ok(summarize(&members, total_bookings))
    }
}

pub fn summarize(members: &[Member], total_bookings: u64) -> MembershipStats {
    let on_plan = |plan: MembershipPlan| members.iter().filter(|m| m.plan == Some(plan)).count();
    let divisor = members.len().max(1) as f64;

    MembershipStats {
        total_members: members.len(),
        active_members: members.iter().filter(|m| m.is_active()).count(),
        monthly_members: on_plan(MembershipPlan::Monthly),
        pro_plus_members: on_plan(MembershipPlan::ProPlus),
        yearly_members: on_plan(MembershipPlan::Yearly),
        total_bookings,
        total_savings: members.iter().map(|m| m.total_savings).sum(),
        average_bookings_per_member: (total_bookings as f64 / divisor).round() as u64,
    }
}
