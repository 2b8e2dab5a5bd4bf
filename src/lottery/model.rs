//! Lottery models and DTOs

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

/// Lottery model. `sold_numbers` is the authoritative sold set: sorted,
/// duplicate-free, equal to the union of all non-rejected purchases.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Lottery {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub prize: String,
    pub image_url: String,
    pub total_numbers: i32,
    pub price_per_number_cents: i64,
    pub sold_numbers: Vec<i32>,
    pub status: LotteryStatus,
    pub draw_date: DateTime<Utc>,
    pub contact_phone: String,
    pub winning_number: Option<i32>,
    pub draw_narrative: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lottery lifecycle status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "lottery_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LotteryStatus {
    Active,
    Paused,
    Completed,
    Upcoming,
}

impl LotteryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LotteryStatus::Active => "active",
            LotteryStatus::Paused => "paused",
            LotteryStatus::Completed => "completed",
            LotteryStatus::Upcoming => "upcoming",
        }
    }

    /// The admin toggle: Active ⇄ Paused, Upcoming activates.
    /// Completed is terminal and cannot be toggled.
    pub fn toggled(self) -> Option<LotteryStatus> {
        match self {
            LotteryStatus::Active => Some(LotteryStatus::Paused),
            LotteryStatus::Paused => Some(LotteryStatus::Active),
            LotteryStatus::Upcoming => Some(LotteryStatus::Active),
            LotteryStatus::Completed => None,
        }
    }
}

/// Request DTO for creating a lottery
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLotteryRequest {
    #[validate(length(min = 3, max = 160))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 160))]
    pub prize: String,
    pub image_url: Option<String>,
    #[validate(range(min = 1, max = 100_000))]
    pub total_numbers: i32,
    #[validate(range(min = 1))]
    pub price_per_number_cents: i64,
    #[validate(length(min = 6, max = 20))]
    pub contact_phone: String,
    pub draw_date: DateTime<Utc>,
    /// Only `active` or `upcoming` are accepted at creation
    pub status: Option<LotteryStatus>,
}

/// Response DTO for a completed draw
#[derive(Debug, Serialize)]
pub struct DrawResponse {
    pub lottery_id: Uuid,
    pub winning_number: i32,
    pub narrative: String,
}

/// Request DTO for the lucky-number suggestion endpoint
#[derive(Debug, Deserialize, Validate)]
pub struct LuckyNumbersRequest {
    #[validate(range(min = 1, max = 20))]
    pub count: Option<u32>,
}

/// Response DTO for the lucky-number suggestion endpoint
#[derive(Debug, Serialize)]
pub struct LuckyNumbersResponse {
    pub numbers: Vec<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_toggle_rules() {
        assert_eq!(
            LotteryStatus::Active.toggled(),
            Some(LotteryStatus::Paused)
        );
        assert_eq!(
            LotteryStatus::Paused.toggled(),
            Some(LotteryStatus::Active)
        );
        assert_eq!(
            LotteryStatus::Upcoming.toggled(),
            Some(LotteryStatus::Active)
        );
        assert_eq!(LotteryStatus::Completed.toggled(), None);
    }

    #[test]
    fn test_toggle_round_trips_while_open() {
        let status = LotteryStatus::Active;
        let toggled_twice = status.toggled().unwrap().toggled().unwrap();
        assert_eq!(toggled_twice, LotteryStatus::Active);
    }
}
