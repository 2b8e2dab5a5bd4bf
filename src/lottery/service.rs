//! Lottery service layer - raffle lifecycle business logic

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{Actor, SystemStats, UserRole};
use crate::tickets::ledger;

use super::model::{CreateLotteryRequest, Lottery, LotteryStatus};

/// Lottery service errors
#[derive(Error, Debug)]
pub enum LotteryError {
    #[error("Lottery not found")]
    NotFound,

    #[error("Not authorized to manage this lottery")]
    NotOwner,

    #[error("Lottery is already completed")]
    AlreadyCompleted,

    #[error("Cannot draw a winner: no tickets sold")]
    NoTicketsSold,

    #[error("Invalid lottery status: {0}")]
    InvalidStatus(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for LotteryError {
    fn from(e: sqlx::Error) -> Self {
        LotteryError::DatabaseError(e.to_string())
    }
}

impl From<LotteryError> for ApiError {
    fn from(e: LotteryError) -> Self {
        match e {
            LotteryError::NotFound => ApiError::NotFound("Lottery not found".to_string()),
            LotteryError::NotOwner => ApiError::Forbidden(e.to_string()),
            LotteryError::AlreadyCompleted => ApiError::Conflict(e.to_string()),
            LotteryError::NoTicketsSold => ApiError::ValidationError(e.to_string()),
            LotteryError::InvalidStatus(_) => ApiError::ValidationError(e.to_string()),
            LotteryError::DatabaseError(msg) => ApiError::DatabaseError(msg),
        }
    }
}

/// Lottery service for managing the raffle lifecycle
pub struct LotteryService {
    db_pool: PgPool,
}

impl LotteryService {
    /// Create new lottery service instance
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Storefront listing: active raffles only
    pub async fn list_active(&self) -> Result<Vec<Lottery>, LotteryError> {
        let lotteries = sqlx::query_as::<_, Lottery>(
            "SELECT * FROM lotteries WHERE status = 'active' ORDER BY draw_date ASC",
        )
        .fetch_all(&self.db_pool)
        .await?;

        Ok(lotteries)
    }

    /// Get a single lottery by ID (also used by buyers to refresh the
    /// sold set before submitting)
    pub async fn get(&self, id: Uuid) -> Result<Lottery, LotteryError> {
        sqlx::query_as::<_, Lottery>("SELECT * FROM lotteries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or(LotteryError::NotFound)
    }

    /// Role-scoped listing: all for superadmin, owned for admin,
    /// participated-in (by buyer contact) for public accounts.
    pub async fn list_for_user(
        &self,
        actor: &Actor,
        email: &str,
    ) -> Result<Vec<Lottery>, LotteryError> {
        let lotteries = match actor.role {
            UserRole::SuperAdmin => {
                sqlx::query_as::<_, Lottery>("SELECT * FROM lotteries ORDER BY created_at DESC")
                    .fetch_all(&self.db_pool)
                    .await?
            }
            UserRole::Admin => {
                sqlx::query_as::<_, Lottery>(
                    "SELECT * FROM lotteries WHERE created_by = $1 ORDER BY created_at DESC",
                )
                .bind(actor.user_id)
                .fetch_all(&self.db_pool)
                .await?
            }
            UserRole::Public => {
                sqlx::query_as::<_, Lottery>(
                    r#"
                    SELECT * FROM lotteries
                    WHERE id IN (SELECT DISTINCT lottery_id FROM purchases WHERE buyer_contact = $1)
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(email)
                .fetch_all(&self.db_pool)
                .await?
            }
        };

        Ok(lotteries)
    }

    /// Create a lottery with an empty sold set
    pub async fn create(
        &self,
        req: CreateLotteryRequest,
        actor: &Actor,
    ) -> Result<Lottery, LotteryError> {
        let status = match req.status {
            None => LotteryStatus::Active,
            Some(s @ (LotteryStatus::Active | LotteryStatus::Upcoming)) => s,
            Some(other) => {
                return Err(LotteryError::InvalidStatus(format!(
                    "cannot create a lottery as '{}'",
                    other.as_str()
                )))
            }
        };

        let lottery = sqlx::query_as::<_, Lottery>(
            r#"
            INSERT INTO lotteries (
                id, title, description, prize, image_url, total_numbers,
                price_per_number_cents, sold_numbers, status, draw_date,
                contact_phone, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, '{}', $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&req.title)
        .bind(req.description.unwrap_or_default())
        .bind(&req.prize)
        .bind(req.image_url.unwrap_or_default())
        .bind(req.total_numbers)
        .bind(req.price_per_number_cents)
        .bind(status)
        .bind(req.draw_date)
        .bind(&req.contact_phone)
        .bind(actor.user_id)
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(lottery_id = %lottery.id, title = %lottery.title, "Lottery created");
        Ok(lottery)
    }

    /// Admin toggle: Active ⇄ Paused (Upcoming activates). Serialized
    /// against the draw via the row lock.
    pub async fn toggle_status(
        &self,
        id: Uuid,
        actor: &Actor,
    ) -> Result<Lottery, LotteryError> {
        let mut tx = self.db_pool.begin().await?;

        let lottery = sqlx::query_as::<_, Lottery>(
            "SELECT * FROM lotteries WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(LotteryError::NotFound)?;

        if !actor.may_manage(lottery.created_by) {
            return Err(LotteryError::NotOwner);
        }

        let next = lottery.status.toggled().ok_or(LotteryError::AlreadyCompleted)?;

        let updated = sqlx::query_as::<_, Lottery>(
            "UPDATE lotteries SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(next)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(lottery_id = %id, status = %next.as_str(), "Lottery status toggled");
        Ok(updated)
    }

    /// Delete a lottery. Irreversible; cascades to its purchases.
    pub async fn delete(&self, id: Uuid, actor: &Actor) -> Result<(), LotteryError> {
        let lottery = self.get(id).await?;
        if !actor.may_manage(lottery.created_by) {
            return Err(LotteryError::NotOwner);
        }

        sqlx::query("DELETE FROM lotteries WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        tracing::warn!(lottery_id = %id, "Lottery deleted");
        Ok(())
    }

    /// Run the draw: pick one sold number uniformly at random and
    /// complete the lottery. Not idempotent — a completed lottery can
    /// never be redrawn.
    pub async fn run_draw(&self, id: Uuid, actor: &Actor) -> Result<Lottery, LotteryError> {
        let mut tx = self.db_pool.begin().await?;

        let lottery = sqlx::query_as::<_, Lottery>(
            "SELECT * FROM lotteries WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(LotteryError::NotFound)?;

        if !actor.may_manage(lottery.created_by) {
            return Err(LotteryError::NotOwner);
        }
        if lottery.status == LotteryStatus::Completed {
            return Err(LotteryError::AlreadyCompleted);
        }

        let winning_number = {
            let mut rng = rand::thread_rng();
            ledger::pick_winner(&lottery.sold_numbers, &mut rng)
                .ok_or(LotteryError::NoTicketsSold)?
        };

        let updated = sqlx::query_as::<_, Lottery>(
            r#"
            UPDATE lotteries
            SET status = 'completed', winning_number = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(winning_number)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(lottery_id = %id, winning_number, "Draw completed");
        Ok(updated)
    }

    /// Attach the generated draw narrative. Best-effort: a failure here
    /// never reverts the draw.
    pub async fn attach_narrative(&self, id: Uuid, narrative: &str) -> Result<(), LotteryError> {
        sqlx::query("UPDATE lotteries SET draw_narrative = $1, updated_at = NOW() WHERE id = $2")
            .bind(narrative)
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        Ok(())
    }

    /// Superadmin dashboard overview
    pub async fn system_stats(&self) -> Result<SystemStats, LotteryError> {
        let stats = sqlx::query_as::<_, SystemStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users) AS total_users,
                (SELECT COUNT(*) FROM users WHERE role IN ('admin', 'superadmin')) AS total_admins,
                (SELECT COUNT(*) FROM lotteries) AS total_lotteries,
                (SELECT COUNT(*) FROM lotteries WHERE status = 'active') AS active_lotteries,
                (SELECT COALESCE(SUM(total_amount_cents), 0)::BIGINT
                   FROM purchases WHERE status = 'confirmed') AS total_revenue_cents,
                (SELECT COUNT(*) FROM purchases WHERE status = 'pending') AS pending_payments
            "#,
        )
        .fetch_one(&self.db_pool)
        .await?;

        Ok(stats)
    }
}
