//! Purchase service layer - the reservation protocol
//!
//! Reserving numbers and creating the pending purchase happen in one
//! transaction under a row lock on the lottery, so two overlapping
//! submissions serialize: the loser gets a conflict naming the exact
//! numbers that were taken. Confirm and reject are the manual payment
//! reconciliation step; both are idempotent and leave prior state
//! untouched on any failure.

use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use thiserror::Error;
use uuid::Uuid;

use crate::error::ApiError;
use crate::lottery::{Lottery, LotteryStatus};
use crate::models::{Actor, UserRole};
use crate::tickets::ledger::{self, LedgerError};
use crate::tickets::ConfirmationMessage;

use super::model::{
    PendingPurchase, Purchase, PurchaseAction, SubmitPurchaseRequest, SubmitPurchaseResponse,
    TransitionOutcome,
};

/// Purchase service errors
#[derive(Error, Debug)]
pub enum PurchaseError {
    #[error("Lottery not found")]
    LotteryNotFound,

    #[error("Purchase not found")]
    PurchaseNotFound,

    #[error("Lottery is not open for purchases ({0})")]
    LotteryNotOpen(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Purchase was already confirmed")]
    AlreadyConfirmed,

    #[error("Purchase was already rejected")]
    AlreadyRejected,

    #[error("Not authorized to manage this purchase")]
    NotOwner,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for PurchaseError {
    fn from(e: sqlx::Error) -> Self {
        PurchaseError::DatabaseError(e.to_string())
    }
}

impl From<PurchaseError> for ApiError {
    fn from(e: PurchaseError) -> Self {
        match e {
            PurchaseError::LotteryNotFound => ApiError::NotFound("Lottery not found".to_string()),
            PurchaseError::PurchaseNotFound => {
                ApiError::NotFound("Purchase not found".to_string())
            }
            PurchaseError::LotteryNotOpen(_) => ApiError::ValidationError(e.to_string()),
            PurchaseError::Ledger(LedgerError::Unavailable(numbers)) => {
                ApiError::NumbersUnavailable(numbers)
            }
            PurchaseError::Ledger(inner) => ApiError::ValidationError(inner.to_string()),
            PurchaseError::AlreadyConfirmed | PurchaseError::AlreadyRejected => {
                ApiError::Conflict(e.to_string())
            }
            PurchaseError::NotOwner => ApiError::Forbidden(e.to_string()),
            PurchaseError::DatabaseError(msg) => ApiError::DatabaseError(msg),
        }
    }
}

/// Purchase service for the reservation and reconciliation workflow
pub struct PurchaseService {
    db_pool: PgPool,
}

impl PurchaseService {
    /// Create new purchase service instance
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Reserve numbers and create the pending purchase in a single
    /// transaction. The client-supplied total (if any) is never read;
    /// the amount comes from the lottery's own price.
    pub async fn reserve(
        &self,
        req: SubmitPurchaseRequest,
    ) -> Result<SubmitPurchaseResponse, PurchaseError> {
        let mut tx = self.db_pool.begin().await?;

        // Row lock: serializes concurrent reservations per lottery.
        let lottery = sqlx::query_as::<_, Lottery>(
            "SELECT * FROM lotteries WHERE id = $1 FOR UPDATE",
        )
        .bind(req.lottery_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(PurchaseError::LotteryNotFound)?;

        if lottery.status != LotteryStatus::Active {
            return Err(PurchaseError::LotteryNotOpen(
                lottery.status.as_str().to_string(),
            ));
        }

        let updated_sold =
            ledger::reserve(&lottery.sold_numbers, &req.numbers, lottery.total_numbers)?;
        let total_amount_cents = req.numbers.len() as i64 * lottery.price_per_number_cents;

        let purchase_id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO purchases (
                id, lottery_id, buyer_name, buyer_contact, numbers,
                total_amount_cents, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7, $7)
            "#,
        )
        .bind(purchase_id)
        .bind(lottery.id)
        .bind(&req.buyer_name)
        .bind(&req.buyer_contact)
        .bind(&req.numbers)
        .bind(total_amount_cents)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE lotteries SET sold_numbers = $1, updated_at = NOW() WHERE id = $2")
            .bind(&updated_sold)
            .bind(lottery.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            purchase_id = %purchase_id,
            lottery_id = %lottery.id,
            numbers = ?req.numbers,
            total_amount_cents,
            "Purchase reserved"
        );

        let message = ConfirmationMessage {
            lottery_title: lottery.title,
            numbers: req.numbers,
            total_cents: total_amount_cents,
            purchase_id: purchase_id.to_string(),
        };

        Ok(SubmitPurchaseResponse {
            purchase_id,
            whatsapp_url: message.whatsapp_url(&lottery.contact_phone),
            contact_phone: lottery.contact_phone,
            total_amount_cents,
            message: message.render(),
        })
    }

    /// Confirm a pending purchase. Numbers stay sold. Idempotent on an
    /// already-confirmed purchase.
    pub async fn confirm(&self, purchase_id: Uuid, actor: &Actor) -> Result<(), PurchaseError> {
        let mut tx = self.db_pool.begin().await?;

        let purchase = self
            .lock_purchase(&mut tx, purchase_id)
            .await?
            .ok_or(PurchaseError::PurchaseNotFound)?;

        self.check_ownership(&mut tx, purchase.lottery_id, actor)
            .await?;

        match purchase.status.transition(PurchaseAction::Confirm) {
            TransitionOutcome::AlreadyApplied => return Ok(()),
            TransitionOutcome::Invalid => return Err(PurchaseError::AlreadyRejected),
            TransitionOutcome::Applied => {}
        }

        sqlx::query("UPDATE purchases SET status = 'confirmed', updated_at = NOW() WHERE id = $1")
            .bind(purchase_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(purchase_id = %purchase_id, "Purchase confirmed");
        Ok(())
    }

    /// Reject a pending purchase and release exactly its numbers back to
    /// the available pool. Idempotent on an already-rejected purchase.
    pub async fn reject(&self, purchase_id: Uuid, actor: &Actor) -> Result<(), PurchaseError> {
        self.reject_inner(purchase_id, Some(actor)).await
    }

    async fn reject_inner(
        &self,
        purchase_id: Uuid,
        actor: Option<&Actor>,
    ) -> Result<(), PurchaseError> {
        let mut tx = self.db_pool.begin().await?;

        let purchase = self
            .lock_purchase(&mut tx, purchase_id)
            .await?
            .ok_or(PurchaseError::PurchaseNotFound)?;

        // Lock ordering is purchase then lottery, same as confirm's
        // ownership lookup, so concurrent admin actions cannot deadlock.
        let lottery = sqlx::query_as::<_, Lottery>(
            "SELECT * FROM lotteries WHERE id = $1 FOR UPDATE",
        )
        .bind(purchase.lottery_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(PurchaseError::LotteryNotFound)?;

        if let Some(actor) = actor {
            if !actor.may_manage(lottery.created_by) {
                return Err(PurchaseError::NotOwner);
            }
        }

        match purchase.status.transition(PurchaseAction::Reject) {
            TransitionOutcome::AlreadyApplied => return Ok(()),
            TransitionOutcome::Invalid => return Err(PurchaseError::AlreadyConfirmed),
            TransitionOutcome::Applied => {}
        }

        let released = ledger::release(&lottery.sold_numbers, &purchase.numbers);

        sqlx::query("UPDATE purchases SET status = 'rejected', updated_at = NOW() WHERE id = $1")
            .bind(purchase_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE lotteries SET sold_numbers = $1, updated_at = NOW() WHERE id = $2")
            .bind(&released)
            .bind(lottery.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            purchase_id = %purchase_id,
            released = ?purchase.numbers,
            "Purchase rejected, numbers released"
        );
        Ok(())
    }

    /// Admin queue of pending purchases, scoped to the actor's lotteries
    /// (all lotteries for superadmin)
    pub async fn list_pending(&self, actor: &Actor) -> Result<Vec<PendingPurchase>, PurchaseError> {
        let mut query_builder: sqlx::QueryBuilder<Postgres> = sqlx::QueryBuilder::new(
            r#"
            SELECT p.id, p.lottery_id, l.title AS lottery_title, p.buyer_name,
                   p.buyer_contact, p.numbers, p.total_amount_cents, p.created_at
            FROM purchases p
            JOIN lotteries l ON l.id = p.lottery_id
            WHERE p.status = 'pending'
            "#,
        );

        if actor.role != UserRole::SuperAdmin {
            query_builder.push(" AND l.created_by = ");
            query_builder.push_bind(actor.user_id);
        }

        query_builder.push(" ORDER BY p.created_at ASC");

        let pending = query_builder
            .build_query_as::<PendingPurchase>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(pending)
    }

    /// Purchases made under a given buyer contact (the "my tickets" view)
    pub async fn list_for_contact(&self, contact: &str) -> Result<Vec<Purchase>, PurchaseError> {
        let purchases = sqlx::query_as::<_, Purchase>(
            "SELECT * FROM purchases WHERE buyer_contact = $1 ORDER BY created_at DESC",
        )
        .bind(contact)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(purchases)
    }

    /// Auto-reject purchases that sat pending longer than `ttl_hours`,
    /// releasing their numbers through the same transactional path an
    /// admin rejection uses. Returns how many were expired.
    pub async fn expire_stale(&self, ttl_hours: i64) -> Result<u64, PurchaseError> {
        let stale: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT id FROM purchases
            WHERE status = 'pending' AND created_at < NOW() - make_interval(hours => $1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(ttl_hours as i32)
        .fetch_all(&self.db_pool)
        .await?;

        let mut expired = 0u64;
        for (id,) in stale {
            match self.reject_inner(id, None).await {
                Ok(()) => {
                    tracing::warn!(purchase_id = %id, "Pending purchase expired");
                    expired += 1;
                }
                Err(e) => {
                    tracing::error!(purchase_id = %id, error = %e, "Failed to expire purchase");
                }
            }
        }

        Ok(expired)
    }

    // ===== Private helpers =====

    async fn lock_purchase(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        purchase_id: Uuid,
    ) -> Result<Option<Purchase>, PurchaseError> {
        let purchase = sqlx::query_as::<_, Purchase>(
            "SELECT * FROM purchases WHERE id = $1 FOR UPDATE",
        )
        .bind(purchase_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(purchase)
    }

    async fn check_ownership(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        lottery_id: Uuid,
        actor: &Actor,
    ) -> Result<(), PurchaseError> {
        let (created_by,): (Uuid,) =
            sqlx::query_as("SELECT created_by FROM lotteries WHERE id = $1")
                .bind(lottery_id)
                .fetch_optional(&mut **tx)
                .await?
                .ok_or(PurchaseError::LotteryNotFound)?;

        if !actor.may_manage(created_by) {
            return Err(PurchaseError::NotOwner);
        }

        Ok(())
    }
}
