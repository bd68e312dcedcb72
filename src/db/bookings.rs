//! Booking repository.
//!
//! Every read and write of the bookings table goes through this module,
//! and every status change goes through the transition table in
//! [`BookingStatus::apply`]. Mutations run in a transaction with a
//! status-guarded UPDATE, so two staff tabs acting on the same booking
//! cannot silently overwrite each other's transition.

use sqlx::SqlitePool;
use thiserror::Error;
use uuid::Uuid;

use super::models::{Booking, BookingAction, BookingStatus, TransitionError};

#[derive(Debug, Error)]
pub enum BookingStoreError {
    #[error("booking not found")]
    NotFound,
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("booking {0} was modified concurrently, retry the action")]
    Conflict(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Fields captured when a customer submits the booking form.
///
/// Villa name/image/price arrive here already snapshotted from the
/// catalog; the booking keeps those values even if the villa changes.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub villa_id: String,
    pub villa_name: String,
    pub villa_image: String,
    pub check_in: String,
    pub check_out: String,
    pub guests: i64,
    pub total_price: i64,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub message: Option<String>,
    pub user_id: String,
    pub user_email: String,
}

/// Filters for the back-office booking list.
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub check_in: Option<String>,
    /// Matches against booking id, customer name and villa name
    pub search: Option<String>,
}

fn new_booking_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("BK-{}", &hex[..8])
}

/// Insert a new Pending booking and return the stored record.
pub async fn create(pool: &SqlitePool, new: &NewBooking) -> Result<Booking, BookingStoreError> {
    let id = new_booking_id();
    let created_at = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO bookings
            (id, villa_id, villa_name, villa_image, check_in, check_out, guests,
             total_price, status, customer_name, customer_phone, message,
             user_id, user_email, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&new.villa_id)
    .bind(&new.villa_name)
    .bind(&new.villa_image)
    .bind(&new.check_in)
    .bind(&new.check_out)
    .bind(new.guests)
    .bind(new.total_price)
    .bind(BookingStatus::Pending.as_str())
    .bind(&new.customer_name)
    .bind(&new.customer_phone)
    .bind(&new.message)
    .bind(&new.user_id)
    .bind(&new.user_email)
    .bind(&created_at)
    .execute(pool)
    .await?;

    let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
        .bind(&id)
        .fetch_one(pool)
        .await?;

    Ok(booking)
}

pub async fn get(pool: &SqlitePool, id: &str) -> Result<Option<Booking>, BookingStoreError> {
    let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(booking)
}

/// Bookings owned by the given account email, newest first.
pub async fn list_by_user(pool: &SqlitePool, email: &str) -> Result<Vec<Booking>, BookingStoreError> {
    let bookings = sqlx::query_as::<_, Booking>(
        "SELECT * FROM bookings WHERE user_email = ? ORDER BY created_at DESC",
    )
    .bind(email)
    .fetch_all(pool)
    .await?;
    Ok(bookings)
}

/// All bookings matching the filter, newest first.
pub async fn list_all(pool: &SqlitePool, filter: &BookingFilter) -> Result<Vec<Booking>, BookingStoreError> {
    let mut sql = String::from("SELECT * FROM bookings WHERE 1=1");
    if filter.status.is_some() {
        sql.push_str(" AND status = ?");
    }
    if filter.check_in.is_some() {
        sql.push_str(" AND check_in = ?");
    }
    if filter.search.is_some() {
        sql.push_str(" AND (id LIKE ? OR customer_name LIKE ? OR villa_name LIKE ?)");
    }
    sql.push_str(" ORDER BY created_at DESC");

    let mut query = sqlx::query_as::<_, Booking>(&sql);
    if let Some(status) = filter.status {
        query = query.bind(status.as_str());
    }
    if let Some(check_in) = &filter.check_in {
        query = query.bind(check_in);
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", search);
        query = query.bind(pattern.clone()).bind(pattern.clone()).bind(pattern);
    }

    let bookings = query.fetch_all(pool).await?;
    Ok(bookings)
}

/// Apply a lifecycle action to a booking.
///
/// For check-in/check-out, `time` is the actual HH:MM recorded into the
/// corresponding column; other actions ignore it.
pub async fn apply_action(
    pool: &SqlitePool,
    id: &str,
    action: BookingAction,
    time: Option<&str>,
) -> Result<Booking, BookingStoreError> {
    let mut tx = pool.begin().await?;

    let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(BookingStoreError::NotFound)?;

    let current = booking.status_enum()?;
    let next = current.apply(action)?;

    // The status guard makes the write conditional on what we just read;
    // a concurrent transition leaves rows_affected at zero.
    let result = match action {
        BookingAction::CheckIn => {
            sqlx::query("UPDATE bookings SET status = ?, actual_check_in = ? WHERE id = ? AND status = ?")
                .bind(next.as_str())
                .bind(time)
                .bind(id)
                .bind(current.as_str())
                .execute(&mut *tx)
                .await?
        }
        BookingAction::CheckOut => {
            sqlx::query("UPDATE bookings SET status = ?, actual_check_out = ? WHERE id = ? AND status = ?")
                .bind(next.as_str())
                .bind(time)
                .bind(id)
                .bind(current.as_str())
                .execute(&mut *tx)
                .await?
        }
        _ => {
            sqlx::query("UPDATE bookings SET status = ? WHERE id = ? AND status = ?")
                .bind(next.as_str())
                .bind(id)
                .bind(current.as_str())
                .execute(&mut *tx)
                .await?
        }
    };

    if result.rows_affected() == 0 {
        return Err(BookingStoreError::Conflict(id.to_string()));
    }

    let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(booking)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{test_pool, Villa};

    fn new_booking_for(villa: &Villa, email: &str) -> NewBooking {
        NewBooking {
            villa_id: villa.id.clone(),
            villa_name: villa.name.clone(),
            villa_image: villa.image_url.clone(),
            check_in: "2026-03-01".to_string(),
            check_out: "2026-03-03".to_string(),
            guests: 4,
            total_price: villa.price,
            customer_name: "Jane Tester".to_string(),
            customer_phone: Some("081-000-0000".to_string()),
            message: None,
            user_id: "user-1".to_string(),
            user_email: email.to_string(),
        }
    }

    async fn villa(pool: &SqlitePool, id: &str) -> Villa {
        sqlx::query_as::<_, Villa>("SELECT * FROM villas WHERE id = ?")
            .bind(id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_seed_produces_three_sample_bookings() {
        let pool = test_pool().await;

        let all = list_all(&pool, &BookingFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        for (id, status) in [
            ("BK-1001", "Confirmed"),
            ("BK-1002", "Pending"),
            ("BK-1003", "Cancelled"),
        ] {
            let booking = get(&pool, id).await.unwrap().unwrap();
            assert_eq!(booking.status, status);
            assert!(booking.actual_check_in.is_none());
            assert!(booking.actual_check_out.is_none());
        }
    }

    #[tokio::test]
    async fn test_create_snapshots_villa_and_starts_pending() {
        let pool = test_pool().await;
        let villa = villa(&pool, "1").await;

        let booking = create(&pool, &new_booking_for(&villa, "jane@example.com"))
            .await
            .unwrap();

        assert_eq!(booking.villa_name, "Mountain Breeze Villa");
        assert_eq!(booking.total_price, 8500);
        assert_eq!(booking.status, "Pending");
        assert!(booking.id.starts_with("BK-"));

        // Exactly one record was appended
        let all = list_all(&pool, &BookingFilter::default()).await.unwrap();
        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn test_created_ids_are_distinct() {
        let pool = test_pool().await;
        let villa = villa(&pool, "3").await;

        let a = create(&pool, &new_booking_for(&villa, "a@example.com")).await.unwrap();
        let b = create(&pool, &new_booking_for(&villa, "a@example.com")).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_list_by_user_matches_email_only() {
        let pool = test_pool().await;
        let villa = villa(&pool, "2").await;

        create(&pool, &new_booking_for(&villa, "jane@example.com")).await.unwrap();
        create(&pool, &new_booking_for(&villa, "jane@example.com")).await.unwrap();
        create(&pool, &new_booking_for(&villa, "other@example.com")).await.unwrap();

        let mine = list_by_user(&pool, "jane@example.com").await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|b| b.user_email == "jane@example.com"));

        assert!(list_by_user(&pool, "nobody@example.com").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_full_stay_walk_records_actual_times() {
        let pool = test_pool().await;

        let booking = apply_action(&pool, "BK-1002", BookingAction::Confirm, None)
            .await
            .unwrap();
        assert_eq!(booking.status, "Confirmed");

        let booking = apply_action(&pool, "BK-1002", BookingAction::CheckIn, Some("14:30"))
            .await
            .unwrap();
        assert_eq!(booking.status, "Checked-in");
        assert_eq!(booking.actual_check_in.as_deref(), Some("14:30"));

        let booking = apply_action(&pool, "BK-1002", BookingAction::CheckOut, Some("11:05"))
            .await
            .unwrap();
        assert_eq!(booking.status, "Checked-out");
        assert_eq!(booking.actual_check_in.as_deref(), Some("14:30"));
        assert_eq!(booking.actual_check_out.as_deref(), Some("11:05"));
    }

    #[tokio::test]
    async fn test_cancelled_is_terminal() {
        let pool = test_pool().await;

        let booking = apply_action(&pool, "BK-1001", BookingAction::Cancel, None)
            .await
            .unwrap();
        assert_eq!(booking.status, "Cancelled");

        for action in [
            BookingAction::Confirm,
            BookingAction::Cancel,
            BookingAction::CheckIn,
            BookingAction::CheckOut,
        ] {
            let err = apply_action(&pool, "BK-1001", action, None).await.unwrap_err();
            assert!(matches!(err, BookingStoreError::Transition(_)));
        }
    }

    #[tokio::test]
    async fn test_invalid_transition_leaves_record_untouched() {
        let pool = test_pool().await;

        // BK-1002 is Pending; check-in requires Confirmed
        let err = apply_action(&pool, "BK-1002", BookingAction::CheckIn, Some("14:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingStoreError::Transition(_)));

        let booking = get(&pool, "BK-1002").await.unwrap().unwrap();
        assert_eq!(booking.status, "Pending");
        assert!(booking.actual_check_in.is_none());
    }

    #[tokio::test]
    async fn test_apply_action_unknown_id() {
        let pool = test_pool().await;
        let err = apply_action(&pool, "BK-9999", BookingAction::Confirm, None)
            .await
            .unwrap_err();
        assert!(matches!(err, BookingStoreError::NotFound));
    }

    #[tokio::test]
    async fn test_list_all_filters() {
        let pool = test_pool().await;

        let pending = list_all(
            &pool,
            &BookingFilter {
                status: Some(BookingStatus::Pending),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "BK-1002");

        let by_date = list_all(
            &pool,
            &BookingFilter {
                check_in: Some("2026-02-01".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(by_date.len(), 1);
        assert_eq!(by_date[0].id, "BK-1003");

        let by_search = list_all(
            &pool,
            &BookingFilter {
                search: Some("Alice".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(by_search.len(), 1);
        assert_eq!(by_search[0].id, "BK-1002");

        let by_villa = list_all(
            &pool,
            &BookingFilter {
                search: Some("Romantic".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(by_villa.len(), 1);
        assert_eq!(by_villa[0].id, "BK-1003");
    }
}
