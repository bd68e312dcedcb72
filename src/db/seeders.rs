//! Database seeders for built-in data
//!
//! Seeds the villa catalog and a handful of sample bookings on first
//! startup. Both seeders use INSERT OR IGNORE so user and staff edits
//! are never clobbered by a restart.

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

/// Seed the villa catalog.
pub async fn seed_villas(pool: &SqlitePool) -> Result<()> {
    info!("Seeding villa catalog...");

    // Format: (id, name, price, guests, bedrooms, bathrooms, size_sqm, image, description, features, images)
    let villas: Vec<(&str, &str, i64, i64, i64, i64, i64, &str, &str, &str, &str)> = vec![
        (
            "1",
            "Mountain Breeze Villa",
            8500,
            8,
            3,
            3,
            250,
            "/images/villa-1.png",
            "A stunning modern villa with panoramic mountain views, featuring a private infinity pool and spacious outdoor terrace for the ultimate relaxation. Perfect for families or groups of friends seeking a peaceful escape.",
            r#"["Private Infinity Pool","Mountain View","BBQ Grill","Free Wi-Fi","Smart TV","Fully Equipped Kitchen","Parking"]"#,
            r#"["/images/villa-1.png","/images/villa-2.png","/images/villa-3.png"]"#,
        ),
        (
            "2",
            "Forest Hideaway",
            12000,
            12,
            5,
            4,
            400,
            "/images/villa-2.png",
            "Surrounded by lush tropical gardens, this expansive villa offers complete privacy, a large family pool, and luxurious amenities for large groups. Experience nature without compromising on comfort.",
            r#"["Large Private Pool","Garden View","Karaoke System","Outdoor Dining Area","Daily Housekeeping","Welcome Drink"]"#,
            r#"["/images/villa-2.png","/images/villa-1.png","/images/villa-3.png"]"#,
        ),
        (
            "3",
            "Romantic Pool Suite",
            5500,
            2,
            1,
            1,
            120,
            "/images/villa-3.png",
            "The perfect getaway for couples. Intimate, cozy, and stylish with a private plunge pool and romantic sunset views over the valley. Create unforgettable memories in this hidden gem.",
            r#"["Private Plunge Pool","Sunset View","King Size Bed","Bathtub","Mini Bar","Room Service"]"#,
            r#"["/images/villa-3.png","/images/villa-1.png","/images/villa-2.png"]"#,
        ),
    ];

    for (id, name, price, guests, bedrooms, bathrooms, size_sqm, image_url, description, features, images) in villas {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO villas
                (id, name, price, guests, bedrooms, bathrooms, size_sqm, image_url, description, features, images)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(price)
        .bind(guests)
        .bind(bedrooms)
        .bind(bathrooms)
        .bind(size_sqm)
        .bind(image_url)
        .bind(description)
        .bind(features)
        .bind(images)
        .execute(pool)
        .await?;
    }

    Ok(())
}

/// Seed the sample bookings shown to a fresh back office.
pub async fn seed_sample_bookings(pool: &SqlitePool) -> Result<()> {
    info!("Seeding sample bookings...");

    // Format: (id, villa_id, villa_name, villa_image, check_in, check_out, guests,
    //          total_price, status, customer, phone, email, created_at)
    let samples: Vec<(&str, &str, &str, &str, &str, &str, i64, i64, &str, &str, &str, &str, &str)> = vec![
        (
            "BK-1001",
            "1",
            "Mountain Breeze Villa",
            "/images/villa-1.png",
            "2026-01-20",
            "2026-01-22",
            4,
            17000,
            "Confirmed",
            "John Doe",
            "081-234-5678",
            "john@example.com",
            "2026-01-10",
        ),
        (
            "BK-1002",
            "2",
            "Forest Hideaway",
            "/images/villa-2.png",
            "2026-01-25",
            "2026-01-28",
            6,
            36000,
            "Pending",
            "Alice Smith",
            "082-345-6789",
            "alice@example.com",
            "2026-01-12",
        ),
        (
            "BK-1003",
            "3",
            "Romantic Pool Suite",
            "/images/villa-3.png",
            "2026-02-01",
            "2026-02-03",
            2,
            11000,
            "Cancelled",
            "Bob Wilson",
            "083-456-7890",
            "bob@example.com",
            "2026-01-14",
        ),
    ];

    for (id, villa_id, villa_name, villa_image, check_in, check_out, guests, total_price, status, customer, phone, email, created_at) in samples {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO bookings
                (id, villa_id, villa_name, villa_image, check_in, check_out, guests,
                 total_price, status, customer_name, customer_phone, user_email, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(villa_id)
        .bind(villa_name)
        .bind(villa_image)
        .bind(check_in)
        .bind(check_out)
        .bind(guests)
        .bind(total_price)
        .bind(status)
        .bind(customer)
        .bind(phone)
        .bind(email)
        .bind(created_at)
        .execute(pool)
        .await?;
    }

    Ok(())
}
