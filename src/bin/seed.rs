use clap::Parser;
use rust_decimal::Decimal;
use sqlx::sqlite::SqlitePoolOptions;
use chrono::{Duration, Utc};
use uuid::Uuid;

use staybook::{
    domain::{
        CreateListingRequest, CreateBookingRequest, CreateReviewRequest,
        BookingStatus, UpdateBookingRequest,
    },
    repository::{
        ListingRepository, SqliteListingRepository,
        BookingRepository, SqliteBookingRepository,
        ReviewRepository, SqliteReviewRepository,
    },
};

/// Populate a database with demo listings, bookings and reviews.
#[derive(Parser, Debug)]
struct Args {
    /// SQLite connection string
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://staybook.db?mode=rwc")]
    database_url: String,
}

const LISTINGS: &[(&str, &str, &str, i64)] = &[
    ("Bole Garden Apartment", "Two bedrooms near the airport with a quiet garden.", "Addis Ababa", 350000),
    ("Lakeside Cabin", "Wooden cabin on the shore of Lake Tana.", "Bahir Dar", 220000),
    ("Old Town Guesthouse", "Rooms inside the walls of the old city.", "Harar", 150000),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    println!("Seeding {}", args.database_url);

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&args.database_url)
        .await?;

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    let listing_repo = SqliteListingRepository::new(db_pool.clone());
    let booking_repo = SqliteBookingRepository::new(db_pool.clone());
    let review_repo = SqliteReviewRepository::new(db_pool.clone());

    let host_id = Uuid::new_v4();
    let guest_id = Uuid::new_v4();
    let today = Utc::now().date_naive();

    for (i, (name, description, location, price_cents)) in LISTINGS.iter().enumerate() {
        let price = Decimal::new(*price_cents, 2);
        let listing = listing_repo.create(CreateListingRequest {
            name: name.to_string(),
            description: description.to_string(),
            location: location.to_string(),
            price_per_night: price,
            host_id,
        }).await?;

        let nights = 2 + i as i64;
        let start = today + Duration::days(7 * (i as i64 + 1));
        let booking = booking_repo.create(CreateBookingRequest {
            listing_id: listing.id,
            guest_id,
            start_date: start,
            end_date: start + Duration::days(nights),
            total_price: price * Decimal::from(nights),
        }).await?;

        if i == 0 {
            booking_repo.update(booking.id, UpdateBookingRequest {
                status: Some(BookingStatus::Confirmed),
                ..Default::default()
            }).await?;
        }

        review_repo.create(CreateReviewRequest {
            listing_id: listing.id,
            user_id: guest_id,
            rating: 5 - i as i32,
            comment: format!("Stayed {} nights at {}.", nights, name),
        }).await?;

        println!("  created {} ({}) with booking {}", listing.name, listing.location, booking.id);
    }

    println!("Done.");
    Ok(())
}
