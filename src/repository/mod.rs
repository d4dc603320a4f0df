use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::*;
use crate::error::Result;

pub mod listing_repository;
pub mod booking_repository;
pub mod review_repository;
pub mod payment_repository;

pub use listing_repository::SqliteListingRepository;
pub use booking_repository::SqliteBookingRepository;
pub use review_repository::SqliteReviewRepository;
pub use payment_repository::SqlitePaymentRepository;

#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn create(&self, listing: CreateListingRequest) -> Result<Listing>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>>;
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Listing>>;
    async fn update(&self, id: Uuid, update: UpdateListingRequest) -> Result<Listing>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: CreateBookingRequest) -> Result<Booking>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>>;
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Booking>>;
    async fn update(&self, id: Uuid, update: UpdateBookingRequest) -> Result<Booking>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn create(&self, review: CreateReviewRequest) -> Result<Review>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>>;
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Review>>;
    async fn update(&self, id: Uuid, update: UpdateReviewRequest) -> Result<Review>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// Durable store for payment attempts, keyed by transaction id.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create(&self, payment: Payment) -> Result<Payment>;
    async fn find_by_transaction_id(&self, transaction_id: &str) -> Result<Option<Payment>>;
    async fn update_status(&self, transaction_id: &str, status: PaymentStatus) -> Result<Payment>;
}
