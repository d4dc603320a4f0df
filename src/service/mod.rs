pub mod payment_service;

use std::sync::Arc;
use sqlx::SqlitePool;
use crate::payments::PaymentGateway;
use crate::repository::*;
use payment_service::PaymentService;

pub use payment_service::{InitiatePayment, InitiatedPayment};

pub struct ServiceContext {
    pub listing_repo: Arc<dyn ListingRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub review_repo: Arc<dyn ReviewRepository>,
    pub payment_service: Arc<PaymentService>,
}

impl ServiceContext {
    pub fn new(db_pool: SqlitePool, gateway: Arc<dyn PaymentGateway>) -> Self {
        let listing_repo = Arc::new(SqliteListingRepository::new(db_pool.clone()));
        let booking_repo = Arc::new(SqliteBookingRepository::new(db_pool.clone()));
        let review_repo = Arc::new(SqliteReviewRepository::new(db_pool.clone()));
        let payment_repo: Arc<dyn PaymentRepository> =
            Arc::new(SqlitePaymentRepository::new(db_pool));

        let payment_service = Arc::new(PaymentService::new(payment_repo, gateway));

        Self {
            listing_repo,
            booking_repo,
            review_repo,
            payment_service,
        }
    }
}
