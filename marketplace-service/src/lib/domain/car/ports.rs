use async_trait::async_trait;

use crate::car::errors::CarError;
use crate::car::errors::NotifierError;
use crate::car::models::Car;
use crate::car::models::CarId;
use crate::car::models::ListingNotice;
use crate::car::models::UpdateCarCommand;
use crate::domain::pagination::PageRequest;
use crate::domain::pagination::PageResult;

use super::models::CreateCarCommand;
use super::models::ImageUpload;

/// Port for car domain service operations.
#[async_trait]
pub trait CarServicePort: Send + Sync + 'static {
    /// Create a new car listing, optionally uploading an image first.
    ///
    /// After the record is persisted the listing notifier is dispatched
    /// fire-and-forget; its outcome never affects this call's result.
    ///
    /// # Errors
    /// * `ImageStoreUnavailable` - Blob upload failed
    /// * `DatabaseError` - Database operation failed
    async fn create_car(
        &self,
        command: CreateCarCommand,
        image: Option<ImageUpload>,
    ) -> Result<Car, CarError>;

    /// List cars, paginated, in deterministic order (brand ascending, id as
    /// tiebreaker).
    ///
    /// The count and the windowed fetch are separate storage calls and are
    /// not transactional; metadata can briefly drift against the window
    /// under concurrent writes.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_cars(&self, request: PageRequest) -> Result<PageResult<Car>, CarError>;

    /// Retrieve a car by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - Car does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_car(&self, id: &CarId) -> Result<Car, CarError>;

    /// Partially update a car listing.
    ///
    /// An empty command returns the stored record unchanged.
    ///
    /// # Errors
    /// * `NotFound` - Car does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update_car(&self, id: &CarId, command: UpdateCarCommand) -> Result<Car, CarError>;

    /// Delete a car listing.
    ///
    /// # Errors
    /// * `NotFound` - Car does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete_car(&self, id: &CarId) -> Result<(), CarError>;
}

/// Persistence operations for the car collection.
#[async_trait]
pub trait CarRepository: Send + Sync + 'static {
    /// Persist a new car record.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, car: Car) -> Result<Car, CarError>;

    /// Retrieve a car by identifier.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &CarId) -> Result<Option<Car>, CarError>;

    /// Count all car records.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn count(&self) -> Result<u64, CarError>;

    /// Fetch a window of car records sorted ascending by brand, with id as
    /// the deterministic tiebreaker, skipping `offset` and returning at most
    /// `limit`.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_page(&self, offset: u64, limit: u64) -> Result<Vec<Car>, CarError>;

    /// Apply a partial update and return the updated record.
    ///
    /// # Returns
    /// None when the car does not exist
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn update(
        &self,
        id: &CarId,
        command: UpdateCarCommand,
    ) -> Result<Option<Car>, CarError>;

    /// Remove a car record.
    ///
    /// # Returns
    /// True when a record was deleted, false when none existed
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &CarId) -> Result<bool, CarError>;

    /// Persist language-model generated copy onto an existing record.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn set_generated_copy(
        &self,
        id: &CarId,
        description: String,
        pros: Vec<String>,
        cons: Vec<String>,
    ) -> Result<(), CarError>;
}

/// Blob-upload collaborator for listing images.
///
/// Content-type and size constraints are enforced by the caller (the
/// `ImageUpload` value object) before this port is invoked.
#[async_trait]
pub trait ImageStore: Send + Sync + 'static {
    /// Upload image bytes and return the public URL.
    ///
    /// # Errors
    /// * `ImageStoreUnavailable` - Upload failed
    async fn upload(&self, image: ImageUpload) -> Result<String, CarError>;
}

/// Out-of-band notification collaborator invoked after car persistence.
///
/// Contract is dispatch-and-forget: the implementation generates marketing
/// copy, persists it, and emails a notification; callers only log failures.
#[async_trait]
pub trait ListingNotifier: Send + Sync + 'static {
    async fn notify(&self, notice: ListingNotice) -> Result<(), NotifierError>;
}
