use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Map;

use crate::car::errors::CarError;
use crate::car::models::Car;
use crate::car::models::CarId;
use crate::car::models::CreateCarCommand;
use crate::car::models::ImageUpload;
use crate::car::models::ListingNotice;
use crate::car::models::UpdateCarCommand;
use crate::car::ports::CarRepository;
use crate::car::ports::CarServicePort;
use crate::car::ports::ImageStore;
use crate::car::ports::ListingNotifier;
use crate::domain::pagination::PageRequest;
use crate::domain::pagination::PageResult;
use crate::domain::pagination::PageWindow;

/// Domain service implementation for car-listing operations.
///
/// Owns the listing query protocol (count + windowed fetch assembled via
/// the pagination arithmetic) and the creation flow (image upload, persist,
/// fire-and-forget notification dispatch).
pub struct CarService<CR, IS, LN>
where
    CR: CarRepository,
    IS: ImageStore,
    LN: ListingNotifier,
{
    repository: Arc<CR>,
    image_store: Arc<IS>,
    notifier: Arc<LN>,
}

impl<CR, IS, LN> CarService<CR, IS, LN>
where
    CR: CarRepository,
    IS: ImageStore,
    LN: ListingNotifier,
{
    /// Create a new car service with injected dependencies.
    pub fn new(repository: Arc<CR>, image_store: Arc<IS>, notifier: Arc<LN>) -> Self {
        Self {
            repository,
            image_store,
            notifier,
        }
    }

    fn dispatch_notification(&self, car: &Car) {
        let notifier = Arc::clone(&self.notifier);
        let notice = ListingNotice::for_car(car);
        let car_id = car.id;

        // Out-of-band: the creating request has already succeeded by the
        // time this runs, so failures are logged and swallowed.
        tokio::spawn(async move {
            if let Err(e) = notifier.notify(notice).await {
                tracing::error!(car_id = %car_id, error = %e, "Listing notification failed");
            }
        });
    }
}

#[async_trait]
impl<CR, IS, LN> CarServicePort for CarService<CR, IS, LN>
where
    CR: CarRepository,
    IS: ImageStore,
    LN: ListingNotifier,
{
    async fn create_car(
        &self,
        command: CreateCarCommand,
        image: Option<ImageUpload>,
    ) -> Result<Car, CarError> {
        let image_url = match image {
            Some(image) => Some(self.image_store.upload(image).await?),
            None => None,
        };

        let car = Car {
            id: CarId::new(),
            brand: command.brand,
            model: command.model,
            year: command.year,
            cm3: command.cm3,
            kw: command.kw,
            price: command.price,
            description: command.description,
            image_url,
            pros: Vec::new(),
            cons: Vec::new(),
            created_at: Utc::now(),
            user_id: command.user_id,
            extra: Map::new(),
        };

        let created = self.repository.create(car).await?;

        self.dispatch_notification(&created);

        Ok(created)
    }

    async fn list_cars(&self, request: PageRequest) -> Result<PageResult<Car>, CarError> {
        let total_items = self.repository.count().await?;
        let window = PageWindow::compute(total_items, request);

        let items = if window.window_size == 0 {
            Vec::new()
        } else {
            self.repository
                .find_page(window.offset, window.window_size)
                .await?
        };

        Ok(PageResult::new(items, request, total_items))
    }

    async fn get_car(&self, id: &CarId) -> Result<Car, CarError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(CarError::NotFound(id.to_string()))
    }

    async fn update_car(&self, id: &CarId, command: UpdateCarCommand) -> Result<Car, CarError> {
        if command.is_empty() {
            // Nothing to change: return the stored record
            return self.get_car(id).await;
        }

        self.repository
            .update(id, command)
            .await?
            .ok_or(CarError::NotFound(id.to_string()))
    }

    async fn delete_car(&self, id: &CarId) -> Result<(), CarError> {
        if self.repository.delete(id).await? {
            Ok(())
        } else {
            Err(CarError::NotFound(id.to_string()))
        }
    }
}
