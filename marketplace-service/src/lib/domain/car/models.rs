use std::fmt;

use chrono::DateTime;
use chrono::Datelike;
use chrono::Utc;
use serde_json::Map;
use serde_json::Value;
use uuid::Uuid;

use crate::car::errors::CarIdError;
use crate::car::errors::CarValidationError;
use crate::car::errors::ImageUploadError;
use crate::domain::user::models::UserId;

const BRAND_MAX: usize = 50;
const MODEL_MAX: usize = 50;
const YEAR_MIN: i32 = 1900;
const POWER_MIN: i32 = 50;
const POWER_MAX: i32 = 1000;
const DESCRIPTION_MAX: usize = 500;

/// Car aggregate entity.
///
/// Declared fields are fixed; `extra` is an open-ended side-map for
/// unrecognized fields that were persisted alongside them. Records with
/// fields this version does not know about round-trip without loss.
#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    pub id: CarId,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub cm3: i32,
    pub kw: i32,
    pub price: f64,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub user_id: Option<UserId>,
    pub extra: Map<String, Value>,
}

/// Car unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CarId(pub Uuid);

impl CarId {
    /// Generate a new random car ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a car ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, CarIdError> {
        Uuid::parse_str(s)
            .map(CarId)
            .map_err(|e| CarIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for CarId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to create a new car listing with validated fields.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateCarCommand {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub cm3: i32,
    pub kw: i32,
    pub price: f64,
    pub description: Option<String>,
    pub user_id: Option<UserId>,
}

impl CreateCarCommand {
    /// Construct a validated creation command.
    ///
    /// # Errors
    /// * `BrandLength` / `ModelLength` - empty or over 50 characters
    /// * `YearOutOfRange` - before 1900 or after the current year
    /// * `InvalidDisplacement` - cm3 not positive
    /// * `PowerOutOfRange` - kW outside 50..=1000
    /// * `InvalidPrice` - price not positive
    /// * `DescriptionTooLong` - over 500 characters
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        brand: String,
        model: String,
        year: i32,
        cm3: i32,
        kw: i32,
        price: f64,
        description: Option<String>,
        user_id: Option<UserId>,
    ) -> Result<Self, CarValidationError> {
        // Length bounds are in characters, not bytes
        let brand_len = brand.chars().count();
        if brand_len == 0 || brand_len > BRAND_MAX {
            return Err(CarValidationError::BrandLength {
                max: BRAND_MAX,
                actual: brand_len,
            });
        }
        let model_len = model.chars().count();
        if model_len == 0 || model_len > MODEL_MAX {
            return Err(CarValidationError::ModelLength {
                max: MODEL_MAX,
                actual: model_len,
            });
        }
        let current_year = Utc::now().year();
        if year < YEAR_MIN || year > current_year {
            return Err(CarValidationError::YearOutOfRange {
                min: YEAR_MIN,
                max: current_year,
                actual: year,
            });
        }
        if cm3 <= 0 {
            return Err(CarValidationError::InvalidDisplacement(cm3));
        }
        if !(POWER_MIN..=POWER_MAX).contains(&kw) {
            return Err(CarValidationError::PowerOutOfRange {
                min: POWER_MIN,
                max: POWER_MAX,
                actual: kw,
            });
        }
        if price <= 0.0 {
            return Err(CarValidationError::InvalidPrice(price));
        }
        if let Some(ref description) = description {
            let description_len = description.chars().count();
            if description_len > DESCRIPTION_MAX {
                return Err(CarValidationError::DescriptionTooLong {
                    max: DESCRIPTION_MAX,
                    actual: description_len,
                });
            }
        }

        Ok(Self {
            brand,
            model,
            year,
            cm3,
            kw,
            price,
            description,
            user_id,
        })
    }
}

/// Command to update an existing car listing.
///
/// All fields are optional to support partial updates; only provided
/// fields change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateCarCommand {
    pub price: Option<f64>,
    pub description: Option<String>,
    pub pros: Option<Vec<String>>,
    pub cons: Option<Vec<String>>,
}

impl UpdateCarCommand {
    /// Validate the provided fields.
    ///
    /// # Errors
    /// * `InvalidPrice` - price not positive
    /// * `DescriptionTooLong` - over 500 characters
    pub fn validated(self) -> Result<Self, CarValidationError> {
        if let Some(price) = self.price {
            if price <= 0.0 {
                return Err(CarValidationError::InvalidPrice(price));
            }
        }
        if let Some(ref description) = self.description {
            let description_len = description.chars().count();
            if description_len > DESCRIPTION_MAX {
                return Err(CarValidationError::DescriptionTooLong {
                    max: DESCRIPTION_MAX,
                    actual: description_len,
                });
            }
        }
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.price.is_none()
            && self.description.is_none()
            && self.pros.is_none()
            && self.cons.is_none()
    }
}

/// Validated image upload.
///
/// Enforces the blob-store constraints (content type and size) before the
/// upload collaborator is ever invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    bytes: Vec<u8>,
    content_type: String,
}

impl ImageUpload {
    const MAX_BYTES: usize = 5 * 1024 * 1024;
    const ALLOWED_TYPES: [&'static str; 2] = ["image/jpeg", "image/png"];

    /// Create a validated image upload.
    ///
    /// # Errors
    /// * `UnsupportedContentType` - not image/jpeg or image/png
    /// * `TooLarge` - over 5 MiB
    pub fn new(bytes: Vec<u8>, content_type: String) -> Result<Self, ImageUploadError> {
        if !Self::ALLOWED_TYPES.contains(&content_type.as_str()) {
            return Err(ImageUploadError::UnsupportedContentType(content_type));
        }
        if bytes.len() > Self::MAX_BYTES {
            return Err(ImageUploadError::TooLarge {
                max: Self::MAX_BYTES,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            bytes,
            content_type,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}

/// Payload handed to the listing notifier after a car is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingNotice {
    pub car_id: CarId,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub image_url: Option<String>,
}

impl ListingNotice {
    pub fn for_car(car: &Car) -> Self {
        Self {
            car_id: car.id,
            brand: car.brand.clone(),
            model: car.model.clone(),
            year: car.year,
            image_url: car.image_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(year: i32, cm3: i32, kw: i32, price: f64) -> Result<CreateCarCommand, CarValidationError> {
        CreateCarCommand::new(
            "BMW".to_string(),
            "X5".to_string(),
            year,
            cm3,
            kw,
            price,
            None,
            None,
        )
    }

    #[test]
    fn test_create_command_accepts_valid_fields() {
        assert!(command(2021, 3000, 250, 100_000.0).is_ok());
    }

    #[test]
    fn test_create_command_rejects_bad_year() {
        assert!(matches!(
            command(1899, 3000, 250, 1.0),
            Err(CarValidationError::YearOutOfRange { .. })
        ));
        let next_year = Utc::now().year() + 1;
        assert!(command(next_year, 3000, 250, 1.0).is_err());
    }

    #[test]
    fn test_create_command_rejects_bad_engine() {
        assert!(matches!(
            command(2020, 0, 250, 1.0),
            Err(CarValidationError::InvalidDisplacement(0))
        ));
        assert!(matches!(
            command(2020, 3000, 49, 1.0),
            Err(CarValidationError::PowerOutOfRange { .. })
        ));
        assert!(matches!(
            command(2020, 3000, 1001, 1.0),
            Err(CarValidationError::PowerOutOfRange { .. })
        ));
    }

    #[test]
    fn test_create_command_rejects_bad_price() {
        assert!(matches!(
            command(2020, 3000, 250, 0.0),
            Err(CarValidationError::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_create_command_rejects_empty_brand() {
        let result = CreateCarCommand::new(
            String::new(),
            "X5".to_string(),
            2020,
            3000,
            250,
            1.0,
            None,
            None,
        );
        assert!(matches!(
            result,
            Err(CarValidationError::BrandLength { .. })
        ));
    }

    #[test]
    fn test_length_bounds_count_characters_not_bytes() {
        // 5 characters, 6 bytes
        let command = CreateCarCommand::new(
            "Škoda".to_string(),
            "Octavia".to_string(),
            2020,
            2000,
            140,
            30_000.0,
            // 500 characters, 1000 bytes
            Some("é".repeat(500)),
            None,
        );
        assert!(command.is_ok());

        let over = UpdateCarCommand {
            description: Some("é".repeat(501)),
            ..Default::default()
        };
        assert!(over.validated().is_err());
    }

    #[test]
    fn test_update_command_validation() {
        let ok = UpdateCarCommand {
            price: Some(95_000.0),
            description: Some("A slightly used luxury SUV.".to_string()),
            pros: None,
            cons: None,
        };
        assert!(ok.validated().is_ok());

        let bad_price = UpdateCarCommand {
            price: Some(-1.0),
            ..Default::default()
        };
        assert!(bad_price.validated().is_err());

        let long_description = UpdateCarCommand {
            description: Some("x".repeat(501)),
            ..Default::default()
        };
        assert!(long_description.validated().is_err());
    }

    #[test]
    fn test_image_upload_constraints() {
        assert!(ImageUpload::new(vec![0u8; 16], "image/jpeg".to_string()).is_ok());
        assert!(ImageUpload::new(vec![0u8; 16], "image/png".to_string()).is_ok());

        assert!(matches!(
            ImageUpload::new(vec![0u8; 16], "image/gif".to_string()),
            Err(ImageUploadError::UnsupportedContentType(_))
        ));
        assert!(matches!(
            ImageUpload::new(vec![0u8; 5 * 1024 * 1024 + 1], "image/png".to_string()),
            Err(ImageUploadError::TooLarge { .. })
        ));
    }
}
