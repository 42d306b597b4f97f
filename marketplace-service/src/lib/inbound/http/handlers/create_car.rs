use axum::extract::Multipart;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::CarData;
use crate::car::errors::ImageUploadError;
use crate::car::models::CreateCarCommand;
use crate::car::models::ImageUpload;
use crate::domain::car::ports::CarServicePort;
use crate::domain::user::models::UserId;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn create_car(
    State(state): State<AppState>,
    Extension(current): Extension<AuthenticatedUser>,
    mut multipart: Multipart,
) -> Result<ApiSuccess<CarData>, ApiError> {
    let mut draft = CarDraft::default();
    let mut image: Option<ImageUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "image" {
            let content_type = field.content_type().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read image: {}", e)))?;
            // Content-type and size are checked before the blob store is touched
            image = Some(
                ImageUpload::new(bytes.to_vec(), content_type)
                    .map_err(ParseCreateCarError::Image)?,
            );
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read field: {}", e)))?;
            draft.set(&name, value)?;
        }
    }

    let command = draft.try_into_command(current.user_id)?;

    state
        .car_service
        .create_car(command, image)
        .await
        .map_err(ApiError::from)
        .map(|ref car| ApiSuccess::new(StatusCode::CREATED, car.into()))
}

/// Accumulates multipart text fields before validation.
#[derive(Debug, Default)]
struct CarDraft {
    brand: Option<String>,
    model: Option<String>,
    year: Option<String>,
    cm3: Option<String>,
    kw: Option<String>,
    price: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseCreateCarError {
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Field {0} is not a valid number")]
    NotANumber(&'static str),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid car data: {0}")]
    Validation(#[from] crate::car::errors::CarValidationError),

    #[error("Invalid image: {0}")]
    Image(#[from] ImageUploadError),
}

impl CarDraft {
    fn set(&mut self, name: &str, value: String) -> Result<(), ParseCreateCarError> {
        match name {
            "brand" => self.brand = Some(value),
            "model" => self.model = Some(value),
            "year" => self.year = Some(value),
            "cm3" => self.cm3 = Some(value),
            "kw" => self.kw = Some(value),
            "price" => self.price = Some(value),
            "description" => self.description = Some(value),
            other => return Err(ParseCreateCarError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    fn try_into_command(self, user_id: UserId) -> Result<CreateCarCommand, ParseCreateCarError> {
        let brand = self.brand.ok_or(ParseCreateCarError::MissingField("brand"))?;
        let model = self.model.ok_or(ParseCreateCarError::MissingField("model"))?;
        let year = parse_number(self.year, "year")?;
        let cm3 = parse_number(self.cm3, "cm3")?;
        let kw = parse_number(self.kw, "kw")?;
        let price: f64 = self
            .price
            .ok_or(ParseCreateCarError::MissingField("price"))?
            .parse()
            .map_err(|_| ParseCreateCarError::NotANumber("price"))?;

        Ok(CreateCarCommand::new(
            brand,
            model,
            year,
            cm3,
            kw,
            price,
            self.description,
            Some(user_id),
        )?)
    }
}

fn parse_number(
    value: Option<String>,
    name: &'static str,
) -> Result<i32, ParseCreateCarError> {
    value
        .ok_or(ParseCreateCarError::MissingField(name))?
        .parse()
        .map_err(|_| ParseCreateCarError::NotANumber(name))
}

impl From<ParseCreateCarError> for ApiError {
    fn from(err: ParseCreateCarError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_requires_all_declared_fields() {
        let mut draft = CarDraft::default();
        draft.set("brand", "BMW".to_string()).unwrap();
        draft.set("model", "X5".to_string()).unwrap();

        let result = draft.try_into_command(UserId::new());
        assert!(matches!(
            result,
            Err(ParseCreateCarError::MissingField("year"))
        ));
    }

    #[test]
    fn test_draft_rejects_unknown_field() {
        let mut draft = CarDraft::default();
        let result = draft.set("color", "red".to_string());
        assert!(matches!(result, Err(ParseCreateCarError::UnknownField(_))));
    }

    #[test]
    fn test_draft_rejects_non_numeric_year() {
        let mut draft = CarDraft::default();
        for (name, value) in [
            ("brand", "BMW"),
            ("model", "X5"),
            ("year", "twenty-twenty"),
            ("cm3", "3000"),
            ("kw", "250"),
            ("price", "100000"),
        ] {
            draft.set(name, value.to_string()).unwrap();
        }

        let result = draft.try_into_command(UserId::new());
        assert!(matches!(
            result,
            Err(ParseCreateCarError::NotANumber("year"))
        ));
    }

    #[test]
    fn test_draft_builds_validated_command() {
        let mut draft = CarDraft::default();
        for (name, value) in [
            ("brand", "BMW"),
            ("model", "X5"),
            ("year", "2021"),
            ("cm3", "3000"),
            ("kw", "250"),
            ("price", "100000"),
            ("description", "A luxury SUV with advanced features."),
        ] {
            draft.set(name, value.to_string()).unwrap();
        }

        let command = draft.try_into_command(UserId::new()).unwrap();
        assert_eq!(command.brand, "BMW");
        assert_eq!(command.year, 2021);
        assert!(command.user_id.is_some());
    }
}
