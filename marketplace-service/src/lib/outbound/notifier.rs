use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::car::errors::NotifierError;
use crate::car::models::ListingNotice;
use crate::car::ports::CarRepository;
use crate::car::ports::ListingNotifier;
use crate::config::NotifierConfig;

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const RESEND_URL: &str = "https://api.resend.com/emails";

/// Post-persistence notification pipeline.
///
/// Asks the language model for marketing copy, persists it onto the car
/// record, and emails a listing announcement. Runs out-of-band after the
/// creating request has returned; every failure here is terminal for the
/// task only, never for the request.
pub struct HttpListingNotifier {
    client: reqwest::Client,
    openai_api_key: String,
    resend_api_key: String,
    sender: String,
    recipient: String,
    repository: Arc<dyn CarRepository>,
}

/// Copy the language model is asked to produce, as JSON.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
struct GeneratedCopy {
    description: String,
    pros: Vec<String>,
    cons: Vec<String>,
}

impl GeneratedCopy {
    fn validate(self) -> Result<Self, NotifierError> {
        if self.description.is_empty() || self.pros.is_empty() || self.cons.is_empty() {
            return Err(NotifierError::MalformedCopy(
                "description, pros, and cons must all be non-empty".to_string(),
            ));
        }
        Ok(self)
    }
}

impl HttpListingNotifier {
    pub fn new(config: &NotifierConfig, repository: Arc<dyn CarRepository>) -> Self {
        Self {
            client: reqwest::Client::new(),
            openai_api_key: config.openai_api_key.clone(),
            resend_api_key: config.resend_api_key.clone(),
            sender: config.sender.clone(),
            recipient: config.recipient.clone(),
            repository,
        }
    }

    async fn generate_copy(&self, notice: &ListingNotice) -> Result<GeneratedCopy, NotifierError> {
        let prompt = copy_prompt(&notice.brand, &notice.model, notice.year);

        let response = self
            .client
            .post(OPENAI_URL)
            .bearer_auth(&self.openai_api_key)
            .json(&json!({
                "model": "gpt-4",
                "messages": [{"role": "user", "content": prompt}],
                "max_tokens": 500,
                "temperature": 0.2,
            }))
            .send()
            .await
            .map_err(|e| NotifierError::GenerationFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifierError::GenerationFailed(format!(
                "Language model returned status {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| NotifierError::GenerationFailed(e.to_string()))?;

        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                NotifierError::MalformedCopy("Response carries no message content".to_string())
            })?;

        let copy: GeneratedCopy = serde_json::from_str(content)
            .map_err(|e| NotifierError::MalformedCopy(e.to_string()))?;
        copy.validate()
    }

    async fn send_email(
        &self,
        notice: &ListingNotice,
        copy: &GeneratedCopy,
    ) -> Result<(), NotifierError> {
        let html = listing_email(notice, copy);

        let response = self
            .client
            .post(RESEND_URL)
            .bearer_auth(&self.resend_api_key)
            .json(&json!({
                "from": self.sender,
                "to": [self.recipient],
                "subject": "New Car On Sale!",
                "html": html,
            }))
            .send()
            .await
            .map_err(|e| NotifierError::EmailFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifierError::EmailFailed(format!(
                "Email service returned status {}",
                response.status()
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl ListingNotifier for HttpListingNotifier {
    async fn notify(&self, notice: ListingNotice) -> Result<(), NotifierError> {
        let copy = self.generate_copy(&notice).await?;
        tracing::info!(
            car_id = %notice.car_id,
            brand = %notice.brand,
            model = %notice.model,
            "Generated listing copy"
        );

        self.repository
            .set_generated_copy(
                &notice.car_id,
                copy.description.clone(),
                copy.pros.clone(),
                copy.cons.clone(),
            )
            .await
            .map_err(|e| NotifierError::PersistFailed(e.to_string()))?;

        self.send_email(&notice, &copy).await?;
        tracing::info!(car_id = %notice.car_id, recipient = %self.recipient, "Listing email sent");

        Ok(())
    }
}

fn copy_prompt(brand: &str, model: &str, year: i32) -> String {
    format!(
        r#"You are a helpful car sales assistant. Your task is to describe the {brand} {model} from {year} in a playful and engaging way.
Additionally, provide five pros and five cons of the model. Ensure the cons are not overly negative but still honest.

Respond in the following JSON format:
{{
    "description": "A playful and positive description of the {brand} {model}. Make it at least 350 characters long.",
    "pros": ["five short and concise pros (max 12 words each)"],
    "cons": ["five short and concise cons (max 12 words each)"]
}}

Guidelines:
- The *description* should be playful, positive, and engaging. Avoid being over the top.
- The *pros* should sound very positive and highlight the car's strengths.
- The *cons* should be honest but not too negative. Use a slightly negative tone.
- Keep all points concise and within the word limit."#
    )
}

fn listing_email(notice: &ListingNotice, copy: &GeneratedCopy) -> String {
    let image = notice
        .image_url
        .as_deref()
        .map(|url| {
            format!(
                r#"<p><img src="{}" alt="{} {}" style="max-width: 100%; height: auto;"/></p>"#,
                url, notice.brand, notice.model
            )
        })
        .unwrap_or_default();

    let pros_list = copy
        .pros
        .iter()
        .map(|pro| format!("- {}", pro))
        .collect::<Vec<_>>()
        .join("<br>");
    let cons_list = copy
        .cons
        .iter()
        .map(|con| format!("- {}", con))
        .collect::<Vec<_>>()
        .join("<br>");

    format!(
        r#"<html>
    <body>
        <h2>Hello,</h2>
        <p>We have a new car for you: {brand} {model} from {year}.</p>
        {image}
        <p>{description}</p>
        <h3>Pros</h3>
        <p>{pros_list}</p>
        <h3>Cons</h3>
        <p>{cons_list}</p>
    </body>
</html>"#,
        brand = notice.brand,
        model = notice.model,
        year = notice.year,
        image = image,
        description = copy.description,
        pros_list = pros_list,
        cons_list = cons_list,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::car::errors::CarError;
    use crate::car::models::Car;
    use crate::car::models::CarId;
    use crate::car::models::UpdateCarCommand;

    struct StubRepository;

    #[async_trait]
    impl CarRepository for StubRepository {
        async fn create(&self, car: Car) -> Result<Car, CarError> {
            Ok(car)
        }

        async fn find_by_id(&self, _id: &CarId) -> Result<Option<Car>, CarError> {
            Ok(None)
        }

        async fn count(&self) -> Result<u64, CarError> {
            Ok(0)
        }

        async fn find_page(&self, _offset: u64, _limit: u64) -> Result<Vec<Car>, CarError> {
            Ok(Vec::new())
        }

        async fn update(
            &self,
            _id: &CarId,
            _command: UpdateCarCommand,
        ) -> Result<Option<Car>, CarError> {
            Ok(None)
        }

        async fn delete(&self, _id: &CarId) -> Result<bool, CarError> {
            Ok(false)
        }

        async fn set_generated_copy(
            &self,
            _id: &CarId,
            _description: String,
            _pros: Vec<String>,
            _cons: Vec<String>,
        ) -> Result<(), CarError> {
            Ok(())
        }
    }

    fn notice() -> ListingNotice {
        ListingNotice {
            car_id: CarId::new(),
            brand: "BMW".to_string(),
            model: "X5".to_string(),
            year: 2021,
            image_url: Some("https://example.com/bmw-x5.jpg".to_string()),
        }
    }

    fn copy() -> GeneratedCopy {
        GeneratedCopy {
            description: "A luxury SUV with advanced features.".to_string(),
            pros: vec!["Comfortable".to_string(), "High performance".to_string()],
            cons: vec!["Expensive".to_string()],
        }
    }

    #[test]
    fn test_construction_from_concrete_repository() {
        let config = NotifierConfig {
            openai_api_key: "sk-test".to_string(),
            resend_api_key: "re-test".to_string(),
            sender: "Marketplace <onboarding@resend.dev>".to_string(),
            recipient: "sales@example.com".to_string(),
        };

        // The repository arrives as a concrete Arc and is coerced to the
        // trait object the notifier holds
        let repository: Arc<dyn CarRepository> = Arc::new(StubRepository);
        let notifier = HttpListingNotifier::new(&config, repository);
        assert_eq!(notifier.recipient, "sales@example.com");
    }

    #[test]
    fn test_prompt_names_the_car() {
        let prompt = copy_prompt("BMW", "X5", 2021);
        assert!(prompt.contains("BMW X5 from 2021"));
        assert!(prompt.contains("\"pros\""));
        assert!(prompt.contains("\"cons\""));
    }

    #[test]
    fn test_email_renders_copy_and_image() {
        let html = listing_email(&notice(), &copy());
        assert!(html.contains("BMW X5 from 2021"));
        assert!(html.contains("https://example.com/bmw-x5.jpg"));
        assert!(html.contains("- Comfortable<br>- High performance"));
        assert!(html.contains("- Expensive"));
    }

    #[test]
    fn test_email_without_image_omits_tag() {
        let mut notice = notice();
        notice.image_url = None;
        let html = listing_email(&notice, &copy());
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_generated_copy_rejects_empty_sections() {
        let empty_pros = GeneratedCopy {
            pros: Vec::new(),
            ..copy()
        };
        assert!(empty_pros.validate().is_err());
        assert!(copy().validate().is_ok());
    }

    #[test]
    fn test_generated_copy_parses_model_output() {
        let content = r#"{
            "description": "A reliable and fuel-efficient sedan.",
            "pros": ["Reliable", "Fuel-efficient"],
            "cons": ["Basic features"]
        }"#;
        let parsed: GeneratedCopy = serde_json::from_str(content).unwrap();
        assert_eq!(parsed.pros.len(), 2);
    }
}
