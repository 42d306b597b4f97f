use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use serde_json::Map;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::car::errors::CarError;
use crate::car::models::Car;
use crate::car::models::CarId;
use crate::car::models::UpdateCarCommand;
use crate::car::ports::CarRepository;
use crate::domain::user::models::UserId;

const CAR_COLUMNS: &str =
    "id, brand, model, year, cm3, kw, price, description, image_url, pros, cons, \
     created_at, user_id, extra";

pub struct PostgresCarRepository {
    pool: PgPool,
}

impl PostgresCarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(e: sqlx::Error) -> CarError {
    CarError::DatabaseError(e.to_string())
}

fn string_list(value: Value) -> Vec<String> {
    serde_json::from_value(value).unwrap_or_default()
}

fn row_to_car(row: &PgRow) -> Result<Car, CarError> {
    let id: Uuid = row.try_get("id").map_err(db_err)?;
    let brand: String = row.try_get("brand").map_err(db_err)?;
    let model: String = row.try_get("model").map_err(db_err)?;
    let year: i32 = row.try_get("year").map_err(db_err)?;
    let cm3: i32 = row.try_get("cm3").map_err(db_err)?;
    let kw: i32 = row.try_get("kw").map_err(db_err)?;
    let price: f64 = row.try_get("price").map_err(db_err)?;
    let description: Option<String> = row.try_get("description").map_err(db_err)?;
    let image_url: Option<String> = row.try_get("image_url").map_err(db_err)?;
    let pros: Value = row.try_get("pros").map_err(db_err)?;
    let cons: Value = row.try_get("cons").map_err(db_err)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(db_err)?;
    let user_id: Option<Uuid> = row.try_get("user_id").map_err(db_err)?;
    let extra: Value = row.try_get("extra").map_err(db_err)?;

    Ok(Car {
        id: CarId(id),
        brand,
        model,
        year,
        cm3,
        kw,
        price,
        description,
        image_url,
        pros: string_list(pros),
        cons: string_list(cons),
        created_at,
        user_id: user_id.map(UserId),
        extra: extra.as_object().cloned().unwrap_or_else(Map::new),
    })
}

#[async_trait]
impl CarRepository for PostgresCarRepository {
    async fn create(&self, car: Car) -> Result<Car, CarError> {
        sqlx::query(
            r#"
            INSERT INTO cars
                (id, brand, model, year, cm3, kw, price, description, image_url,
                 pros, cons, created_at, user_id, extra)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(car.id.0)
        .bind(&car.brand)
        .bind(&car.model)
        .bind(car.year)
        .bind(car.cm3)
        .bind(car.kw)
        .bind(car.price)
        .bind(&car.description)
        .bind(&car.image_url)
        .bind(Value::from(car.pros.clone()))
        .bind(Value::from(car.cons.clone()))
        .bind(car.created_at)
        .bind(car.user_id.map(|id| id.0))
        .bind(Value::Object(car.extra.clone()))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(car)
    }

    async fn find_by_id(&self, id: &CarId) -> Result<Option<Car>, CarError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM cars WHERE id = $1",
            CAR_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(row_to_car).transpose()
    }

    async fn count(&self) -> Result<u64, CarError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM cars")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;

        let total: i64 = row.try_get("total").map_err(db_err)?;
        Ok(total as u64)
    }

    async fn find_page(&self, offset: u64, limit: u64) -> Result<Vec<Car>, CarError> {
        // Brand ascending with id as tiebreaker keeps pagination stable
        // across pages when brands tie
        let rows = sqlx::query(&format!(
            "SELECT {} FROM cars ORDER BY brand ASC, id ASC OFFSET $1 LIMIT $2",
            CAR_COLUMNS
        ))
        // Postgres binds are i64; clamp so a saturated offset cannot wrap
        // into a negative bind
        .bind(offset.min(i64::MAX as u64) as i64)
        .bind(limit.min(i64::MAX as u64) as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(row_to_car).collect()
    }

    async fn update(
        &self,
        id: &CarId,
        command: UpdateCarCommand,
    ) -> Result<Option<Car>, CarError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE cars
            SET price = COALESCE($2, price),
                description = COALESCE($3, description),
                pros = COALESCE($4, pros),
                cons = COALESCE($5, cons)
            WHERE id = $1
            RETURNING {}
            "#,
            CAR_COLUMNS
        ))
        .bind(id.0)
        .bind(command.price)
        .bind(command.description)
        .bind(command.pros.map(Value::from))
        .bind(command.cons.map(Value::from))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(row_to_car).transpose()
    }

    async fn delete(&self, id: &CarId) -> Result<bool, CarError> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_generated_copy(
        &self,
        id: &CarId,
        description: String,
        pros: Vec<String>,
        cons: Vec<String>,
    ) -> Result<(), CarError> {
        sqlx::query(
            r#"
            UPDATE cars
            SET description = $2, pros = $3, cons = $4
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(description)
        .bind(Value::from(pros))
        .bind(Value::from(cons))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }
}
