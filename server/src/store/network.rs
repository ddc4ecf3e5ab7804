use sqlx::PgPool;

use crate::models::network::{
    RoutePayload, RouteStop, ScheduleEntry, SchedulePayload, Stop, StopPayload, TransitRoute,
};

/// Routes, stops, stop sequences and schedules.
#[derive(Clone)]
pub struct NetworkStore {
    pool: PgPool,
}

impl NetworkStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_routes(&self) -> Result<Vec<TransitRoute>, sqlx::Error> {
        sqlx::query_as::<_, TransitRoute>(
            "SELECT id, code, name, active FROM transit_routes ORDER BY code",
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn find_route(&self, id: i64) -> Result<Option<TransitRoute>, sqlx::Error> {
        sqlx::query_as::<_, TransitRoute>(
            "SELECT id, code, name, active FROM transit_routes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn create_route(&self, payload: &RoutePayload) -> Result<TransitRoute, sqlx::Error> {
        sqlx::query_as::<_, TransitRoute>(
            "INSERT INTO transit_routes (code, name, active) VALUES ($1, $2, $3) \
             RETURNING id, code, name, active",
        )
        .bind(payload.code.trim())
        .bind(payload.name.trim())
        .bind(payload.active)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn update_route(
        &self,
        id: i64,
        payload: &RoutePayload,
    ) -> Result<Option<TransitRoute>, sqlx::Error> {
        sqlx::query_as::<_, TransitRoute>(
            "UPDATE transit_routes SET code = $2, name = $3, active = $4 WHERE id = $1 \
             RETURNING id, code, name, active",
        )
        .bind(id)
        .bind(payload.code.trim())
        .bind(payload.name.trim())
        .bind(payload.active)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn delete_route(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM transit_routes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_stops(&self) -> Result<Vec<Stop>, sqlx::Error> {
        sqlx::query_as::<_, Stop>("SELECT id, name, latitude, longitude FROM stops ORDER BY name")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn create_stop(&self, payload: &StopPayload) -> Result<Stop, sqlx::Error> {
        sqlx::query_as::<_, Stop>(
            "INSERT INTO stops (name, latitude, longitude) VALUES ($1, $2, $3) \
             RETURNING id, name, latitude, longitude",
        )
        .bind(payload.name.trim())
        .bind(payload.latitude)
        .bind(payload.longitude)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn update_stop(
        &self,
        id: i64,
        payload: &StopPayload,
    ) -> Result<Option<Stop>, sqlx::Error> {
        sqlx::query_as::<_, Stop>(
            "UPDATE stops SET name = $2, latitude = $3, longitude = $4 WHERE id = $1 \
             RETURNING id, name, latitude, longitude",
        )
        .bind(id)
        .bind(payload.name.trim())
        .bind(payload.latitude)
        .bind(payload.longitude)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn delete_stop(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM stops WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn route_stops(&self, route_id: i64) -> Result<Vec<RouteStop>, sqlx::Error> {
        sqlx::query_as::<_, RouteStop>(
            "SELECT rs.position, rs.stop_id, s.name, s.latitude, s.longitude \
             FROM route_stops rs JOIN stops s ON s.id = rs.stop_id \
             WHERE rs.route_id = $1 ORDER BY rs.position",
        )
        .bind(route_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Replaces the whole stop sequence of a route in one transaction.
    pub async fn replace_route_stops(
        &self,
        route_id: i64,
        stop_ids: &[i64],
    ) -> Result<Vec<RouteStop>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM route_stops WHERE route_id = $1")
            .bind(route_id)
            .execute(&mut *tx)
            .await?;

        for (index, stop_id) in stop_ids.iter().enumerate() {
            let position = i32::try_from(index + 1)
                .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
            sqlx::query("INSERT INTO route_stops (route_id, stop_id, position) VALUES ($1, $2, $3)")
                .bind(route_id)
                .bind(stop_id)
                .bind(position)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        self.route_stops(route_id).await
    }

    pub async fn list_schedules(&self, route_id: i64) -> Result<Vec<ScheduleEntry>, sqlx::Error> {
        sqlx::query_as::<_, ScheduleEntry>(
            "SELECT id, route_id, vehicle_id, departs_at, service_day FROM schedule_entries \
             WHERE route_id = $1 ORDER BY service_day, departs_at",
        )
        .bind(route_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn create_schedule(
        &self,
        route_id: i64,
        payload: &SchedulePayload,
    ) -> Result<ScheduleEntry, sqlx::Error> {
        sqlx::query_as::<_, ScheduleEntry>(
            "INSERT INTO schedule_entries (route_id, vehicle_id, departs_at, service_day) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, route_id, vehicle_id, departs_at, service_day",
        )
        .bind(route_id)
        .bind(payload.vehicle_id)
        .bind(payload.departs_at)
        .bind(payload.service_day)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn delete_schedule(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM schedule_entries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
