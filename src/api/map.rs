use crate::{
    roster::RosterClient,
    views::geo::{MAP_CENTER, MAP_ZOOM, MapMarker, map_markers},
};
use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct MapResponse {
    /// `[latitude, longitude]` of the initial viewport
    #[schema(value_type = Vec<f64>, example = json!([22.5937, 78.9629]))]
    pub center: [f64; 2],
    #[schema(example = 5)]
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
    #[schema(value_type = String, format = DateTime)]
    pub fetched_at: DateTime<Utc>,
}

/// Employees by city
#[utoipa::path(
    get,
    path = "/api/map",
    responses(
        (status = 200, description = "One marker per city", body = MapResponse),
        (status = 401, description = "Missing or invalid access token"),
        (status = 502, description = "Roster source unavailable")
    ),
    tag = "Map",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn employee_map(roster: web::Data<RosterClient>) -> actix_web::Result<impl Responder> {
    let employees = roster.fetch_employees().await?;

    Ok(HttpResponse::Ok().json(MapResponse {
        center: [MAP_CENTER.0, MAP_CENTER.1],
        zoom: MAP_ZOOM,
        markers: map_markers(&employees),
        fetched_at: Utc::now(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::client::tests::FakeRoster;
    use actix_web::{App, test};
    use serde_json::{Value, json};
    use std::time::Duration;

    #[actix_web::test]
    async fn places_employees_by_city() {
        let upstream = FakeRoster::start(
            200,
            r#"{"employees":[
                {"id":"1","user_name":"Ann","user_city":"Pune"},
                {"id":"2","user_name":"Raj","user_city":"Pune"},
                {"id":"3","user_name":"Meera"}
            ]}"#,
        )
        .await;
        let roster = RosterClient::new(&upstream.url, "test", "123456", Duration::from_secs(5)).unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(roster))
                .route("/map", web::get().to(employee_map)),
        )
        .await;

        let req = test::TestRequest::get().uri("/map").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["center"], json!([22.5937, 78.9629]));
        assert_eq!(body["zoom"], 5);

        let markers = body["markers"].as_array().unwrap();
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0]["city"], "Pune");
        assert_eq!(markers[0]["coordinates"], json!([18.5204, 73.8567]));
        assert_eq!(markers[0]["employee_count"], 2);
        assert_eq!(markers[1]["city"], "Unknown");
        assert_eq!(markers[1]["employees"][0]["user_name"], "Meera");

        upstream.stop().await;
    }
}
