#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        Router,
    };
    use http_body_util::BodyExt; // for .collect()
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::middleware::auth::{Role, USER_ID_HEADER, USER_ROLE_HEADER};
    use crate::routes;
    use crate::state::AppState;
    use crate::models::ApplicantStatus;
    use crate::tests::{fixtures, test_state};

    async fn setup_test_app() -> (Router, AppState) {
        let state = test_state().await;
        (routes::router(state.clone()), state)
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
        (status, headers, body)
    }

    fn post_json(uri: &str, caller: Option<(Role, i64)>, body: Value) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri(uri).header(header::CONTENT_TYPE, "application/json");
        if let Some((role, id)) = caller {
            builder = builder.header(USER_ID_HEADER, id.to_string()).header(USER_ROLE_HEADER, role.as_str());
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str, caller: Option<(Role, i64)>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some((role, id)) = caller {
            builder = builder.header(USER_ID_HEADER, id.to_string()).header(USER_ROLE_HEADER, role.as_str());
        }
        builder.body(Body::empty()).unwrap()
    }

    fn shelter_body(email: &str, address: &str) -> Value {
        json!({
            "email": email,
            "name": "Happy Paws",
            "address": address,
            "address_detail": "Building B",
            "is_opened_address": true,
            "phone_number": "02-123-4567",
            "image_url": null
        })
    }

    fn recruitment_body(deadline: &str) -> Value {
        json!({
            "title": "Morning walk",
            "content": "Walk the dogs around the park",
            "capacity": 5,
            "start_time": "2030-01-10T09:00:00",
            "end_time": "2030-01-10T12:00:00",
            "deadline": deadline
        })
    }

    #[tokio::test]
    async fn test_healthz_endpoint() {
        let (app, _) = setup_test_app().await;
        let response = app.oneshot(get("/healthz", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_security_headers_present() {
        let (app, _) = setup_test_app().await;
        let (status, headers, _) = send(&app, get("/api/recruitments", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
        assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
        assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), "no-store");
    }

    #[tokio::test]
    async fn test_missing_identity_is_unauthorized() {
        let (app, _) = setup_test_app().await;
        let (status, _, body) = send(&app, get("/api/volunteers/me", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");

        let req = Request::builder().uri("/api/volunteers/me").header(USER_ID_HEADER, "abc").body(Body::empty()).unwrap();
        let (status, _, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_register_shelter_and_read_back() {
        let (app, _) = setup_test_app().await;
        let (status, headers, body) = send(&app, post_json("/api/shelters", None, shelter_body("a@shelter.org", "Seoul"))).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["id"].as_i64().unwrap();
        assert_eq!(headers.get(header::LOCATION).unwrap().to_str().unwrap(), format!("/api/shelters/{}", id));

        let (status, _, body) = send(&app, get(&format!("/api/shelters/{}", id), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Happy Paws");
        assert_eq!(body["address_detail"], "Building B");

        let (status, _, body) = send(&app, post_json("/api/shelters", None, shelter_body("a@shelter.org", "Seoul"))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_overlong_address_is_bad_request() {
        let (app, _) = setup_test_app().await;
        let address = "a".repeat(101);
        let (status, _, body) = send(&app, post_json("/api/shelters", None, shelter_body("b@shelter.org", &address))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_unknown_shelter_is_not_found() {
        let (app, _) = setup_test_app().await;
        let (status, _, _) = send(&app, get("/api/shelters/4242", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _, body) = send(&app, get("/api/shelters/0", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_register_recruitment_then_search() {
        let (app, state) = setup_test_app().await;
        let shelter = fixtures::insert_shelter(&state.db, "r@shelter.org").await;

        let (status, headers, body) =
            send(&app, post_json("/api/shelters/recruitments", Some((Role::Shelter, shelter)), recruitment_body("2030-01-09T00:00:00"))).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["id"].as_i64().unwrap();
        assert_eq!(headers.get(header::LOCATION).unwrap().to_str().unwrap(), format!("/api/recruitments/{}", id));

        let (status, _, body) = send(&app, get("/api/recruitments", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["page_info"]["total_elements"], 1);
        assert_eq!(body["page_info"]["has_next"], false);
        assert_eq!(body["recruitments"][0]["title"], "Morning walk");
        assert_eq!(body["recruitments"][0]["start_time"], "2030-01-10T09:00:00");

        let (status, _, body) = send(&app, get("/api/recruitments?keyword=Happy&title=true&content=false", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["page_info"]["total_elements"], 0);

        let (status, _, body) = send(&app, get("/api/recruitments?keyword=Happy", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["page_info"]["total_elements"], 1);

        let (status, _, body) = send(&app, get("/api/shelters/recruitments?keyword=Happy", Some((Role::Shelter, shelter)))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["page_info"]["total_elements"], 0);
    }

    #[tokio::test]
    async fn test_deadline_after_start_is_bad_request() {
        let (app, state) = setup_test_app().await;
        let shelter = fixtures::insert_shelter(&state.db, "late@shelter.org").await;
        let (status, _, body) =
            send(&app, post_json("/api/shelters/recruitments", Some((Role::Shelter, shelter)), recruitment_body("2030-01-11T00:00:00"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_duplicate_apply_is_conflict() {
        let (app, state) = setup_test_app().await;
        let shelter = fixtures::insert_shelter(&state.db, "apply@shelter.org").await;
        let recruitment = fixtures::insert_recruitment(&state.db, shelter, "walk", "", 5).await;
        let volunteer = fixtures::insert_volunteer(&state.db, "apply@volunteer.org").await;
        let uri = format!("/api/volunteers/recruitments/{}/apply", recruitment);

        let (status, headers, _) = send(&app, post_json(&uri, Some((Role::Volunteer, volunteer)), json!({}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(headers.get(header::LOCATION).unwrap(), "/api/volunteers/applicants");

        let (status, _, body) = send(&app, post_json(&uri, Some((Role::Volunteer, volunteer)), json!({}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");

        let (status, _, body) = send(&app, get("/api/volunteers/applicants", Some((Role::Volunteer, volunteer)))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["applications"][0]["status"], "PENDING");
    }

    #[tokio::test]
    async fn test_volunteer_registration_and_my_page() {
        let (app, _) = setup_test_app().await;
        let body = json!({
            "email": "me@volunteer.org",
            "name": "minji",
            "birth_date": "1996-04-02",
            "phone_number": "010-1234-5678",
            "gender": "FEMALE",
            "image_url": null
        });
        let (status, headers, body) = send(&app, post_json("/api/volunteers", None, body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(headers.get(header::LOCATION).unwrap(), "/api/volunteers/me");
        let id = body["id"].as_i64().unwrap();

        let (status, _, body) = send(&app, get("/api/volunteers/me", Some((Role::Volunteer, id)))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["birth_date"], "1996-04-02");
        assert_eq!(body["temperature"], 36);
        assert_eq!(body["volunteer_count"], 0);
    }

    #[tokio::test]
    async fn test_metrics_prometheus_lists_counters() {
        let (app, _) = setup_test_app().await;
        let response = app.oneshot(get("/metrics/prometheus", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("anifriends_applications_registered 0"));
        assert!(text.contains("anifriends_uptime_seconds"));
    }

    #[tokio::test]
    async fn test_wrong_role_is_forbidden() {
        let (app, state) = setup_test_app().await;
        let shelter = fixtures::insert_shelter(&state.db, "role@shelter.org").await;
        let volunteer = fixtures::insert_volunteer(&state.db, "role@volunteer.org").await;
        let recruitment = fixtures::insert_recruitment(&state.db, shelter, "walk", "", 5).await;

        // Same numeric id, wrong role: a volunteer must not act as the shelter with that id.
        let as_volunteer = Some((Role::Volunteer, shelter));
        let req = post_json("/api/shelters/recruitments", as_volunteer, recruitment_body("2030-01-09T00:00:00"));
        let (status, _, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "FORBIDDEN");

        let uri = format!("/api/volunteers/recruitments/{}/apply", recruitment);
        let (status, _, _) = send(&app, post_json(&uri, Some((Role::Shelter, volunteer)), json!({}))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let req =
            Request::builder().uri("/api/volunteers/me").header(USER_ID_HEADER, volunteer.to_string()).body(Body::empty());
        let (status, _, _) = send(&app, req.unwrap()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_recruitment_images_round_trip_through_detail() {
        let (app, state) = setup_test_app().await;
        let shelter = fixtures::insert_shelter(&state.db, "img@shelter.org").await;
        let mut body = recruitment_body("2030-01-09T00:00:00");
        body["image_urls"] = json!(["https://img.example/walk.jpg"]);

        let as_shelter = Some((Role::Shelter, shelter));
        let (status, _, created) = send(&app, post_json("/api/shelters/recruitments", as_shelter, body)).await;
        assert_eq!(status, StatusCode::CREATED);
        let uri = format!("/api/recruitments/{}", created["id"]);
        let (status, _, detail) = send(&app, get(&uri, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["image_urls"], json!(["https://img.example/walk.jpg"]));

        let mut too_many = recruitment_body("2030-01-09T00:00:00");
        too_many["image_urls"] = json!(["a", "b", "c", "d", "e", "f"]);
        let (status, _, _) = send(&app, post_json("/api/shelters/recruitments", as_shelter, too_many)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_completed_recruitments_endpoint() {
        let (app, state) = setup_test_app().await;
        let shelter = fixtures::insert_shelter(&state.db, "done@shelter.org").await;
        let volunteer = fixtures::insert_volunteer(&state.db, "done@volunteer.org").await;
        let attended = fixtures::insert_recruitment(&state.db, shelter, "attended", "", -2).await;
        let pending = fixtures::insert_recruitment(&state.db, shelter, "pending", "", 3).await;
        fixtures::insert_applicant(&state.db, attended, volunteer, ApplicantStatus::Attendance).await;
        fixtures::insert_applicant(&state.db, pending, volunteer, ApplicantStatus::Pending).await;

        let (status, _, body) =
            send(&app, get("/api/volunteers/recruitments/completed", Some((Role::Volunteer, volunteer)))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["page_info"]["total_elements"], 1);
        assert_eq!(body["recruitments"][0]["recruitment_id"], attended);
        assert_eq!(body["recruitments"][0]["is_review_written"], false);
    }

    #[tokio::test]
    async fn test_cursor_search_endpoint() {
        let (app, state) = setup_test_app().await;
        let shelter = fixtures::insert_shelter(&state.db, "v2@shelter.org").await;
        fixtures::insert_recruitment(&state.db, shelter, "first", "", 5).await;
        let last = fixtures::insert_recruitment(&state.db, shelter, "second", "", 5).await;

        let (status, _, body) = send(&app, get("/api/v2/recruitments?size=1", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["recruitments"][0]["recruitment_id"], last);
        assert_eq!(body["page_info"]["has_next"], true);
        assert_eq!(body["page_info"]["total_elements"], 2);

        let created_at = body["recruitments"][0]["created_at"].as_str().unwrap().to_string();
        let uri = format!("/api/v2/recruitments?size=1&created_at={}&recruitment_id={}", created_at, last);
        let (status, _, body) = send(&app, get(&uri, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["recruitments"][0]["title"], "first");
        assert_eq!(body["page_info"]["has_next"], false);

        let (status, _, body) = send(&app, get("/api/v2/recruitments?recruitment_id=3", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
