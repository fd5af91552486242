#[cfg(test)]
mod integration_tests {
    use crate::auth::{self, SuperuserOverrides};
    use crate::router::create_router;
    use crate::schemas::ApiResponse;
    use crate::test_utils::test_utils::{
        bearer, bootstrap_admin_access, register_and_login, setup_test_app, setup_test_app_state,
        test_bootstrap_config,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use chrono::{DateTime, Utc};
    use model::entities::{attendance, course, department, student, user};
    use sea_orm::{EntityTrait, PaginatorTrait};

    #[tokio::test]
    async fn test_health_check() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_register_user() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/user/register")
            .json(&serde_json::json!({
                "email": "vinay@example.com",
                "password": "Secret@123",
                "full_name": "Vinay Kushwaha",
                "type": "teacher",
                "username": "vinay",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        assert_eq!(body.message, "User Created Successfully.");

        let user_data = &body.data;
        assert_eq!(user_data["email"], "vinay@example.com");
        assert_eq!(user_data["username"], "vinay");
        assert_eq!(user_data["full_name"], "Vinay Kushwaha");
        assert_eq!(user_data["type"], "teacher");
        assert_eq!(user_data["is_staff"], false);
        assert_eq!(user_data["is_superuser"], false);
        assert_eq!(user_data["is_active"], true);
        assert!(user_data["id"].as_i64().unwrap() > 0);
        // The hash must never leave the server
        assert!(user_data.get("password_hash").is_none());
        assert!(user_data.get("password").is_none());
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let payload = serde_json::json!({
            "email": "dup@example.com",
            "password": "Secret@123",
            "full_name": "First User",
            "type": "student",
        });

        let first = server.post("/user/register").json(&payload).await;
        first.assert_status(StatusCode::CREATED);

        // Same email, different username
        let second = server
            .post("/user/register")
            .json(&serde_json::json!({
                "email": "dup@example.com",
                "password": "Secret@123",
                "full_name": "Second User",
                "type": "student",
                "username": "other",
            }))
            .await;

        second.assert_status(StatusCode::BAD_REQUEST);
        let error_body: serde_json::Value = second.json();
        assert_eq!(error_body["success"], false);
        assert_eq!(error_body["code"], "EMAIL_ALREADY_EXISTS");
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let first = server
            .post("/user/register")
            .json(&serde_json::json!({
                "email": "first@example.com",
                "password": "Secret@123",
                "full_name": "First User",
                "type": "student",
                "username": "taken",
            }))
            .await;
        first.assert_status(StatusCode::CREATED);

        let second = server
            .post("/user/register")
            .json(&serde_json::json!({
                "email": "second@example.com",
                "password": "Secret@123",
                "full_name": "Second User",
                "type": "student",
                "username": "taken",
            }))
            .await;

        second.assert_status(StatusCode::BAD_REQUEST);
        let error_body: serde_json::Value = second.json();
        assert_eq!(error_body["success"], false);
        assert_eq!(error_body["code"], "USERNAME_ALREADY_EXISTS");
    }

    #[tokio::test]
    async fn test_register_rejects_malformed_email() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/user/register")
            .json(&serde_json::json!({
                "email": "not-an-email",
                "password": "Secret@123",
                "full_name": "Some User",
                "type": "student",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let error_body: serde_json::Value = response.json();
        assert_eq!(error_body["code"], "INVALID_EMAIL");
    }

    #[tokio::test]
    async fn test_register_rejects_non_alphabetic_full_name() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/user/register")
            .json(&serde_json::json!({
                "email": "digits@example.com",
                "password": "Secret@123",
                "full_name": "User 42",
                "type": "student",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let error_body: serde_json::Value = response.json();
        assert_eq!(error_body["code"], "INVALID_FULL_NAME");
        assert_eq!(error_body["error"], "Only alphabetic characters are allowed.");
    }

    #[tokio::test]
    async fn test_bootstrap_creates_exactly_one_superuser() {
        let state = setup_test_app_state().await;
        let config = test_bootstrap_config();

        let created = auth::bootstrap_superuser(&state.db, &config)
            .await
            .unwrap();
        let admin = created.expect("first bootstrap must create the superuser");
        assert!(admin.is_staff);
        assert!(admin.is_superuser);
        assert!(admin.is_active);
        assert_eq!(admin.email, "admin@gmail.com");

        // A second startup must not create another
        let second = auth::bootstrap_superuser(&state.db, &config)
            .await
            .unwrap();
        assert!(second.is_none());

        let count = user::Entity::find().count(&state.db).await.unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_bootstrap_login_with_default_credentials() {
        let state = setup_test_app_state().await;
        let app = create_router(state.clone());
        let server = TestServer::new(app).unwrap();

        auth::bootstrap_superuser(&state.db, &test_bootstrap_config())
            .await
            .unwrap();

        let response = server
            .post("/user/login")
            .json(&serde_json::json!({
                "email": "admin@gmail.com",
                "password": "Abcd@1234",
            }))
            .await;

        response.assert_status(StatusCode::OK);
        let body: serde_json::Value = response.json();
        assert!(body["access"].as_str().is_some());
        assert!(body["refresh"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_login_failure_is_uniform() {
        let state = setup_test_app_state().await;
        let app = create_router(state.clone());
        let server = TestServer::new(app).unwrap();

        auth::bootstrap_superuser(&state.db, &test_bootstrap_config())
            .await
            .unwrap();

        // Wrong password for an existing user
        let wrong_password = server
            .post("/user/login")
            .json(&serde_json::json!({
                "email": "admin@gmail.com",
                "password": "not-the-password",
            }))
            .await;
        wrong_password.assert_status(StatusCode::BAD_REQUEST);

        // Unknown email entirely
        let unknown_email = server
            .post("/user/login")
            .json(&serde_json::json!({
                "email": "nobody@example.com",
                "password": "whatever",
            }))
            .await;
        unknown_email.assert_status(StatusCode::BAD_REQUEST);

        // The two failures are indistinguishable: no existence oracle
        let body_a: serde_json::Value = wrong_password.json();
        let body_b: serde_json::Value = unknown_email.json();
        assert_eq!(body_a, body_b);
        assert_eq!(body_a["error"], "Invalid Credentials.");
    }

    #[tokio::test]
    async fn test_refresh_token_mints_access_token() {
        let state = setup_test_app_state().await;
        let app = create_router(state.clone());
        let server = TestServer::new(app).unwrap();

        auth::bootstrap_superuser(&state.db, &test_bootstrap_config())
            .await
            .unwrap();

        let login = server
            .post("/user/login")
            .json(&serde_json::json!({
                "email": "admin@gmail.com",
                "password": "Abcd@1234",
            }))
            .await;
        login.assert_status(StatusCode::OK);
        let tokens: serde_json::Value = login.json();
        let refresh_token = tokens["refresh"].as_str().unwrap().to_string();

        let refreshed = server
            .post("/user/refresh")
            .json(&serde_json::json!({ "refresh": refresh_token }))
            .await;
        refreshed.assert_status(StatusCode::OK);
        let refreshed_body: serde_json::Value = refreshed.json();
        let new_access = refreshed_body["access"].as_str().unwrap().to_string();

        // The minted access token authenticates requests
        let (name, value) = bearer(&new_access);
        let list = server.get("/departments/").add_header(name, value).await;
        list.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        let state = setup_test_app_state().await;
        let app = create_router(state.clone());
        let server = TestServer::new(app).unwrap();

        let access = bootstrap_admin_access(&state, &server).await;

        let response = server
            .post("/user/refresh")
            .json(&serde_json::json!({ "refresh": access }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_refresh_token_rejected_as_request_auth() {
        let state = setup_test_app_state().await;
        let app = create_router(state.clone());
        let server = TestServer::new(app).unwrap();

        auth::bootstrap_superuser(&state.db, &test_bootstrap_config())
            .await
            .unwrap();

        let login = server
            .post("/user/login")
            .json(&serde_json::json!({
                "email": "admin@gmail.com",
                "password": "Abcd@1234",
            }))
            .await;
        let tokens: serde_json::Value = login.json();
        let refresh_token = tokens["refresh"].as_str().unwrap().to_string();

        let (name, value) = bearer(&refresh_token);
        let response = server.get("/departments/").add_header(name, value).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_protected_endpoints_require_authentication() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        for path in [
            "/user/user_list",
            "/departments/",
            "/course/",
            "/student/",
            "/attendance/",
        ] {
            let response = server.get(path).await;
            response.assert_status(StatusCode::UNAUTHORIZED);
            let body: serde_json::Value = response.json();
            assert_eq!(body["success"], false, "unexpected body for {}", path);
            assert_eq!(body["code"], "AUTH_REQUIRED", "unexpected code for {}", path);
        }
    }

    #[tokio::test]
    async fn test_department_create_requires_staff() {
        let state = setup_test_app_state().await;
        let app = create_router(state.clone());
        let server = TestServer::new(app).unwrap();

        let admin_access = bootstrap_admin_access(&state, &server).await;
        let member_access = register_and_login(&server, "plain@example.com", "Secret@123").await;

        let payload = serde_json::json!({ "department_name": "Computer Science" });

        // Non-staff caller is refused
        let (name, value) = bearer(&member_access);
        let forbidden = server
            .post("/departments/")
            .add_header(name, value)
            .json(&payload)
            .await;
        forbidden.assert_status(StatusCode::FORBIDDEN);
        let error_body: serde_json::Value = forbidden.json();
        assert_eq!(
            error_body["error"],
            "You do not have permission to perform this action."
        );

        // Staff caller succeeds and is stamped as submitter
        let (name, value) = bearer(&admin_access);
        let created = server
            .post("/departments/")
            .add_header(name, value)
            .json(&payload)
            .await;
        created.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = created.json();
        assert!(body.success);
        assert_eq!(body.data["department_name"], "Computer Science");
        assert!(body.data["submitted_by"].as_i64().unwrap() > 0);

        // Both callers can list
        let (name, value) = bearer(&member_access);
        let listed = server.get("/departments/").add_header(name, value).await;
        listed.assert_status(StatusCode::OK);
        let list_body: ApiResponse<Vec<serde_json::Value>> = listed.json();
        assert_eq!(list_body.data.len(), 1);
    }

    #[tokio::test]
    async fn test_course_create_requires_staff_and_existing_department() {
        let state = setup_test_app_state().await;
        let app = create_router(state.clone());
        let server = TestServer::new(app).unwrap();

        let admin_access = bootstrap_admin_access(&state, &server).await;
        let member_access = register_and_login(&server, "member@example.com", "Secret@123").await;

        // Unknown department is a validation failure, not a crash
        let (name, value) = bearer(&admin_access);
        let bad_department = server
            .post("/course/")
            .add_header(name, value)
            .json(&serde_json::json!({
                "course_name": "Algorithms",
                "department": 999,
                "semester": 4,
                "class_name": "CS201",
                "lecture_hours": 50,
            }))
            .await;
        bad_department.assert_status(StatusCode::BAD_REQUEST);
        let error_body: serde_json::Value = bad_department.json();
        assert_eq!(error_body["code"], "INVALID_DEPARTMENT_ID");
        assert!(error_body["error"]
            .as_str()
            .unwrap()
            .contains("Department with id 999 does not exist"));

        // Create the department, then the course
        let (name, value) = bearer(&admin_access);
        let department = server
            .post("/departments/")
            .add_header(name, value)
            .json(&serde_json::json!({ "department_name": "Computer Science" }))
            .await;
        department.assert_status(StatusCode::CREATED);
        let department_body: ApiResponse<serde_json::Value> = department.json();
        let department_id = department_body.data["id"].as_i64().unwrap();

        let course_payload = serde_json::json!({
            "course_name": "Algorithms",
            "department": department_id,
            "semester": 4,
            "class_name": "CS201",
            "lecture_hours": 50,
        });

        // Non-staff caller is refused even with a valid payload
        let (name, value) = bearer(&member_access);
        let forbidden = server
            .post("/course/")
            .add_header(name, value)
            .json(&course_payload)
            .await;
        forbidden.assert_status(StatusCode::FORBIDDEN);

        let (name, value) = bearer(&admin_access);
        let created = server
            .post("/course/")
            .add_header(name, value)
            .json(&course_payload)
            .await;
        created.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = created.json();
        assert_eq!(body.message, "Course Created Successfully.");
        assert_eq!(body.data["department"], department_id);
        assert_eq!(body.data["semester"], 4);
        assert_eq!(body.data["lecture_hours"], 50);
    }

    #[tokio::test]
    async fn test_non_staff_can_create_students_and_attendance() {
        let state = setup_test_app_state().await;
        let app = create_router(state.clone());
        let server = TestServer::new(app).unwrap();

        let admin_access = bootstrap_admin_access(&state, &server).await;
        let member_access = register_and_login(&server, "member@example.com", "Secret@123").await;

        // Staff sets up the department and course
        let (name, value) = bearer(&admin_access);
        let department = server
            .post("/departments/")
            .add_header(name, value)
            .json(&serde_json::json!({ "department_name": "Electronics" }))
            .await;
        let department_body: ApiResponse<serde_json::Value> = department.json();
        let department_id = department_body.data["id"].as_i64().unwrap();

        let (name, value) = bearer(&admin_access);
        let course = server
            .post("/course/")
            .add_header(name, value)
            .json(&serde_json::json!({
                "course_name": "Circuits",
                "department": department_id,
                "semester": 2,
                "class_name": "EC101",
                "lecture_hours": 30,
            }))
            .await;
        let course_body: ApiResponse<serde_json::Value> = course.json();
        let course_id = course_body.data["id"].as_i64().unwrap();

        // A plain authenticated user records the student and the mark
        let (name, value) = bearer(&member_access);
        let student = server
            .post("/student/")
            .add_header(name, value)
            .json(&serde_json::json!({
                "full_name": "Sintu Rana",
                "department": department_id,
                "class_name": "B2",
            }))
            .await;
        student.assert_status(StatusCode::CREATED);
        let student_body: ApiResponse<serde_json::Value> = student.json();
        assert_eq!(student_body.message, "Student Details created Successfully.");
        let student_id = student_body.data["id"].as_i64().unwrap();

        let (name, value) = bearer(&member_access);
        let mark = server
            .post("/attendance/")
            .add_header(name, value)
            .json(&serde_json::json!({
                "student": student_id,
                "course": course_id,
                "present": true,
            }))
            .await;
        mark.assert_status(StatusCode::CREATED);
        let mark_body: ApiResponse<serde_json::Value> = mark.json();
        assert_eq!(mark_body.message, "Student Attendance has been registered.");
        assert_eq!(mark_body.data["present"], true);
    }

    #[tokio::test]
    async fn test_student_create_with_unknown_department_fails_validation() {
        let state = setup_test_app_state().await;
        let app = create_router(state.clone());
        let server = TestServer::new(app).unwrap();

        let access = bootstrap_admin_access(&state, &server).await;

        let (name, value) = bearer(&access);
        let response = server
            .post("/student/")
            .add_header(name, value)
            .json(&serde_json::json!({
                "full_name": "Orphan Student",
                "department": 424242,
                "class_name": "X1",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let error_body: serde_json::Value = response.json();
        assert_eq!(error_body["code"], "INVALID_DEPARTMENT_ID");
    }

    #[tokio::test]
    async fn test_attendance_create_with_unknown_references_fails_validation() {
        let state = setup_test_app_state().await;
        let app = create_router(state.clone());
        let server = TestServer::new(app).unwrap();

        let access = bootstrap_admin_access(&state, &server).await;

        let (name, value) = bearer(&access);
        let response = server
            .post("/attendance/")
            .add_header(name, value)
            .json(&serde_json::json!({
                "student": 77,
                "course": 88,
                "present": false,
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let error_body: serde_json::Value = response.json();
        assert_eq!(error_body["code"], "INVALID_STUDENT_ID");
    }

    #[tokio::test]
    async fn test_user_list_requires_authentication() {
        let state = setup_test_app_state().await;
        let app = create_router(state.clone());
        let server = TestServer::new(app).unwrap();

        let access = bootstrap_admin_access(&state, &server).await;

        // The historically open endpoint is closed now
        let anonymous = server.get("/user/user_list").await;
        anonymous.assert_status(StatusCode::UNAUTHORIZED);

        let (name, value) = bearer(&access);
        let authed = server.get("/user/user_list").add_header(name, value).await;
        authed.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = authed.json();
        assert!(body.success);
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0]["email"], "admin@gmail.com");
        assert!(body.data[0].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_attendance_list_returns_all_with_server_stamps() {
        let state = setup_test_app_state().await;
        let app = create_router(state.clone());
        let server = TestServer::new(app).unwrap();

        let access = bootstrap_admin_access(&state, &server).await;
        let caller_id = {
            let admin = user::Entity::find().one(&state.db).await.unwrap().unwrap();
            admin.id
        };

        // Fixture department, course and student
        let (name, value) = bearer(&access);
        let department = server
            .post("/departments/")
            .add_header(name, value)
            .json(&serde_json::json!({ "department_name": "Mathematics" }))
            .await;
        let department_body: ApiResponse<serde_json::Value> = department.json();
        let department_id = department_body.data["id"].as_i64().unwrap();

        let (name, value) = bearer(&access);
        let course = server
            .post("/course/")
            .add_header(name, value)
            .json(&serde_json::json!({
                "course_name": "Calculus",
                "department": department_id,
                "semester": 1,
                "class_name": "M101",
                "lecture_hours": 40,
            }))
            .await;
        let course_body: ApiResponse<serde_json::Value> = course.json();
        let course_id = course_body.data["id"].as_i64().unwrap();

        let (name, value) = bearer(&access);
        let student = server
            .post("/student/")
            .add_header(name, value)
            .json(&serde_json::json!({
                "full_name": "Asha Verma",
                "department": department_id,
                "class_name": "M1",
            }))
            .await;
        let student_body: ApiResponse<serde_json::Value> = student.json();
        let student_id = student_body.data["id"].as_i64().unwrap();

        // One second of slack for timestamp truncation in storage
        let before = Utc::now() - chrono::Duration::seconds(1);

        let n = 3;
        for i in 0..n {
            let (name, value) = bearer(&access);
            let response = server
                .post("/attendance/")
                .add_header(name, value)
                .json(&serde_json::json!({
                    "student": student_id,
                    "course": course_id,
                    "present": i % 2 == 0,
                }))
                .await;
            response.assert_status(StatusCode::CREATED);
        }

        let (name, value) = bearer(&access);
        let listed = server.get("/attendance/").add_header(name, value).await;
        listed.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<serde_json::Value>> = listed.json();
        assert_eq!(body.data.len(), n);

        for record in &body.data {
            assert_eq!(record["submitted_by"].as_i64().unwrap(), caller_id as i64);
            let updated_at: DateTime<Utc> =
                serde_json::from_value(record["updated_at"].clone()).unwrap();
            assert!(
                updated_at >= before,
                "updated_at {} earlier than request time {}",
                updated_at,
                before
            );
        }
    }

    #[tokio::test]
    async fn test_department_delete_cascades_to_courses_and_students() {
        let state = setup_test_app_state().await;
        let app = create_router(state.clone());
        let server = TestServer::new(app).unwrap();

        let access = bootstrap_admin_access(&state, &server).await;

        let (name, value) = bearer(&access);
        let created = server
            .post("/departments/")
            .add_header(name, value)
            .json(&serde_json::json!({ "department_name": "Doomed" }))
            .await;
        let department_body: ApiResponse<serde_json::Value> = created.json();
        let department_id = department_body.data["id"].as_i64().unwrap() as i32;

        let (name, value) = bearer(&access);
        server
            .post("/course/")
            .add_header(name, value)
            .json(&serde_json::json!({
                "course_name": "Short Lived",
                "department": department_id,
                "semester": 1,
                "class_name": "D1",
                "lecture_hours": 10,
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let (name, value) = bearer(&access);
        server
            .post("/student/")
            .add_header(name, value)
            .json(&serde_json::json!({
                "full_name": "Transient Student",
                "department": department_id,
                "class_name": "D1",
            }))
            .await
            .assert_status(StatusCode::CREATED);

        // No delete endpoint is exposed; the cascade is a schema property
        department::Entity::delete_by_id(department_id)
            .exec(&state.db)
            .await
            .unwrap();

        assert_eq!(course::Entity::find().count(&state.db).await.unwrap(), 0);
        assert_eq!(student::Entity::find().count(&state.db).await.unwrap(), 0);
        assert_eq!(
            attendance::Entity::find().count(&state.db).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_user_delete_nulls_submitted_by_on_department() {
        let state = setup_test_app_state().await;
        let app = create_router(state.clone());
        let server = TestServer::new(app).unwrap();

        let access = bootstrap_admin_access(&state, &server).await;
        let admin = user::Entity::find().one(&state.db).await.unwrap().unwrap();

        let (name, value) = bearer(&access);
        let created = server
            .post("/departments/")
            .add_header(name, value)
            .json(&serde_json::json!({ "department_name": "Persistent" }))
            .await;
        let department_body: ApiResponse<serde_json::Value> = created.json();
        let department_id = department_body.data["id"].as_i64().unwrap() as i32;
        assert_eq!(
            department_body.data["submitted_by"].as_i64().unwrap(),
            admin.id as i64
        );

        // Removing the submitter must not remove the record it annotates
        user::Entity::delete_by_id(admin.id)
            .exec(&state.db)
            .await
            .unwrap();

        let remaining = department::Entity::find_by_id(department_id)
            .one(&state.db)
            .await
            .unwrap()
            .expect("department must survive the submitter's deletion");
        assert_eq!(remaining.submitted_by, None);
    }

    #[tokio::test]
    async fn test_create_superuser_rejects_explicitly_false_flags() {
        let state = setup_test_app_state().await;

        for overrides in [
            SuperuserOverrides {
                is_staff: Some(false),
                ..Default::default()
            },
            SuperuserOverrides {
                is_superuser: Some(false),
                ..Default::default()
            },
            SuperuserOverrides {
                is_active: Some(false),
                ..Default::default()
            },
        ] {
            let result = auth::create_superuser(
                &state.db,
                "root@example.com",
                "root",
                "Secret@123",
                overrides,
            )
            .await;
            assert!(result.is_err(), "overrides {:?} must be rejected", overrides);
        }

        // No partial superuser slipped through
        assert_eq!(user::Entity::find().count(&state.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_deactivated_user_cannot_authenticate() {
        let state = setup_test_app_state().await;
        let app = create_router(state.clone());
        let server = TestServer::new(app).unwrap();

        let access = bootstrap_admin_access(&state, &server).await;
        register_and_login(&server, "leaver@example.com", "Secret@123").await;

        // Deactivate the account directly
        use sea_orm::{ActiveModelTrait, ColumnTrait, QueryFilter, Set};
        let leaver = user::Entity::find()
            .filter(user::Column::Email.eq("leaver@example.com"))
            .one(&state.db)
            .await
            .unwrap()
            .unwrap();
        let mut active: user::ActiveModel = leaver.into();
        active.is_active = Set(false);
        active.update(&state.db).await.unwrap();

        // Login fails with the generic message
        let login = server
            .post("/user/login")
            .json(&serde_json::json!({
                "email": "leaver@example.com",
                "password": "Secret@123",
            }))
            .await;
        login.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = login.json();
        assert_eq!(body["error"], "Invalid Credentials.");

        // The admin token still works
        let (name, value) = bearer(&access);
        server
            .get("/user/user_list")
            .add_header(name, value)
            .await
            .assert_status(StatusCode::OK);
    }
}
