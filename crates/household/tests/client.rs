//! Integration tests for the household client: sign-in flow, guarded
//! navigation, and session persistence against a mock backend.

#[cfg(feature = "reqwest")]
mod against_mock_backend {
    use std::time::Duration;

    use household::prelude::*;
    use household::{BLOCKED_MESSAGE, NO_TOKEN_MESSAGE, PENDING_APPROVAL_MESSAGE};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // =====================================================================
    // Helpers
    // =====================================================================

    fn config(server: &MockServer) -> ClientConfig {
        ClientConfig {
            api_url: server.uri(),
            timeout: Duration::from_secs(5),
            ..ClientConfig::default()
        }
    }

    fn client(server: &MockServer) -> HouseholdClient<ReqwestTransport> {
        HouseholdClient::<ReqwestTransport>::builder()
            .config(config(server))
            .build()
            .expect("client should build")
    }

    async fn mock_login(server: &MockServer, token: &str) {
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": token,
                "message": "Login successful",
                "category": "success"
            })))
            .mount(server)
            .await;
    }

    async fn mock_claims(server: &MockServer, token: &str, claims: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/get-claims"))
            .and(header("authorization", format!("Bearer {token}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "claims": claims })))
            .mount(server)
            .await;
    }

    fn refusal(result: Result<SignedIn, HouseholdError>) -> ApiMessage {
        match result {
            Err(HouseholdError::SignIn(msg)) => msg,
            other => panic!("expected sign-in refusal, got {other:?}"),
        }
    }

    // =====================================================================
    // Sign-in
    // =====================================================================

    #[tokio::test]
    async fn test_sign_in_customer_lands_on_dashboard() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .and(body_json(json!({"username": "cara@example.com", "password": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "c1"})))
            .expect(1)
            .mount(&server)
            .await;
        mock_claims(&server, "c1", json!({"role": "Customer", "user_id": 3})).await;
        let client = client(&server);
        let mut events = client.subscribe();

        let signed_in = client.sign_in("cara@example.com", "pw").await.unwrap();

        assert_eq!(signed_in.role, Role::Customer);
        assert_eq!(signed_in.landing, "/customer/dashboard");
        assert_eq!(client.session().token().as_deref(), Some("c1"));
        assert!(matches!(
            events.try_recv(),
            Ok(SessionEvent::LoggedIn { role: Role::Customer })
        ));
    }

    #[tokio::test]
    async fn test_sign_in_profile_hint_lands_on_profile() {
        let server = MockServer::start().await;
        mock_login(&server, "p1").await;
        mock_claims(
            &server,
            "p1",
            json!({"role": "Professional", "approved": true, "redirect": "professional_profile"}),
        )
        .await;

        let signed_in = client(&server).sign_in("pro@example.com", "pw").await.unwrap();

        assert_eq!(signed_in.landing, "/professional/profile");
        assert_eq!(
            signed_in.message,
            Some(ApiMessage::new("Login successful", Category::Success))
        );
    }

    #[tokio::test]
    async fn test_sign_in_bad_credentials_surface_backend_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "message": "Invalid email or password",
                "category": "danger"
            })))
            .mount(&server)
            .await;
        let client = client(&server);

        let err = client.sign_in("x@example.com", "bad").await.unwrap_err();

        assert_eq!(
            err.user_message(),
            ApiMessage::new("Invalid email or password", Category::Danger)
        );
        assert!(!client.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_sign_in_without_token_is_refused() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
            .mount(&server)
            .await;
        let client = client(&server);

        let msg = refusal(client.sign_in("a@example.com", "pw").await);

        assert_eq!(msg, ApiMessage::new(NO_TOKEN_MESSAGE, Category::Danger));
        assert!(!client.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_sign_in_blocked_account_is_refused() {
        let server = MockServer::start().await;
        mock_login(&server, "b1").await;
        mock_claims(&server, "b1", json!({"role": "Customer", "blocked": true})).await;
        let client = client(&server);

        let msg = refusal(client.sign_in("b@example.com", "pw").await);

        assert_eq!(msg, ApiMessage::new(BLOCKED_MESSAGE, Category::Danger));
        assert!(!client.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_sign_in_unapproved_professional_is_warned() {
        let server = MockServer::start().await;
        mock_login(&server, "p2").await;
        mock_claims(&server, "p2", json!({"role": "Professional", "approved": false})).await;
        let client = client(&server);

        let msg = refusal(client.sign_in("p@example.com", "pw").await);

        assert_eq!(
            msg,
            ApiMessage::new(PENDING_APPROVAL_MESSAGE, Category::Warning)
        );
        assert!(!client.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_sign_in_claims_failure_does_not_store_session() {
        let server = MockServer::start().await;
        mock_login(&server, "t9").await;
        Mock::given(method("GET"))
            .and(path("/get-claims"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let client = client(&server);

        let err = client.sign_in("a@example.com", "pw").await.unwrap_err();

        assert!(matches!(err, HouseholdError::Api(ref e) if e.kind == ErrorKind::Server));
        assert_eq!(
            err.user_message().message.as_deref(),
            Some(household::CLAIMS_FAILED_MESSAGE)
        );
        assert!(!client.session().is_authenticated());
    }

    // =====================================================================
    // Navigation
    // =====================================================================

    #[tokio::test]
    async fn test_navigate_after_sign_in_respects_role() {
        let server = MockServer::start().await;
        mock_login(&server, "a1").await;
        mock_claims(&server, "a1", json!({"role": "Admin"})).await;
        let client = client(&server);

        assert_eq!(
            client.navigate("/admin/dashboard").unwrap().destination(),
            "/login"
        );

        client.sign_in("root@example.com", "pw").await.unwrap();

        assert!(client.navigate("/admin/dashboard").unwrap().is_allowed());
        assert!(!client.navigate("/customer/dashboard").unwrap().is_allowed());
        assert_eq!(client.home().as_deref(), Some("/admin/dashboard"));
        assert_eq!(client.nav_links()[0].path, "/admin/dashboard");
    }

    #[tokio::test]
    async fn test_navigate_logout_signs_out_and_lands_on_login() {
        let server = MockServer::start().await;
        let client = client(&server);
        client.session().login(Role::Customer, "c1").unwrap();
        let mut events = client.subscribe();

        let nav = client.navigate("/logout").unwrap();

        assert!(nav.is_allowed());
        assert_eq!(nav.destination(), "/login");
        assert!(!client.session().is_authenticated());
        assert!(client.nav_links().is_empty());
        assert!(matches!(events.try_recv(), Ok(SessionEvent::LoggedOut)));
    }

    #[tokio::test]
    async fn test_rejected_token_drops_access_to_guarded_routes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/customer/requests"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"msg": "expired"})))
            .mount(&server)
            .await;
        let client = client(&server);
        client.session().login(Role::Customer, "c1").unwrap();

        let err = client.api().customer_requests().await.unwrap_err();
        let nav = client.navigate("/customer/dashboard").unwrap();

        assert!(err.is_auth());
        assert!(matches!(
            nav,
            Navigation::Redirect {
                reason: RedirectReason::Unauthenticated,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_unknown_path_is_router_error() {
        let server = MockServer::start().await;
        let err = client(&server).navigate("/nowhere").unwrap_err();
        assert!(matches!(err, HouseholdError::Router(_)));
    }

    // =====================================================================
    // Persistence and configuration
    // =====================================================================

    #[tokio::test]
    async fn test_session_file_survives_new_client() {
        let server = MockServer::start().await;
        mock_login(&server, "persist").await;
        mock_claims(&server, "persist", json!({"role": "Customer"})).await;
        let dir = tempfile::tempdir().expect("temp dir");
        let file = dir.path().join("session.json");
        let config = ClientConfig {
            session_file: Some(file.clone()),
            ..config(&server)
        };

        let first = HouseholdClient::<ReqwestTransport>::builder()
            .config(config.clone())
            .build()
            .unwrap();
        first.sign_in("c@example.com", "pw").await.unwrap();
        drop(first);

        let second = HouseholdClient::<ReqwestTransport>::builder()
            .config(config)
            .build()
            .unwrap();

        assert_eq!(second.session().role(), Some(Role::Customer));
        assert!(second.navigate("/customer/profile").unwrap().is_allowed());
    }

    #[test]
    fn test_build_rejects_invalid_api_url() {
        let result = HouseholdClient::<ReqwestTransport>::builder()
            .config(ClientConfig {
                api_url: "not a url".into(),
                ..ClientConfig::default()
            })
            .build();

        assert!(matches!(result, Err(HouseholdError::Transport(_))));
    }

    #[test]
    fn test_build_rejects_missing_login_route() {
        let result = HouseholdClient::<ReqwestTransport>::builder()
            .routes([household::router::RouteDescriptor::new("/home")])
            .build();

        assert!(matches!(result, Err(HouseholdError::Router(_))));
    }
}
