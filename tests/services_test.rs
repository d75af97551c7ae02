#[cfg(test)]
mod tests {
    use khushoo_reminder::*;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::time::Duration;

    fn client() -> reqwest::Client {
        http_client(Duration::from_secs(5)).unwrap()
    }

    fn aladhan(url: String) -> AladhanClient {
        AladhanClient::new(client(), AladhanConfig { base_url: url, method: 2 })
    }

    fn firebase(url: String, auth_token: Option<&str>) -> FirebaseDirectory {
        FirebaseDirectory::new(
            client(),
            FirebaseConfig {
                db_url: url,
                auth_token: auth_token.map(str::to_string),
            },
        )
    }

    fn sendgrid(url: String) -> SendGridDispatcher {
        SendGridDispatcher::new(
            client(),
            SendGridConfig {
                api_key: "SG.key".to_string(),
                from_email: "coach@example.test".to_string(),
                base_url: url,
            },
        )
    }

    #[tokio::test]
    async fn test_aladhan_returns_timings_for_city() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/timingsByCity")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("city".into(), "London".into()),
                Matcher::UrlEncoded("country".into(), "UK".into()),
                Matcher::UrlEncoded("method".into(), "2".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "code": 200,
                    "status": "OK",
                    "data": {
                        "timings": { "Fajr": "05:30", "Sunrise": "06:50", "Dhuhr": "13:00" },
                        "date": { "readable": "18 Oct 2026" }
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let timings = aladhan(server.url()).get_timings("London", "UK").await.unwrap();
        mock.assert_async().await;

        assert_eq!(timings.len(), 3);
        assert_eq!(timings.get("Fajr").map(String::as_str), Some("05:30"));
    }

    #[tokio::test]
    async fn test_aladhan_error_status_is_upstream_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/v1/timingsByCity")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"code":400,"status":"BAD_REQUEST","data":"Please specify a city"}"#)
            .create_async()
            .await;

        let err = aladhan(server.url()).get_timings("", "UK").await.unwrap_err();
        assert!(matches!(err, WorkerError::UpstreamError { status: 400, .. }));
        assert!(!err.is_fatal());
    }

    #[tokio::test]
    async fn test_aladhan_missing_data_is_upstream_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/v1/timingsByCity")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"code":200,"status":"OK"}"#)
            .create_async()
            .await;

        let err = aladhan(server.url()).get_timings("London", "UK").await.unwrap_err();
        assert!(matches!(err, WorkerError::UpstreamError { service: "AlAdhan", .. }));
    }

    #[tokio::test]
    async fn test_firebase_lists_users_with_auth() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/users.json")
            .match_query(Matcher::UrlEncoded("auth".into(), "secret".into()))
            .with_status(200)
            .with_body(
                json!({
                    "a@b-com": { "email": "a@b.com", "city": "London", "country": "UK" },
                    "c@d-com": { "email": "c@d.com", "city": "Leeds" }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let mut users = firebase(server.url(), Some("secret")).list_users().await.unwrap();
        mock.assert_async().await;
        users.sort_by(|a, b| a.id.cmp(&b.id));

        assert_eq!(users.len(), 2);
        assert_eq!(users[0], UserRecord::new("a@b-com", "a@b.com", "London", "UK"));
        assert!(users[0].is_complete());
        assert_eq!(users[1].country, None);
        assert!(!users[1].is_complete());
    }

    #[tokio::test]
    async fn test_firebase_empty_database_is_no_users() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/users.json")
            .with_status(200)
            .with_body("null")
            .create_async()
            .await;

        let users = firebase(server.url(), None).list_users().await.unwrap();
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_firebase_save_location_puts_profile() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", Matcher::Regex(r"^/users/a(@|%40)b-com\.json$".to_string()))
            .match_body(Matcher::Json(json!({
                "email": "a@b.com",
                "city": "London",
                "country": "UK"
            })))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let record = UserRecord::new("a@b-com", "a@b.com", "London", "UK");
        firebase(server.url(), None).save_location(&record).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_sendgrid_posts_plain_text_mail() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v3/mail/send")
            .match_header("authorization", "Bearer SG.key")
            .match_body(Matcher::AllOf(vec![
                Matcher::PartialJson(json!({
                    "from": { "email": "coach@example.test" },
                    "subject": "🕌 Time to Prepare for Fajr"
                })),
                Matcher::Regex(r#""to":\[\{"email":"a@b.com"\}\]"#.to_string()),
            ]))
            .with_status(202)
            .create_async()
            .await;

        let email = ReminderTemplate::new("https://example.test").render(Prayer::Fajr);
        let status = sendgrid(server.url())
            .send("a@b.com", &email.subject, &email.body)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(status, DeliveryStatus(202));
    }

    #[tokio::test]
    async fn test_sendgrid_rejection_is_reported() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v3/mail/send")
            .with_status(401)
            .with_body(r#"{"errors":[{"message":"The provided authorization grant is invalid"}]}"#)
            .create_async()
            .await;

        let err = sendgrid(server.url())
            .send("a@b.com", "subject", "body")
            .await
            .unwrap_err();

        match err {
            WorkerError::UpstreamError { service, status, message } => {
                assert_eq!(service, "SendGrid");
                assert_eq!(status, 401);
                assert!(message.contains("authorization grant"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
