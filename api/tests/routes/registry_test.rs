#[cfg(test)]
mod tests {
    use crate::helpers::{make_test_app, send};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn lists_default_subjects() {
        let app = make_test_app();
        let (status, json) = send(&app, "GET", "/api/registry/subjects", None).await;

        assert_eq!(status, StatusCode::OK);
        let subjects = json["data"].as_array().unwrap();
        assert_eq!(subjects.len(), 4);
        assert!(
            subjects
                .iter()
                .any(|s| s["id"] == "CS801" && s["name"] == "Distributed Systems")
        );
    }

    #[tokio::test]
    async fn lists_department_names() {
        let app = make_test_app();
        let (status, json) = send(&app, "GET", "/api/registry/departments", None).await;

        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert!(names.contains(&"Computer Science"));
        assert!(names.contains(&"Arts"));
    }
}
