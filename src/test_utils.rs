
#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::models::domain::GenerationMode;

    #[test]
    fn test_fixtures_have_unique_section_ids() {
        let sections = test_sections();
        assert_eq!(sections.len(), 2);
        assert_ne!(sections[0].id, sections[1].id);
    }

    #[test]
    fn test_fixture_request_uses_the_fixture_schema() {
        let request = test_request(GenerationMode::AutoMulti);
        assert_eq!(request.sections, test_sections());
    }
}
