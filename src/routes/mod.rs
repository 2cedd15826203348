pub mod auth;
pub mod checkout;
pub mod health;
pub mod keys;
pub mod session;
pub mod webhooks;

use actix_web::HttpRequest;

/// Extract the bearer token from the `Authorization` header, if any.
pub fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_bearer_token_extraction() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer st_abc123"))
            .to_http_request();
        assert_eq!(bearer_token(&req).as_deref(), Some("st_abc123"));
    }

    #[test]
    fn test_bearer_token_missing_or_malformed() {
        let req = TestRequest::default().to_http_request();
        assert!(bearer_token(&req).is_none());

        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic dXNlcjpwdw=="))
            .to_http_request();
        assert!(bearer_token(&req).is_none());

        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer "))
            .to_http_request();
        assert!(bearer_token(&req).is_none());
    }
}
