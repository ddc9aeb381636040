use crate::error::NotifierError;
use actix_web::HttpRequest;
use nettu_notifier_infra::NotifierContext;
use nettu_notifier_utils::secrets_match;

pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Only lets requests through that carry the admin secret code
pub fn protect_admin_route(req: &HttpRequest, ctx: &NotifierContext) -> Result<(), NotifierError> {
    let admin_key = match req.headers().get(ADMIN_KEY_HEADER) {
        Some(admin_key) => match admin_key.to_str() {
            Ok(admin_key) => admin_key,
            Err(_) => {
                return Err(NotifierError::Unauthorized(
                    "Malformed admin key provided".to_string(),
                ))
            }
        },
        None => {
            return Err(NotifierError::Unauthorized(format!(
                "Unable to find admin key in {} header",
                ADMIN_KEY_HEADER
            )))
        }
    };

    if secrets_match(&ctx.config.admin_secret_code, admin_key) {
        Ok(())
    } else {
        Err(NotifierError::Unauthorized(format!(
            "Invalid admin key provided in {} header",
            ADMIN_KEY_HEADER
        )))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::main]
    #[test]
    async fn accepts_valid_admin_key() {
        let mut ctx = NotifierContext::create_inmemory();
        ctx.config.admin_secret_code = "s3cr3t".into();

        let req = TestRequest::default()
            .insert_header((ADMIN_KEY_HEADER, "s3cr3t"))
            .to_http_request();
        assert!(protect_admin_route(&req, &ctx).is_ok());
    }

    #[actix_web::main]
    #[test]
    async fn rejects_missing_or_invalid_admin_key() {
        let mut ctx = NotifierContext::create_inmemory();
        ctx.config.admin_secret_code = "s3cr3t".into();

        let req = TestRequest::default().to_http_request();
        assert!(protect_admin_route(&req, &ctx).is_err());

        let req = TestRequest::default()
            .insert_header((ADMIN_KEY_HEADER, "guess"))
            .to_http_request();
        assert!(protect_admin_route(&req, &ctx).is_err());
    }
}
