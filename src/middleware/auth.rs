use actix_web::{
    dev::Payload, error::InternalError, web, Error, FromRequest, HttpRequest, HttpResponse,
};
use futures::future::LocalBoxFuture;

use crate::services::firebase::{TokenClaims, TokenVerifier};

/// Caller identity verified from `Authorization: Bearer <token>`.
///
/// Declaring this extractor on a handler is what marks a route as
/// auth-required; routes without it stay public. Any missing header, wrong
/// scheme, or verification failure short-circuits the request with
/// `401 {"message": "unauthorized"}` — failure is terminal, no retry.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub claims: TokenClaims,
}

impl AuthenticatedUser {
    /// Verified email, falling back to the subject uid for logging
    pub fn email(&self) -> &str {
        self.claims.email.as_deref().unwrap_or(&self.claims.sub)
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get("Authorization")?.to_str().ok()?;
    header.strip_prefix("Bearer ").map(|token| token.to_string())
}

fn unauthorized() -> Error {
    let response =
        HttpResponse::Unauthorized().json(serde_json::json!({ "message": "unauthorized" }));
    InternalError::from_response("unauthorized", response).into()
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let verifier = req.app_data::<web::Data<dyn TokenVerifier>>().cloned();
        let token = bearer_token(req);
        let path = req.path().to_string();

        Box::pin(async move {
            let verifier = verifier.ok_or_else(|| {
                log::error!("❌ {} - no token verifier configured", path);
                unauthorized()
            })?;

            let token = token.ok_or_else(unauthorized)?;

            match verifier.verify(&token).await {
                Ok(claims) => Ok(AuthenticatedUser { claims }),
                Err(e) => {
                    log::warn!("⚠️ {} - token rejected: {}", path, e);
                    Err(unauthorized())
                }
            }
        })
    }
}
