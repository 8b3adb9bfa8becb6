use actix_web::Error;
use actix_web::body::EitherBody;
use actix_web::body::MessageBody;
use actix_web::dev::ServiceRequest;
use actix_web::dev::ServiceResponse;
use actix_web::http::Method;
use actix_web::HttpMessage;
use actix_web::middleware::Next;
use actix_web::web;
use folio_auth::Claims;
use folio_auth::Crypto;
use folio_core::Failure;
use folio_core::Settings;

/// What a caller must present to reach a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Bearer,
}

#[derive(Debug, Clone)]
pub struct Rule {
    method: Method,
    path: &'static str,
    access: Access,
}

impl Rule {
    pub fn new(method: Method, path: &'static str, access: Access) -> Self {
        Self {
            method,
            path,
            access,
        }
    }
}

/// Per-route authentication requirements, consulted before routing.
/// A route with no rule requires a bearer token.
#[derive(Debug, Clone)]
pub struct Policy {
    rules: Vec<Rule>,
}

impl Policy {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }
    #[rustfmt::skip]
    pub fn from_settings(settings: &Settings) -> Self {
        let upload = match settings.upload_requires_auth {
            true  => Access::Bearer,
            false => Access::Public,
        };
        Self::new(vec![
            Rule::new(Method::GET,  "/test",        Access::Public),
            Rule::new(Method::GET,  "/health",      Access::Public),
            Rule::new(Method::POST, "/api/signup",  Access::Public),
            Rule::new(Method::POST, "/api/login",   Access::Public),
            Rule::new(Method::POST, "/api/upload",  upload),
            Rule::new(Method::POST, "/api/chat",    Access::Bearer),
        ])
    }
    pub fn access(&self, method: &Method, path: &str) -> Access {
        self.rules
            .iter()
            .find(|rule| &rule.method == method && rule.path == path)
            .map(|rule| rule.access)
            .unwrap_or(Access::Bearer)
    }
}

/// Claims for a request that passed the policy, `None` for public routes.
fn admit(req: &ServiceRequest) -> Result<Option<Claims>, Failure> {
    let policy = req
        .app_data::<web::Data<Policy>>()
        .ok_or_else(|| Failure::internal("route policy not configured"))?;
    match policy.access(req.method(), req.path()) {
        Access::Public => Ok(None),
        Access::Bearer => req
            .app_data::<web::Data<Crypto>>()
            .ok_or_else(|| Failure::internal("token service not configured"))
            .and_then(|crypto| folio_auth::authenticate(crypto, folio_auth::authorization(req.request())))
            .map(Some),
    }
}

/// Middleware applying the [`Policy`]. Verified claims are left in the
/// request extensions for handlers that need the caller's identity.
pub async fn gate<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, Error>
where
    B: MessageBody + 'static,
{
    match admit(&req) {
        Ok(Some(claims)) => {
            req.extensions_mut().insert(claims);
        }
        Ok(None) => {}
        Err(failure) => {
            log::debug!("{} {} refused: {}", req.method(), req.path(), failure);
            return Ok(req.error_response(failure).map_into_right_body());
        }
    }
    next.call(req).await.map(ServiceResponse::map_into_left_body)
}
