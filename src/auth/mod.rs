pub mod claims;
pub mod gate;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use claims::{Claims, JwtClaims};
pub use gate::{authorize, extract_claims_from_context, require_classroom, require_school};
pub use jwt::JwtService;
pub use middleware::{AuthMiddleware, AuthenticatedUser};
