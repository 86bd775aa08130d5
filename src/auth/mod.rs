pub mod cookie;
pub mod policy;
pub mod token;

pub use policy::{authorize_admin, AdminGrant};
pub use token::{Claims, TokenCodec};
