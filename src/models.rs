use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct RegisterReq {
    #[schema(example = "manager1")]
    pub username: String,
    #[schema(example = "s3cret")]
    pub password: String,
    /// 1 = Admin, 2 = Manager
    #[schema(example = 2)]
    pub role_id: u8,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginReq {
    #[schema(example = "manager1")]
    pub username: String,
    #[schema(example = "s3cret")]
    pub password: String,
}

#[derive(FromRow)]
pub struct UserRow {
    pub id: u64, // BIGINT UNSIGNED
    pub username: String,
    pub password: String,
    pub role_id: u8,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    pub sub: String,
    pub role: u8, // role id
    pub exp: usize,
    pub jti: String,

    pub token_type: TokenType,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub enum TokenType {
    Access,
    Refresh,
}
