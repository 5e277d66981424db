use kernel::model::id::UserId;

// 認証時にのみ使う資格情報の行。User には載せない
#[derive(sqlx::FromRow)]
pub struct UserCredentialRow {
    pub user_id: UserId,
    pub password_hash: String,
    pub security_pin_hash: String,
}
