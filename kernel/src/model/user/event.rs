use crate::model::{id::UserId, role::Role};

#[derive(Debug)]
pub struct CreateUser {
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub security_pin: String,
}

// ユーザー自身による設定変更。指定されたフィールドのみ更新する
#[derive(Debug)]
pub struct UpdateUserProfile {
    pub user_id: UserId,
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub security_pin: Option<String>,
}

#[derive(Debug)]
pub struct UpdateUserRole {
    pub user_id: UserId,
    pub role: Role,
}

#[derive(Debug)]
pub struct DeleteUser {
    pub user_id: UserId,
}
