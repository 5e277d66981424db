use crate::model::{
    auth::{event::CreateToken, AccessToken},
    id::UserId,
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait AuthRepository: Send + Sync {
    // アクセストークンからユーザー ID を引く
    async fn fetch_user_id_from_token(
        &self,
        access_token: &AccessToken,
    ) -> AppResult<Option<UserId>>;
    // パスワードとセキュリティ PIN を検証してトークンを発行する
    async fn create_token(&self, event: CreateToken) -> AppResult<AccessToken>;
    // ログアウト時にトークンを破棄する
    async fn delete_token(&self, access_token: AccessToken) -> AppResult<()>;
}
