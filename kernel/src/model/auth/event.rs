use derive_new::new;

/// ログイン要求。パスワードとセキュリティ PIN の両方を検証する
#[derive(new)]
pub struct CreateToken {
    pub user_name: String,
    pub password: String,
    pub security_pin: String,
}
