pub mod event;

/// Redis に保存するアクセストークン。Bearer ヘッダでやり取りする
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(pub String);
