use anyhow::{bail, Result};
use kernel::model::notification::ReservationNotice;
use reqwest::Client;
use shared::config::MailConfig;

/// HTTP 経由でメールを送る薄いクライアント。
/// 送信 API は {from, to, subject, body} の JSON を受け付ける想定
pub struct MailClient {
    client: Client,
    endpoint: String,
    token: String,
    sender: String,
}

impl MailClient {
    pub fn new(cfg: &MailConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: cfg.endpoint.clone(),
            token: cfg.token.clone(),
            sender: cfg.sender.clone(),
        }
    }

    pub async fn send_reservation_reminder(&self, notice: &ReservationNotice) -> Result<()> {
        let subject = format!("{} の予約のお知らせ", notice.device_name);
        let body_text = format!(
            "{} の予約開始が近づいています。\n\
            予約時間：{} 〜 {}\n\
            目的：{}\n\
            開始前に準備をお願いします。",
            notice.device_name,
            notice.start_time.format("%Y-%m-%d %H:%M:%S"),
            notice.end_time.format("%Y-%m-%d %H:%M:%S"),
            notice.reason,
        );

        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({
                "from": self.sender,
                "to": notice.recipient,
                "subject": subject,
                "body": body_text,
            }))
            .send()
            .await?;

        if !res.status().is_success() {
            bail!("mail API returned {}: {}", res.status(), res.text().await?);
        }

        Ok(())
    }
}
