use lazy_static::lazy_static;
use log::debug;
use std::sync::PoisonError;
use tokio::time::{Duration, Instant};

// headers required according to https://scryfall.com/docs/api/
const USER_AGENT: &str = "setsheets/0.1";
const ACCEPT: &str = "*/*";
pub const SCRYFALL_COOLDOWN: Duration = Duration::from_millis(50);

// use a blocking mutex since we are only holding the lock to find out when we can call
lazy_static! {
    static ref LAST_SCRYFALL_CALL: std::sync::Mutex<Option<Instant>> = std::sync::Mutex::new(None);
}

pub struct ScryfallClient {
    client: reqwest::Client,
    cooldown: Duration,
}

impl ScryfallClient {
    pub fn new() -> Result<ScryfallClient, reqwest::Error> {
        ScryfallClient::with_cooldown(SCRYFALL_COOLDOWN)
    }

    pub fn with_cooldown(cooldown: Duration) -> Result<ScryfallClient, reqwest::Error> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(USER_AGENT),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(ACCEPT),
        );
        Ok(ScryfallClient {
            client: reqwest::Client::builder()
                .default_headers(headers)
                .build()?,
            cooldown,
        })
    }

    /// Reserves the next free call time and sleeps until it has come.
    async fn wait_turn(&self) {
        let next_call = {
            let mut last = LAST_SCRYFALL_CALL
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let now = Instant::now();
            let next = match *last {
                Some(l) if l + self.cooldown > now => l + self.cooldown,
                _ => now,
            };
            *last = Some(next);
            next
        };
        tokio::time::sleep_until(next_call).await;
    }

    pub async fn call(&self, uri: &str) -> Result<reqwest::Response, reqwest::Error> {
        self.call_with_query(uri, &[]).await
    }

    pub async fn call_with_query(
        &self,
        uri: &str,
        query: &[(&str, &str)],
    ) -> Result<reqwest::Response, reqwest::Error> {
        self.wait_turn().await;
        debug!("calling scryfall API: {} {:?}", uri, query);
        self.client.get(uri).query(query).send().await
    }

    pub async fn head(&self, uri: &str) -> Result<reqwest::Response, reqwest::Error> {
        self.wait_turn().await;
        debug!("calling scryfall API (HEAD): {}", uri);
        self.client.head(uri).send().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // one test only: the last call instant is shared by the whole process
    #[tokio::test(start_paused = true)]
    async fn calls_are_spaced_by_the_cooldown() {
        let cooldown = Duration::from_millis(50);
        let client = ScryfallClient::with_cooldown(cooldown).unwrap();

        let mut call_times = Vec::new();
        for _ in 0..4 {
            client.wait_turn().await;
            call_times.push(Instant::now());
        }
        for pair in call_times.windows(2) {
            assert!(pair[1] - pair[0] >= cooldown, "{:?}", pair[1] - pair[0]);
        }

        // after a long pause the next call goes out right away
        tokio::time::advance(Duration::from_millis(500)).await;
        let before = Instant::now();
        client.wait_turn().await;
        assert_eq!(Instant::now(), before);
        client.wait_turn().await;
        assert!(Instant::now() - before >= cooldown);
    }
}
