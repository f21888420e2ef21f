use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::settings::Settings;
use crate::models::trade::{CloseTrade, NewTrade, Trade, TradeUpdate};
use crate::models::user::User;
use super::traits::{TradeStore, UserStore};

const STORE_NAME: &str = "RestBackend";

/// REST client for the journal backend (trades + users).
///
/// - **Trades**: `/trades/new`, `/trades/all{userId}`, `/trades/{id}`, `/trades/{id}/close`
/// - **Users**: `/user/new`, `/user`, `/user/{id}`
///
/// Responses are accepted either wrapped (`{"trade": {...}}`, `{"trades": [...]}`,
/// `{"user": {...}}`) or bare. A 404 maps to the matching not-found error.
pub struct RestBackend {
    client: Client,
    base_url: String,
}

impl RestBackend {
    pub fn new(settings: &Settings) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(settings.timeout_secs));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL with `segments` appended. Each segment is percent-encoded,
    /// so an id containing `/`, `?` or `#` stays a single path segment.
    fn url(&self, segments: &[&str]) -> Result<Url, CoreError> {
        let invalid = |reason: String| CoreError::Store {
            store: STORE_NAME.into(),
            message: format!("Invalid API base URL '{}': {reason}", self.base_url),
        };
        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("cannot be a base".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and decode a JSON body, mapping HTTP failures to `CoreError`.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
        not_found: CoreError,
    ) -> Result<T, CoreError> {
        let resp = Self::send_checked(request, what, not_found).await?;
        resp.json::<T>().await.map_err(|e| CoreError::Store {
            store: STORE_NAME.into(),
            message: format!("Failed to parse {what} response: {e}"),
        })
    }

    async fn send_checked(
        request: RequestBuilder,
        what: &str,
        not_found: CoreError,
    ) -> Result<reqwest::Response, CoreError> {
        let resp = request.send().await.inspect_err(|e| {
            log::warn!("{what}: request failed: {e}");
        })?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            log::debug!("{what}: not found");
            return Err(not_found);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            log::warn!("{what}: backend answered {status}");
            return Err(CoreError::Store {
                store: STORE_NAME.into(),
                message: format!("{what} failed with HTTP {}: {}", status.as_u16(), body.trim()),
            });
        }
        Ok(resp)
    }
}

// ── Backend response envelopes ──────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum TradeBody {
    Wrapped { trade: Trade },
    Bare(Trade),
}

impl TradeBody {
    fn into_inner(self) -> Trade {
        match self {
            TradeBody::Wrapped { trade } | TradeBody::Bare(trade) => trade,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TradesBody {
    Wrapped { trades: Vec<Trade> },
    Bare(Vec<Trade>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UserBody {
    Wrapped { user: User },
    Bare(User),
}

impl UserBody {
    fn into_inner(self) -> User {
        match self {
            UserBody::Wrapped { user } | UserBody::Bare(user) => user,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UsersBody {
    Wrapped { users: Vec<User> },
    Bare(Vec<User>),
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl TradeStore for RestBackend {
    fn name(&self) -> &str {
        STORE_NAME
    }

    async fn list_trades(&self, user_id: &str) -> Result<Vec<Trade>, CoreError> {
        // The backend route is `/trades/all:userId`, no separator.
        let all = format!("all{user_id}");
        let url = self.url(&["trades", all.as_str()])?;
        log::debug!("GET {url}");
        let body: TradesBody = self
            .send_json(
                self.client.get(url),
                "list trades",
                CoreError::UserNotFound(user_id.to_string()),
            )
            .await?;
        Ok(match body {
            TradesBody::Wrapped { trades } | TradesBody::Bare(trades) => trades,
        })
    }

    async fn get_trade(&self, trade_id: &str) -> Result<Trade, CoreError> {
        let url = self.url(&["trades", trade_id])?;
        log::debug!("GET {url}");
        let body: TradeBody = self
            .send_json(
                self.client.get(url),
                "get trade",
                CoreError::TradeNotFound(trade_id.to_string()),
            )
            .await?;
        Ok(body.into_inner())
    }

    async fn create_trade(&self, trade: &NewTrade) -> Result<Trade, CoreError> {
        let url = self.url(&["trades", "new"])?;
        log::debug!("POST {url} ({})", trade.script);
        let body: TradeBody = self
            .send_json(
                self.client.post(url).json(trade),
                "create trade",
                CoreError::UserNotFound(trade.user_id.clone()),
            )
            .await?;
        Ok(body.into_inner())
    }

    async fn update_trade(&self, trade_id: &str, update: &TradeUpdate) -> Result<Trade, CoreError> {
        let url = self.url(&["trades", trade_id])?;
        log::debug!("PUT {url}");
        let body: TradeBody = self
            .send_json(
                self.client.put(url).json(update),
                "update trade",
                CoreError::TradeNotFound(trade_id.to_string()),
            )
            .await?;
        Ok(body.into_inner())
    }

    async fn close_trade(&self, trade_id: &str, close: &CloseTrade) -> Result<Trade, CoreError> {
        let url = self.url(&["trades", trade_id, "close"])?;
        log::debug!("PUT {url} ({})", close.outcome);
        let body: TradeBody = self
            .send_json(
                self.client.put(url).json(close),
                "close trade",
                CoreError::TradeNotFound(trade_id.to_string()),
            )
            .await?;
        Ok(body.into_inner())
    }

    async fn delete_trade(&self, trade_id: &str) -> Result<(), CoreError> {
        let url = self.url(&["trades", trade_id])?;
        log::debug!("DELETE {url}");
        Self::send_checked(
            self.client.delete(url),
            "delete trade",
            CoreError::TradeNotFound(trade_id.to_string()),
        )
        .await?;
        Ok(())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl UserStore for RestBackend {
    fn name(&self) -> &str {
        STORE_NAME
    }

    async fn create_user(&self, user: &User) -> Result<User, CoreError> {
        let url = self.url(&["user", "new"])?;
        log::debug!("POST {url}");
        let body: UserBody = self
            .send_json(
                self.client.post(url).json(user),
                "create user",
                CoreError::UserNotFound(user.id.clone()),
            )
            .await?;
        Ok(body.into_inner())
    }

    async fn list_users(&self) -> Result<Vec<User>, CoreError> {
        let url = self.url(&["user"])?;
        log::debug!("GET {url}");
        let body: UsersBody = self
            .send_json(
                self.client.get(url),
                "list users",
                CoreError::Store {
                    store: STORE_NAME.into(),
                    message: "user listing endpoint not found".into(),
                },
            )
            .await?;
        Ok(match body {
            UsersBody::Wrapped { users } | UsersBody::Bare(users) => users,
        })
    }

    async fn get_user(&self, user_id: &str) -> Result<User, CoreError> {
        let url = self.url(&["user", user_id])?;
        log::debug!("GET {url}");
        let body: UserBody = self
            .send_json(
                self.client.get(url),
                "get user",
                CoreError::UserNotFound(user_id.to_string()),
            )
            .await?;
        Ok(body.into_inner())
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), CoreError> {
        let url = self.url(&["user", user_id])?;
        log::debug!("DELETE {url}");
        Self::send_checked(
            self.client.delete(url),
            "delete user",
            CoreError::UserNotFound(user_id.to_string()),
        )
        .await?;
        Ok(())
    }
}
