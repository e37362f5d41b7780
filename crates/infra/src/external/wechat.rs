//! WeChat mini-program login exchange (`jscode2session`).

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use storefront_auth::{Identity, IdentityError, IdentityProvider};

use crate::config::WxConfig;

const JSCODE2SESSION_PATH: &str = "/sns/jscode2session";

/// Raw `jscode2session` answer. Success carries `openid`/`session_key`;
/// failure carries a non-zero `errcode`.
#[derive(Debug, Default, Deserialize)]
struct SessionResponse {
    #[serde(default)]
    openid: String,
    #[serde(default)]
    session_key: String,
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

impl SessionResponse {
    fn into_identity(self) -> Result<Identity, IdentityError> {
        if self.errcode != 0 {
            return Err(IdentityError::Rejected {
                code: self.errcode,
                message: self.errmsg,
            });
        }
        if self.openid.is_empty() {
            return Err(IdentityError::Rejected {
                code: 0,
                message: "response carried no openid".into(),
            });
        }
        Ok(Identity {
            open_id: self.openid,
            session_key: self.session_key,
        })
    }
}

#[derive(Debug, Clone)]
pub struct WeChatIdentityProvider {
    http_client: reqwest::Client,
    config: WxConfig,
}

impl WeChatIdentityProvider {
    pub fn new(config: WxConfig) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.config.api_base.trim_end_matches('/'),
            JSCODE2SESSION_PATH
        )
    }
}

#[async_trait]
impl IdentityProvider for WeChatIdentityProvider {
    #[instrument(skip(self, code), err)]
    async fn exchange(&self, code: &str) -> Result<Identity, IdentityError> {
        let response = self
            .http_client
            .get(self.endpoint())
            .query(&[
                ("appid", self.config.appid.as_str()),
                ("secret", self.config.secret.as_str()),
                ("js_code", code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| IdentityError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(%status, "jscode2session returned non-success status");
            return Err(IdentityError::Transport(format!("HTTP {status}")));
        }

        // The endpoint answers JSON with a text/plain content type.
        let body = response
            .text()
            .await
            .map_err(|e| IdentityError::Transport(e.to_string()))?;
        let parsed: SessionResponse = serde_json::from_str(&body)
            .map_err(|e| IdentityError::Transport(format!("unreadable response: {e}")))?;

        let identity = parsed.into_identity()?;
        info!("login code exchanged");
        Ok(identity)
    }
}
