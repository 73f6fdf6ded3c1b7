//! Cross-window relay channel for the Google sign-in popup.
//!
//! The popup lands on our callback route with the provider's response in
//! the URL fragment. It parses the fragment into a typed message, posts
//! that message to the window that opened it (restricted to our own
//! origin), and closes itself. The opener subscribes through [`listen`],
//! which drops messages from any other origin.

use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{MessageEvent, Window};

use shared::api::AuthRelayMessage;

pub const NO_ID_TOKEN_ERROR: &str = "No ID token received";

const GOOGLE_CLIENT_ID: Option<&str> = option_env!("GOOGLE_CLIENT_ID");
const POPUP_NAME: &str = "giglink-google-signin";
const POPUP_FEATURES: &str = "popup,width=480,height=640";

/// Parse an OAuth redirect fragment into a relay message.
///
/// The fragment is a set of URL-encoded key/value pairs; a non-empty
/// `id_token` marks the exchange as successful, anything else is the
/// missing-token error.
pub fn parse_fragment(fragment: &str) -> AuthRelayMessage {
    let mut id_token = None;
    let mut access_token = None;

    for pair in fragment.trim_start_matches('#').split('&') {
        let mut parts = pair.splitn(2, '=');
        let key = parts.next().unwrap_or("");
        let raw = parts.next().unwrap_or("");
        let value = urlencoding::decode(raw)
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| raw.to_string());

        match key {
            "id_token" if !value.is_empty() => id_token = Some(value),
            "access_token" if !value.is_empty() => access_token = Some(value),
            _ => {}
        }
    }

    match id_token {
        Some(id_token) => AuthRelayMessage::Success {
            id_token,
            access_token,
        },
        None => AuthRelayMessage::Error {
            error: NO_ID_TOKEN_ERROR.to_string(),
        },
    }
}

/// Channel from a popup back to the window that opened it.
pub struct OpenerChannel {
    opener: Window,
    origin: String,
}

impl OpenerChannel {
    /// Connect to the opener, if any. A window opened directly has no
    /// opener and cannot complete the handshake; callers treat `None` as
    /// a silent no-op.
    pub fn connect(window: &Window) -> Option<Self> {
        let opener = window.opener().ok()?;
        if opener.is_null() || opener.is_undefined() {
            return None;
        }
        let opener: Window = opener.dyn_into().ok()?;
        let origin = window.location().origin().ok()?;

        Some(Self { opener, origin })
    }

    /// Post one relay message to the opener, restricted to our own origin.
    /// Single delivery attempt; a failed post is logged and dropped.
    pub fn send(&self, message: &AuthRelayMessage) {
        let payload = match serde_json::to_string(message) {
            Ok(p) => p,
            Err(e) => {
                tracing::error!("Failed to encode relay message: {}", e);
                return;
            }
        };

        match js_sys::JSON::parse(&payload) {
            Ok(value) => {
                if self.opener.post_message(&value, &self.origin).is_err() {
                    tracing::warn!("Failed to post relay message to opener");
                }
            }
            Err(_) => tracing::error!("Failed to build relay message payload"),
        }
    }
}

/// Subscribe to relay messages arriving on `window`.
///
/// Messages from other origins or with unrecognized shapes are ignored.
/// The subscription ends when the returned listener is dropped.
pub fn listen(window: &Window, callback: yew::Callback<AuthRelayMessage>) -> EventListener {
    let origin = window.location().origin().unwrap_or_default();

    EventListener::new(window, "message", move |event| {
        let event = match event.dyn_ref::<MessageEvent>() {
            Some(e) => e,
            None => return,
        };
        if event.origin() != origin {
            return;
        }

        let text = match js_sys::JSON::stringify(&event.data()) {
            Ok(s) => match s.as_string() {
                Some(t) => t,
                None => return,
            },
            Err(_) => return,
        };

        if let Ok(message) = serde_json::from_str::<AuthRelayMessage>(&text) {
            callback.emit(message);
        }
    })
}

/// Build the provider sign-in URL for the popup, if a client id was
/// configured at build time.
pub fn sign_in_url(window: &Window) -> Option<String> {
    let client_id = GOOGLE_CLIENT_ID?;
    let origin = window.location().origin().ok()?;
    let nonce = uuid::Uuid::new_v4().to_string();

    Some(build_sign_in_url(client_id, &origin, &nonce))
}

fn build_sign_in_url(client_id: &str, origin: &str, nonce: &str) -> String {
    let redirect_uri = format!("{}/auth/google/callback", origin);

    format!(
        "https://accounts.google.com/o/oauth2/v2/auth?\
         client_id={}&\
         redirect_uri={}&\
         response_type={}&\
         scope={}&\
         prompt=select_account&\
         nonce={}",
        urlencoding::encode(client_id),
        urlencoding::encode(&redirect_uri),
        urlencoding::encode("id_token token"),
        urlencoding::encode("openid email profile"),
        nonce
    )
}

/// Open the provider sign-in popup. Returns false when the browser
/// blocked it.
pub fn open_popup(window: &Window, url: &str) -> bool {
    window
        .open_with_url_and_target_and_features(url, POPUP_NAME, POPUP_FEATURES)
        .ok()
        .flatten()
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_with_both_tokens() {
        let message = parse_fragment("#id_token=abc123&access_token=xyz");
        assert_eq!(
            message,
            AuthRelayMessage::Success {
                id_token: "abc123".to_string(),
                access_token: Some("xyz".to_string()),
            }
        );
    }

    #[test]
    fn test_fragment_without_access_token() {
        let message = parse_fragment("id_token=abc123");
        assert_eq!(
            message,
            AuthRelayMessage::Success {
                id_token: "abc123".to_string(),
                access_token: None,
            }
        );
    }

    #[test]
    fn test_fragment_missing_id_token_is_error() {
        for fragment in ["", "#", "#access_token=xyz", "#id_token=", "#foo=bar"] {
            let message = parse_fragment(fragment);
            assert_eq!(
                message,
                AuthRelayMessage::Error {
                    error: NO_ID_TOKEN_ERROR.to_string(),
                },
                "fragment {:?} should be an error",
                fragment
            );
        }
    }

    #[test]
    fn test_fragment_values_are_url_decoded() {
        let message = parse_fragment("#id_token=a%2Fb%3Dc");
        assert_eq!(
            message,
            AuthRelayMessage::Success {
                id_token: "a/b=c".to_string(),
                access_token: None,
            }
        );
    }

    #[test]
    fn test_sign_in_url_targets_callback_route() {
        let url = build_sign_in_url("client-1", "https://app.example.com", "nonce-1");
        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=client-1"));
        assert!(url.contains(&urlencoding::encode("https://app.example.com/auth/google/callback").into_owned()));
        assert!(url.contains("response_type=id_token%20token"));
        assert!(url.contains("nonce=nonce-1"));
    }
}
