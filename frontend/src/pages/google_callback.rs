use gloo::timers::callback::Timeout;
use yew::prelude::*;

use shared::api::AuthRelayMessage;

use crate::auth::relay::{parse_fragment, OpenerChannel};

const SUCCESS_CLOSE_DELAY_MS: u32 = 500;
const ERROR_CLOSE_DELAY_MS: u32 = 2_000;

/// Popup-side endpoint of the Google sign-in flow.
///
/// Runs once per popup lifetime: parses the redirect fragment, posts the
/// relay message to the opener, then closes the window. The message is
/// always sent before the close timer is armed, and the timer is dropped
/// (cancelled) if the component unmounts first.
#[function_component(GoogleCallback)]
pub fn google_callback() -> Html {
    let failed = use_state(|| false);

    {
        let failed = failed.clone();
        use_effect_with((), move |_| {
            let window = gloo::utils::window();
            let fragment = window.location().hash().unwrap_or_default();
            let message = parse_fragment(&fragment);
            let is_error = matches!(message, AuthRelayMessage::Error { .. });
            failed.set(is_error);

            // No opener means nothing to relay; the window still closes.
            if let Some(channel) = OpenerChannel::connect(&window) {
                channel.send(&message);
            } else {
                tracing::warn!("Sign-in window has no opener, skipping relay");
            }

            let delay = if is_error {
                ERROR_CLOSE_DELAY_MS
            } else {
                SUCCESS_CLOSE_DELAY_MS
            };
            let close_timer = Timeout::new(delay, move || {
                let _ = window.close();
            });

            move || drop(close_timer)
        });
    }

    html! {
        <div class="container">
            if *failed {
                <h2>{ "Sign-in didn't complete" }</h2>
                <p>{ "You can close this window and try again." }</p>
            } else {
                <h2>{ "Completing sign-in" }</h2>
                <p>{ "This window will close itself." }</p>
            }
        </div>
    }
}
