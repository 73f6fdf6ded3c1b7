use gloo::timers::callback::Timeout;
use serde::Deserialize;
use web_sys::AbortController;
use yew::prelude::*;
use yew_router::prelude::*;

use shared::models::BidAction;

use crate::router::Route;
use crate::services::api::ApiService;

const REDIRECT_DELAY_MS: u32 = 3_000;
pub const INVALID_LINK_MESSAGE: &str = "Invalid confirmation link";

/// Outcome of resolving a confirmation link. Terminal states never
/// transition again within one page load.
#[derive(Clone, PartialEq)]
enum ConfirmationState {
    Pending,
    Succeeded(String),
    Failed(String),
}

#[derive(Debug, Deserialize)]
struct ActionQuery {
    action: Option<String>,
}

/// Validate the path and query parameters of a confirmation link before
/// any network activity.
fn parse_confirmation_params(
    project_id: &str,
    bid_id: &str,
    action: Option<&str>,
) -> Option<(String, String, BidAction)> {
    if project_id.trim().is_empty() || bid_id.trim().is_empty() {
        return None;
    }
    let action = action?.parse::<BidAction>().ok()?;

    Some((project_id.to_string(), bid_id.to_string(), action))
}

#[derive(Properties, PartialEq)]
pub struct BidConfirmationProps {
    pub project_id: String,
    pub bid_id: String,
}

/// Landing page for emailed bid confirmation links.
///
/// Resolves the link's action exactly once per page load, renders the
/// terminal outcome, and on success navigates to the dashboard after a
/// short delay. The redirect timer and the in-flight request are both
/// cancelled if the page unmounts first.
#[function_component(BidConfirmationPage)]
pub fn bid_confirmation(props: &BidConfirmationProps) -> Html {
    let state = use_state(|| ConfirmationState::Pending);
    let navigator = use_navigator().expect("navigator should be available inside the router");
    let location = use_location();
    let redirect_timer = use_mut_ref(|| None::<Timeout>);

    let action = location
        .and_then(|l| l.query::<ActionQuery>().ok())
        .and_then(|q| q.action);

    {
        let state = state.clone();
        let navigator = navigator.clone();
        let redirect_timer = redirect_timer.clone();
        use_effect_with(
            (props.project_id.clone(), props.bid_id.clone(), action),
            move |(project_id, bid_id, action)| {
                let controller = AbortController::new().ok();
                let signal = controller.as_ref().map(|c| c.signal());

                match parse_confirmation_params(project_id, bid_id, action.as_deref()) {
                    None => state.set(ConfirmationState::Failed(INVALID_LINK_MESSAGE.to_string())),
                    Some((project_id, bid_id, action)) => {
                        let redirect_timer = redirect_timer.clone();
                        wasm_bindgen_futures::spawn_local(async move {
                            let result = ApiService::respond_to_bid(
                                &project_id,
                                &bid_id,
                                action,
                                signal.as_ref(),
                            )
                            .await;

                            match result {
                                Ok(outcome) => {
                                    state.set(ConfirmationState::Succeeded(outcome.message));
                                    let timer = Timeout::new(REDIRECT_DELAY_MS, move || {
                                        navigator.push(&Route::Dashboard);
                                    });
                                    *redirect_timer.borrow_mut() = Some(timer);
                                }
                                Err(err) => {
                                    state.set(ConfirmationState::Failed(err.message()));
                                }
                            }
                        });
                    }
                }

                move || {
                    if let Some(controller) = controller {
                        controller.abort();
                    }
                    redirect_timer.borrow_mut().take();
                }
            },
        );
    }

    html! {
        <div class="container">
            {
                match &*state {
                    ConfirmationState::Pending => html! {
                        <div class="loading">
                            <div class="spinner"></div>
                            <p>{ "Processing your response" }</p>
                        </div>
                    },
                    ConfirmationState::Succeeded(message) => html! {
                        <div class="confirmation success">
                            <h2>{ message.clone() }</h2>
                            <p>{ "Taking you to your dashboard." }</p>
                        </div>
                    },
                    ConfirmationState::Failed(message) => html! {
                        <div class="confirmation error">
                            <h2>{ message.clone() }</h2>
                            <Link<Route> to={Route::Dashboard} classes="button">
                                { "Go to dashboard" }
                            </Link<Route>>
                        </div>
                    },
                }
            }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_params_accepted() {
        let parsed = parse_confirmation_params("P1", "B1", Some("confirm"))
            .expect("should accept valid params");
        assert_eq!(parsed.2, BidAction::Confirm);

        let parsed = parse_confirmation_params("P1", "B1", Some("decline"))
            .expect("should accept decline");
        assert_eq!(parsed.2, BidAction::Decline);
    }

    #[test]
    fn test_missing_ids_rejected() {
        assert!(parse_confirmation_params("", "B1", Some("confirm")).is_none());
        assert!(parse_confirmation_params("P1", "", Some("confirm")).is_none());
        assert!(parse_confirmation_params("  ", "B1", Some("confirm")).is_none());
    }

    #[test]
    fn test_unknown_action_rejected() {
        assert!(parse_confirmation_params("P1", "B1", None).is_none());
        assert!(parse_confirmation_params("P1", "B1", Some("approve")).is_none());
        assert!(parse_confirmation_params("P1", "B1", Some("")).is_none());
    }
}
