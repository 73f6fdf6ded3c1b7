//! Application-wide session state.
//!
//! The session lives in an explicit context owned by the top of the view
//! tree; `is_authenticated` is derived from the presence of a user, so the
//! two can never disagree. State changes happen as single dispatches when
//! an operation completes, never as partial updates, so overlapping calls
//! resolve to the last completed one.

use std::rc::Rc;
use yew::prelude::*;

use shared::models::{Role, SessionUser};

use crate::services::api::ApiService;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SessionState {
    user: Option<SessionUser>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

pub enum SessionAction {
    SignedIn(SessionUser),
    SignedOut,
}

impl Reducible for SessionState {
    type Action = SessionAction;

    fn reduce(self: Rc<Self>, action: SessionAction) -> Rc<Self> {
        match action {
            SessionAction::SignedIn(user) => Rc::new(SessionState { user: Some(user) }),
            SessionAction::SignedOut => Rc::new(SessionState { user: None }),
        }
    }
}

/// Handle to the session context: read access plus the lifecycle
/// operations. Cheap to clone.
#[derive(Clone, PartialEq)]
pub struct SessionHandle {
    state: UseReducerHandle<SessionState>,
}

impl SessionHandle {
    pub fn user(&self) -> Option<SessionUser> {
        self.state.user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(), String> {
        let user = ApiService::login(email, password)
            .await
            .map_err(|e| e.message())?;
        self.state.dispatch(SessionAction::SignedIn(user));
        Ok(())
    }

    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<(), String> {
        let user = ApiService::signup(name, email, password, role)
            .await
            .map_err(|e| e.message())?;
        self.state.dispatch(SessionAction::SignedIn(user));
        Ok(())
    }

    /// Finalize a popup sign-in from a relayed success message.
    pub async fn complete_google_sign_in(
        &self,
        id_token: String,
        access_token: Option<String>,
    ) -> Result<(), String> {
        let user = ApiService::google_session(id_token, access_token)
            .await
            .map_err(|e| e.message())?;
        self.state.dispatch(SessionAction::SignedIn(user));
        Ok(())
    }

    /// Clear the session. Idempotent: logging out while logged out leaves
    /// the state unchanged, and local state clears even if the server
    /// call fails.
    pub async fn logout(&self) {
        if let Err(e) = ApiService::logout().await {
            tracing::warn!("Logout request failed: {}", e.message());
        }
        self.state.dispatch(SessionAction::SignedOut);
    }
}

#[derive(Properties, PartialEq)]
pub struct SessionProviderProps {
    #[prop_or_default]
    pub children: Html,
}

#[function_component(SessionProvider)]
pub fn session_provider(props: &SessionProviderProps) -> Html {
    let state = use_reducer(SessionState::default);
    let handle = SessionHandle { state };

    // Restore a cookie-backed session once on startup
    {
        let handle = handle.clone();
        use_effect_with((), move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                if let Ok(user) = ApiService::me().await {
                    handle.state.dispatch(SessionAction::SignedIn(user));
                }
            });
            || ()
        });
    }

    html! {
        <ContextProvider<SessionHandle> context={handle}>
            { props.children.clone() }
        </ContextProvider<SessionHandle>>
    }
}

/// Access the session context.
///
/// Panics when called outside a [`SessionProvider`] subtree; that is a
/// programming error, not a recoverable condition.
#[hook]
pub fn use_session() -> SessionHandle {
    use_context::<SessionHandle>().expect("use_session must be called inside a SessionProvider")
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user() -> SessionUser {
        SessionUser {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: "user@example.com".to_string(),
            role: Role::Client,
        }
    }

    fn reduce(state: SessionState, action: SessionAction) -> SessionState {
        Rc::unwrap_or_clone(Rc::new(state).reduce(action))
    }

    #[test]
    fn test_authenticated_iff_user_present() {
        let state = SessionState::default();
        assert!(!state.is_authenticated());

        let state = reduce(state, SessionAction::SignedIn(user()));
        assert!(state.is_authenticated());
        assert!(state.user.is_some());

        let state = reduce(state, SessionAction::SignedOut);
        assert!(!state.is_authenticated());
        assert!(state.user.is_none());
    }

    #[test]
    fn test_sign_out_is_idempotent() {
        let state = reduce(SessionState::default(), SessionAction::SignedOut);
        assert_eq!(state, SessionState::default());

        let state = reduce(state, SessionAction::SignedOut);
        assert_eq!(state, SessionState::default());
    }

    #[test]
    fn test_last_sign_in_wins() {
        let first = user();
        let second = user();

        let state = reduce(SessionState::default(), SessionAction::SignedIn(first));
        let state = reduce(state, SessionAction::SignedIn(second.clone()));
        assert_eq!(state.user, Some(second));
    }
}
