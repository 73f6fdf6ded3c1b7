use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use shared::api::AuthRelayMessage;

use crate::auth::relay;
use crate::router::Route;
use crate::session::use_session;

#[function_component(Login)]
pub fn login() -> Html {
    let session = use_session();
    let navigator = use_navigator().expect("navigator should be available inside the router");
    let email = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let busy = use_state(|| false);

    // Subscribe to popup relay messages for the lifetime of this page
    {
        let session = session.clone();
        let navigator = navigator.clone();
        let error = error.clone();
        use_effect_with((), move |_| {
            let window = gloo::utils::window();
            let callback = Callback::from(move |message: AuthRelayMessage| match message {
                AuthRelayMessage::Success {
                    id_token,
                    access_token,
                } => {
                    let session = session.clone();
                    let navigator = navigator.clone();
                    let error = error.clone();
                    wasm_bindgen_futures::spawn_local(async move {
                        match session.complete_google_sign_in(id_token, access_token).await {
                            Ok(()) => navigator.push(&Route::Dashboard),
                            Err(e) => error.set(Some(e)),
                        }
                    });
                }
                AuthRelayMessage::Error { error: reason } => {
                    error.set(Some(reason));
                }
            });

            let listener = relay::listen(&window, callback);
            move || drop(listener)
        });
    }

    let on_email = {
        let email = email.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            email.set(input.value());
        })
    };

    let on_password = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            password.set(input.value());
        })
    };

    let onsubmit = {
        let session = session.clone();
        let navigator = navigator.clone();
        let email = email.clone();
        let password = password.clone();
        let error = error.clone();
        let busy = busy.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *busy {
                return;
            }

            let session = session.clone();
            let navigator = navigator.clone();
            let email = (*email).clone();
            let password = (*password).clone();
            let error = error.clone();
            let busy = busy.clone();
            busy.set(true);
            wasm_bindgen_futures::spawn_local(async move {
                match session.login(&email, &password).await {
                    Ok(()) => navigator.push(&Route::Dashboard),
                    Err(e) => error.set(Some(e)),
                }
                busy.set(false);
            });
        })
    };

    let on_google = {
        let error = error.clone();
        Callback::from(move |_: MouseEvent| {
            let window = gloo::utils::window();
            match relay::sign_in_url(&window) {
                Some(url) => {
                    if !relay::open_popup(&window, &url) {
                        error.set(Some("Sign-in popup was blocked".to_string()));
                    }
                }
                None => error.set(Some("Google sign-in is not configured".to_string())),
            }
        })
    };

    html! {
        <div class="container auth-form">
            <h2>{ "Log in" }</h2>
            if let Some(message) = &*error {
                <div class="form-error">{ message.clone() }</div>
            }
            <form {onsubmit}>
                <label>
                    { "Email" }
                    <input type="email" value={(*email).clone()} oninput={on_email} required=true />
                </label>
                <label>
                    { "Password" }
                    <input type="password" value={(*password).clone()} oninput={on_password} required=true />
                </label>
                <button type="submit" disabled={*busy}>{ "Log in" }</button>
            </form>
            <button class="google-signin" onclick={on_google}>
                { "Sign in with Google" }
            </button>
            <p>
                { "New here? " }
                <Link<Route> to={Route::Signup}>{ "Create an account" }</Link<Route>>
            </p>
        </div>
    }
}
