use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;
use yew_router::prelude::*;

use shared::models::Role;

use crate::router::Route;
use crate::session::use_session;

#[function_component(Signup)]
pub fn signup() -> Html {
    let session = use_session();
    let navigator = use_navigator().expect("navigator should be available inside the router");
    let name = use_state(String::new);
    let email = use_state(String::new);
    let password = use_state(String::new);
    let role = use_state(|| Role::Client);
    let error = use_state(|| None::<String>);
    let busy = use_state(|| false);

    let on_name = {
        let name = name.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            name.set(input.value());
        })
    };

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

    let on_role = {
        let role = role.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            role.set(match select.value().as_str() {
                "freelancer" => Role::Freelancer,
                _ => Role::Client,
            });
        })
    };

    let onsubmit = {
        let session = session.clone();
        let navigator = navigator.clone();
        let name = name.clone();
        let email = email.clone();
        let password = password.clone();
        let role = role.clone();
        let error = error.clone();
        let busy = busy.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *busy {
                return;
            }

            let session = session.clone();
            let navigator = navigator.clone();
            let name = (*name).clone();
            let email = (*email).clone();
            let password = (*password).clone();
            let role = *role;
            let error = error.clone();
            let busy = busy.clone();
            busy.set(true);
            wasm_bindgen_futures::spawn_local(async move {
                match session.signup(&name, &email, &password, role).await {
                    Ok(()) => navigator.push(&Route::Dashboard),
                    Err(e) => error.set(Some(e)),
                }
                busy.set(false);
            });
        })
    };

    html! {
        <div class="container auth-form">
            <h2>{ "Create an account" }</h2>
            if let Some(message) = &*error {
                <div class="form-error">{ message.clone() }</div>
            }
            <form {onsubmit}>
                <label>
                    { "Name" }
                    <input type="text" value={(*name).clone()} oninput={on_name} required=true />
                </label>
                <label>
                    { "Email" }
                    <input type="email" value={(*email).clone()} oninput={on_email} required=true />
                </label>
                <label>
                    { "Password" }
                    <input type="password" value={(*password).clone()} oninput={on_password} required=true minlength="8" />
                </label>
                <label>
                    { "I want to" }
                    <select onchange={on_role}>
                        <option value="client" selected={*role == Role::Client}>{ "Hire freelancers" }</option>
                        <option value="freelancer" selected={*role == Role::Freelancer}>{ "Work as a freelancer" }</option>
                    </select>
                </label>
                <button type="submit" disabled={*busy}>{ "Sign up" }</button>
            </form>
            <p>
                { "Already have an account? " }
                <Link<Route> to={Route::Login}>{ "Log in" }</Link<Route>>
            </p>
        </div>
    }
}
