use yew::prelude::*;
use yew_router::prelude::*;

use crate::router::Route;
use crate::session::use_session;

#[function_component(Header)]
pub fn header() -> Html {
    let session = use_session();

    let on_logout = {
        let session = session.clone();
        Callback::from(move |_: MouseEvent| {
            let session = session.clone();
            wasm_bindgen_futures::spawn_local(async move {
                session.logout().await;
            });
        })
    };

    html! {
        <header class="header">
            <div class="container">
                <h1>{ "GigLink" }</h1>
                <nav>
                    <Link<Route> to={Route::Home}>{ "Home" }</Link<Route>>
                    { " | " }
                    if let Some(user) = session.user() {
                        <Link<Route> to={Route::Dashboard}>{ "Dashboard" }</Link<Route>>
                        { " | " }
                        <span class="user-name">{ user.name }</span>
                        <button class="link-button" onclick={on_logout}>{ "Log out" }</button>
                    } else {
                        <Link<Route> to={Route::Login}>{ "Log in" }</Link<Route>>
                        { " | " }
                        <Link<Route> to={Route::Signup}>{ "Sign up" }</Link<Route>>
                    }
                </nav>
            </div>
        </header>
    }
}
