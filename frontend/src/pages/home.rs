use yew::prelude::*;
use yew_router::prelude::*;

use crate::router::Route;
use crate::session::use_session;

#[function_component(Home)]
pub fn home() -> Html {
    let session = use_session();

    html! {
        <div class="container">
            <h2>{ "Find the right freelancer for your project" }</h2>
            <p>{ "Post a project, collect bids, and confirm the one that fits." }</p>
            if session.is_authenticated() {
                <Link<Route> to={Route::Dashboard} classes="button">{ "Go to dashboard" }</Link<Route>>
            } else {
                <Link<Route> to={Route::Signup} classes="button">{ "Get started" }</Link<Route>>
            }
        </div>
    }
}
