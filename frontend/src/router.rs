use yew::prelude::*;
use yew_router::prelude::*;

use crate::pages::{
    bid_confirmation::BidConfirmationPage, dashboard::Dashboard, google_callback::GoogleCallback,
    home::Home, login::Login, not_found::NotFound, signup::Signup,
};

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/login")]
    Login,
    #[at("/signup")]
    Signup,
    #[at("/dashboard")]
    Dashboard,
    #[at("/auth/google/callback")]
    GoogleCallback,
    #[at("/project/:project_id/bid/:bid_id")]
    BidConfirmation { project_id: String, bid_id: String },
    #[not_found]
    #[at("/404")]
    NotFound,
}

pub fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => html! { <Home /> },
        Route::Login => html! { <Login /> },
        Route::Signup => html! { <Signup /> },
        Route::Dashboard => html! { <Dashboard /> },
        Route::GoogleCallback => html! { <GoogleCallback /> },
        Route::BidConfirmation { project_id, bid_id } => html! {
            <BidConfirmationPage {project_id} {bid_id} />
        },
        Route::NotFound => html! { <NotFound /> },
    }
}
