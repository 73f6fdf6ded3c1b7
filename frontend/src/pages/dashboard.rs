use yew::prelude::*;
use yew_router::prelude::*;

use shared::models::Project;

use crate::router::Route;
use crate::services::api::ApiService;
use crate::session::use_session;

#[function_component(Dashboard)]
pub fn dashboard() -> Html {
    let session = use_session();
    let projects = use_state(Vec::<Project>::new);
    let loading = use_state(|| true);

    {
        let projects = projects.clone();
        let loading = loading.clone();
        let authenticated = session.is_authenticated();

        use_effect_with(authenticated, move |authenticated| {
            if *authenticated {
                wasm_bindgen_futures::spawn_local(async move {
                    match ApiService::list_projects().await {
                        Ok(list) => {
                            projects.set(list);
                            loading.set(false);
                        }
                        Err(e) => {
                            tracing::error!("Failed to fetch projects: {:?}", e);
                            loading.set(false);
                        }
                    }
                });
            }
            || ()
        });
    }

    let Some(user) = session.user() else {
        return html! {
            <div class="container">
                <h2>{ "Dashboard" }</h2>
                <p>
                    { "You need to " }
                    <Link<Route> to={Route::Login}>{ "log in" }</Link<Route>>
                    { " to see your dashboard." }
                </p>
            </div>
        };
    };

    html! {
        <div class="container">
            <h2>{ format!("Welcome back, {}", user.name) }</h2>
            if *loading {
                <div class="loading">
                    <div class="spinner"></div>
                </div>
            } else if projects.is_empty() {
                <div class="empty-state">
                    <p>{ "No projects yet." }</p>
                </div>
            } else {
                <ul class="project-list">
                    { for projects.iter().map(|project| html! {
                        <li key={project.id.to_string()}>
                            <span class="project-title">{ &project.title }</span>
                            <span class="project-owner">{ &project.client_email }</span>
                        </li>
                    })}
                </ul>
            }
        </div>
    }
}
