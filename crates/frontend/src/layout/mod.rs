pub mod left;

use leptos::prelude::*;

/// Application shell: vertical icon bar on the left, page content on the right
#[component]
pub fn Shell<L, C>(left: L, center: C) -> impl IntoView
where
    L: Fn() -> AnyView + 'static + Send,
    C: Fn() -> AnyView + 'static + Send,
{
    view! {
        <div class="app-layout">
            <div class="app-body">
                <div data-zone="left" class="left">
                    {left()}
                </div>
                <div class="app-main">
                    {center()}
                </div>
            </div>
        </div>
    }
}
