//! Vertical icon bar shown on every signed-in page

use crate::routes::paths::Route;
use crate::shared::icons::icon;
use crate::system::session::UserType;
use leptos::prelude::*;

#[component]
pub fn Sidebar(user_type: UserType, active: Signal<Route>) -> impl IntoView {
    let bills_active = move || matches!(active.get(), Route::Bills | Route::NewBill);

    view! {
        <div class="vertical-navbar">
            <div class="vertical-navbar__logo">{"Billed"}</div>
            {(user_type == UserType::Employee).then(|| view! {
                <div
                    id="layout-icon1"
                    data-testid="icon-window"
                    class="vertical-navbar__icon"
                    class:active-icon=bills_active
                >
                    {icon("window")}
                </div>
                <div
                    id="layout-icon2"
                    data-testid="icon-mail"
                    class="vertical-navbar__icon"
                    class:active-icon=move || !bills_active()
                >
                    {icon("mail")}
                </div>
            })}
        </div>
    }
}
