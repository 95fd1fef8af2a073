use crate::dashboards::d400_bill_review::filter::ExcludedAuthors;
use crate::dashboards::d400_bill_review::ui::BillReviewDashboard;
use crate::domain::a001_bill::api::HttpBillStore;
use crate::domain::a001_bill::store::BillStore;
use crate::domain::a001_bill::ui::list::BillsList;
use crate::domain::a001_bill::ui::new::NewBill;
use crate::layout::left::Sidebar;
use crate::layout::Shell;
use crate::routes::paths::{self, Navigate, Route};
use crate::system::session::{current_user, UserType};
use leptos::prelude::*;
use std::rc::Rc;

/// Route actually shown for `requested`, given who is signed in
pub fn resolve(requested: Route, user_type: Option<UserType>) -> Route {
    match (user_type, requested) {
        (None, _) => Route::Login,
        (Some(UserType::Employee), Route::Bills | Route::NewBill) => requested,
        (Some(UserType::Employee), _) => Route::Bills,
        (Some(UserType::Admin), _) => Route::Dashboard,
    }
}

fn current_hash() -> String {
    window().location().hash().unwrap_or_default()
}

#[component]
fn LoginNotice() -> impl IntoView {
    view! {
        <div class="page login-page" data-testid="login-page">
            <h1 class="header__title">{"Billed"}</h1>
            <p>{"Veuillez vous connecter pour accéder à vos notes de frais."}</p>
        </div>
    }
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    let user = current_user();
    let route = RwSignal::new(resolve(
        Route::from_path(&current_hash()),
        user.as_ref().map(|u| u.user_type),
    ));
    // bumped on every navigation so that navigating to the current route remounts the page
    let visit = RwSignal::new(0u32);

    let _ = window_event_listener(leptos::ev::hashchange, move |_| {
        let requested = Route::from_path(&current_hash());
        if requested != route.get_untracked() {
            route.set(resolve(requested, current_user().map(|u| u.user_type)));
        }
    });

    let Some(user) = user else {
        return view! { <LoginNotice /> }.into_any();
    };
    let user_type = user.user_type;
    let email = StoredValue::new(user.email.clone());

    let navigator = move || -> Navigate {
        Rc::new(move |path: &str| {
            log::debug!("navigate to {}", path);
            route.set(resolve(Route::from_path(path), Some(user_type)));
            visit.update(|v| *v += 1);
            if path != paths::LOGIN {
                let _ = window().location().set_hash(path);
            }
        })
    };

    let content = move || {
        visit.track();
        let store: Rc<dyn BillStore> = Rc::new(HttpBillStore::default());
        let email = email.get_value();
        match route.get() {
            Route::Bills => view! {
                <BillsList store=store on_navigate=navigator() />
            }.into_any(),
            Route::NewBill => view! {
                <NewBill store=store on_navigate=navigator() email=email />
            }.into_any(),
            Route::Dashboard => view! {
                <BillReviewDashboard
                    store=store
                    on_navigate=navigator()
                    excluded=ExcludedAuthors::for_reviewer(&email)
                />
            }.into_any(),
            Route::Login => view! { <LoginNotice /> }.into_any(),
        }
    };

    view! {
        <Shell
            left=move || view! { <Sidebar user_type=user_type active=route.into() /> }.into_any()
            center=move || content.into_any()
        />
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_without_session_goes_to_login() {
        assert_eq!(resolve(Route::Bills, None), Route::Login);
        assert_eq!(resolve(Route::Dashboard, None), Route::Login);
    }

    #[test]
    fn test_resolve_employee_routes() {
        let employee = Some(UserType::Employee);
        assert_eq!(resolve(Route::Bills, employee), Route::Bills);
        assert_eq!(resolve(Route::NewBill, employee), Route::NewBill);
        assert_eq!(resolve(Route::Dashboard, employee), Route::Bills);
        assert_eq!(resolve(Route::Login, employee), Route::Bills);
    }

    #[test]
    fn test_resolve_admin_always_lands_on_dashboard() {
        let admin = Some(UserType::Admin);
        assert_eq!(resolve(Route::Bills, admin), Route::Dashboard);
        assert_eq!(resolve(Route::Login, admin), Route::Dashboard);
    }
}
