//! Role-specific dashboard pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each dashboard is a protected subtree behind [`RequireRole`]; a farmer
//! landing on `/supplier` is silently corrected to `/farmer` by the guard,
//! never shown an error page. The panels are entry points into the
//! role-specific resource views served by the backend.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;

use crate::components::nav_bar::NavBar;
use crate::components::route_guard::RequireRole;
use crate::net::types::Role;
use crate::session::state::SessionState;

/// Panel titles and blurbs for a role's dashboard.
fn dashboard_sections(role: Role) -> [(&'static str, &'static str); 3] {
    match role {
        Role::Farmer => [
            ("My Produce Listings", "Publish and price what your farm has to sell."),
            ("Incoming Orders", "Confirm, pack, and hand off consumer orders."),
            ("Equipment Rentals", "Rent machinery from suppliers or list your own."),
        ],
        Role::Supplier => [
            ("Supply Catalog", "Manage your seed, feed, and equipment listings."),
            ("Inventory", "Track stock levels across your catalog."),
            ("Wholesale Orders", "Fulfill farm orders and rental requests."),
        ],
        Role::Consumer | Role::Unknown => [
            ("Browse Produce", "Shop fresh produce straight from nearby farms."),
            ("My Orders", "Follow open orders and review past purchases."),
            ("Saved Farms", "Keep the growers you trust one tap away."),
        ],
    }
}

fn dashboard_body(role: Role) -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let welcome = move || {
        session
            .get()
            .user
            .map_or_else(|| "Welcome".to_owned(), |user| format!("Welcome, {}", user.username))
    };

    view! {
        <div class="dashboard-page">
            <NavBar/>
            <h2 class="dashboard-page__welcome">{welcome}</h2>
            <div class="dashboard-page__cards">
                {dashboard_sections(role)
                    .into_iter()
                    .map(|(title, blurb)| {
                        view! {
                            <section class="dashboard-card">
                                <h3>{title}</h3>
                                <p>{blurb}</p>
                            </section>
                        }
                    })
                    .collect::<Vec<_>>()}
            </div>
        </div>
    }
}

/// Farmer home at `/farmer`.
#[component]
pub fn FarmerDashboard() -> impl IntoView {
    view! { <RequireRole role=Role::Farmer>{dashboard_body(Role::Farmer)}</RequireRole> }
}

/// Supplier home at `/supplier`.
#[component]
pub fn SupplierDashboard() -> impl IntoView {
    view! { <RequireRole role=Role::Supplier>{dashboard_body(Role::Supplier)}</RequireRole> }
}

/// Consumer home at `/consumer`.
#[component]
pub fn ConsumerDashboard() -> impl IntoView {
    view! { <RequireRole role=Role::Consumer>{dashboard_body(Role::Consumer)}</RequireRole> }
}
