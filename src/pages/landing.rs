//! Public landing page with the marketing pitch and auth entry points.

use leptos::prelude::*;

#[component]
pub fn LandingPage() -> impl IntoView {
    view! {
        <div class="landing-page">
            <header class="landing-page__hero">
                <h1>"AgriLink"</h1>
                <p class="landing-page__tagline">
                    "One marketplace connecting farmers, suppliers, and consumers."
                </p>
                <div class="landing-page__actions">
                    <a href="/login" class="btn btn--primary">
                        "Sign In"
                    </a>
                    <a href="/register" class="btn">
                        "Create Account"
                    </a>
                </div>
            </header>

            <div class="landing-page__roles">
                <section class="role-card">
                    <h2>"Farmers"</h2>
                    <p>"List produce, manage incoming orders, and rent out idle equipment."</p>
                </section>
                <section class="role-card">
                    <h2>"Suppliers"</h2>
                    <p>"Publish seed, feed, and equipment catalogs and track wholesale orders."</p>
                </section>
                <section class="role-card">
                    <h2>"Consumers"</h2>
                    <p>"Buy fresh produce directly from nearby farms."</p>
                </section>
            </div>
        </div>
    }
}
