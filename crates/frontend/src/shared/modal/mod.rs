use leptos::ev;
use leptos::prelude::*;
use web_sys::KeyboardEvent;

/// Widest the receipt modal gets on large screens
const MODAL_MAX_WIDTH: f64 = 800.0;

/// Receipt image to show in the proof modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptPreview {
    pub url: String,
    pub width: u32,
}

impl ReceiptPreview {
    /// Image width is `floor(modal_width * ratio)`
    pub fn new(url: impl Into<String>, modal_width: f64, ratio: f64) -> Self {
        Self {
            url: url.into(),
            width: (modal_width * ratio).floor() as u32,
        }
    }
}

/// Current modal width: the viewport, capped at the desktop modal size
pub fn modal_width() -> f64 {
    web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|v| v.as_f64())
        .map(|w| w.min(MODAL_MAX_WIDTH))
        .unwrap_or(MODAL_MAX_WIDTH)
}

/// Keys that dismiss the receipt modal
pub fn closes_modal(key: &str) -> bool {
    matches!(key, "Escape" | "Esc")
}

#[component]
pub fn ReceiptModal(
    /// DOM id of the modal
    id: &'static str,
    preview: ReceiptPreview,
    on_close: Callback<()>,
) -> impl IntoView {
    // Escape closes; the listener lives exactly as long as the modal
    let keydown = window_event_listener(ev::keydown, move |event: KeyboardEvent| {
        if closes_modal(&event.key()) {
            on_close.run(());
        }
    });
    on_cleanup(move || keydown.remove());

    let stop_propagation = move |ev: ev::MouseEvent| {
        ev.stop_propagation();
    };

    view! {
        <div class="modal-overlay" on:click=move |_| on_close.run(())>
            <div class="modal" id=id on:click=stop_propagation>
                <div class="modal-header">
                    <h2 class="modal-title">"Justificatif"</h2>
                    <button class="button button--icon modal__close" on:click=move |_| on_close.run(())>
                        "×"
                    </button>
                </div>
                <div class="modal-body">
                    <div style="text-align: center;" class="bill-proof-container">
                        <img width=preview.width.to_string() src=preview.url alt="Bill" />
                    </div>
                </div>
            </div>
        </div>
    }
}
