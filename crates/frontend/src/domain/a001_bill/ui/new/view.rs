use super::view_model::{FileSelection, NewBillForm, NewBillViewModel};
use crate::domain::a001_bill::store::{BillStore, ReceiptFile};
use crate::routes::paths::Navigate;
use leptos::prelude::*;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

const EXPENSE_TYPES: [&str; 7] = [
    "Transports",
    "Restaurants et bars",
    "Hôtel et logement",
    "Services en ligne",
    "IT et électronique",
    "Equipement et matériel",
    "Fournitures de bureau",
];

/// Read the picked file into memory
async fn read_receipt(file: web_sys::File) -> Result<ReceiptFile, String> {
    let array_buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("Failed to read file: {:?}", e))?;
    let uint8_array = js_sys::Uint8Array::new(&array_buffer);
    let mut bytes = vec![0; uint8_array.length() as usize];
    uint8_array.copy_to(&mut bytes);
    Ok(ReceiptFile {
        name: file.name(),
        content_type: file.type_(),
        bytes,
    })
}

#[component]
pub fn NewBill(store: Rc<dyn BillStore>, on_navigate: Navigate, email: String) -> impl IntoView {
    let vm = StoredValue::new_local(Rc::new(NewBillViewModel::new(
        Some(store),
        on_navigate,
        email,
    )));

    let expense_type = RwSignal::new(EXPENSE_TYPES[0].to_string());
    let name = RwSignal::new(String::new());
    let date = RwSignal::new(String::new());
    let amount = RwSignal::new(String::new());
    let vat = RwSignal::new(String::new());
    let pct = RwSignal::new(String::new());
    let commentary = RwSignal::new(String::new());
    let has_receipt = RwSignal::new(false);
    let uploading = RwSignal::new(false);
    let missing = RwSignal::new(Vec::<&'static str>::new());
    let submitting = RwSignal::new(false);

    let handle_file_select = move |ev: web_sys::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };

        let model = vm.get_value();
        // checked on the name alone so a rejected file is never read
        if model.reject_file_name(&file.name()) {
            input.set_value("");
            if let Some(message) = model.state().validation_message {
                let _ = window().alert_with_message(message);
            }
            return;
        }

        uploading.set(true);
        leptos::task::spawn_local(async move {
            let receipt = match read_receipt(file).await {
                Ok(receipt) => receipt,
                Err(e) => {
                    log::error!("{}", e);
                    input.set_value("");
                    uploading.set(false);
                    return;
                }
            };
            match model.handle_change_file(receipt).await {
                FileSelection::Rejected => {
                    input.set_value("");
                }
                FileSelection::UploadFailed(e) => {
                    log::warn!("Receipt kept local only: {}", e);
                }
                FileSelection::Uploaded(_) | FileSelection::NotUploaded => {}
            }
            has_receipt.set(model.has_receipt());
            uploading.set(false);
        });
    };

    let handle_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        let form = NewBillForm {
            expense_type: expense_type.get_untracked(),
            name: name.get_untracked(),
            date: date.get_untracked(),
            amount: amount.get_untracked(),
            vat: vat.get_untracked(),
            pct: pct.get_untracked(),
            commentary: commentary.get_untracked(),
        };
        let model = vm.get_value();
        let still_missing = form.missing_required(model.has_receipt());
        if !still_missing.is_empty() {
            missing.set(still_missing);
            return;
        }
        missing.set(Vec::new());
        submitting.set(true);
        leptos::task::spawn_local(async move {
            model.handle_submit(&form).await;
            submitting.set(false);
        });
    };

    view! {
        <div class="page new-bill-page">
            <div class="header">
                <h1 class="header__title">{"Envoyer une note de frais"}</h1>
            </div>

            {move || {
                let labels = missing.get();
                (!labels.is_empty()).then(|| view! {
                    <div class="warning-box" data-testid="missing-fields">
                        <span class="warning-box__text">
                            {format!("Champs requis : {}", labels.join(", "))}
                        </span>
                    </div>
                })
            }}

            <form class="form new-bill-form" data-testid="form-new-bill" on:submit=handle_submit>
                <div class="form__row">
                    <div class="form__column">
                        <div class="form__group">
                            <label class="form__label" for="expense-type">{"Type de dépense"}</label>
                            <select
                                id="expense-type"
                                class="form__select"
                                data-testid="expense-type"
                                required
                                prop:value=move || expense_type.get()
                                on:change=move |ev| expense_type.set(event_target_value(&ev))
                            >
                                {EXPENSE_TYPES
                                    .iter()
                                    .map(|t| view! { <option value=*t>{*t}</option> })
                                    .collect_view()}
                            </select>
                        </div>
                        <div class="form__group">
                            <label class="form__label" for="expense-name">{"Nom de la dépense"}</label>
                            <input
                                id="expense-name"
                                type="text"
                                class="form__input"
                                data-testid="expense-name"
                                placeholder="Vol Paris Londres"
                                prop:value=move || name.get()
                                on:input=move |ev| name.set(event_target_value(&ev))
                            />
                        </div>
                        <div class="form__group">
                            <label class="form__label" for="datepicker">{"Date"}</label>
                            <input
                                id="datepicker"
                                type="date"
                                class="form__input"
                                data-testid="datepicker"
                                required
                                prop:value=move || date.get()
                                on:input=move |ev| date.set(event_target_value(&ev))
                            />
                        </div>
                        <div class="form__group">
                            <label class="form__label" for="amount">{"Montant TTC"}</label>
                            <input
                                id="amount"
                                type="number"
                                class="form__input"
                                data-testid="amount"
                                placeholder="348"
                                required
                                prop:value=move || amount.get()
                                on:input=move |ev| amount.set(event_target_value(&ev))
                            />
                        </div>
                        <div class="form__group form__group--inline">
                            <label class="form__label" for="vat">{"TVA"}</label>
                            <input
                                id="vat"
                                type="number"
                                class="form__input"
                                data-testid="vat"
                                placeholder="70"
                                prop:value=move || vat.get()
                                on:input=move |ev| vat.set(event_target_value(&ev))
                            />
                            <input
                                id="pct"
                                type="number"
                                class="form__input"
                                data-testid="pct"
                                placeholder="20"
                                required
                                prop:value=move || pct.get()
                                on:input=move |ev| pct.set(event_target_value(&ev))
                            />
                            <span>{"%"}</span>
                        </div>
                    </div>
                    <div class="form__column">
                        <div class="form__group">
                            <label class="form__label" for="commentary">{"Commentaire"}</label>
                            <textarea
                                id="commentary"
                                class="form__textarea"
                                data-testid="commentary"
                                rows="3"
                                prop:value=move || commentary.get()
                                on:input=move |ev| commentary.set(event_target_value(&ev))
                            ></textarea>
                        </div>
                        <div class="form__group">
                            <label class="form__label" for="file">{"Justificatif"}</label>
                            <input
                                id="file"
                                type="file"
                                class="form__input"
                                data-testid="file"
                                accept=".png,.jpg,.jpeg"
                                required
                                on:change=handle_file_select
                            />
                            <Show when=move || uploading.get()>
                                <span class="form__hint">{"Envoi du justificatif..."}</span>
                            </Show>
                            <Show when=move || has_receipt.get()>
                                <span class="form__hint" data-testid="receipt-ready">
                                    {move || vm.get_value().state().file_name.unwrap_or_default()}
                                </span>
                            </Show>
                        </div>
                    </div>
                </div>
                <div class="form__actions">
                    <button
                        type="submit"
                        id="btn-send-bill"
                        class="button button--primary"
                        disabled=move || submitting.get() || uploading.get()
                    >
                        {"Envoyer"}
                    </button>
                </div>
            </form>
        </div>
    }
}
