use super::view_model::{BillRow, BillsListViewModel};
use crate::domain::a001_bill::store::BillStore;
use crate::routes::paths::Navigate;
use crate::shared::icons::icon;
use crate::shared::modal::{modal_width, ReceiptModal, ReceiptPreview};
use leptos::prelude::*;
use std::rc::Rc;

#[component]
pub fn BillsList(store: Rc<dyn BillStore>, on_navigate: Navigate) -> impl IntoView {
    let vm = StoredValue::new_local(Rc::new(BillsListViewModel::new(Some(store), on_navigate)));
    let rows = RwSignal::new(Vec::<BillRow>::new());
    let error = RwSignal::new(None::<String>);
    let loading = RwSignal::new(true);
    let preview = RwSignal::new(None::<ReceiptPreview>);

    let loader = vm.get_value();
    leptos::task::spawn_local(async move {
        match loader.get_bills().await {
            Ok(list) => rows.set(list.unwrap_or_default()),
            Err(e) => {
                log::error!("Failed to load bills: {}", e);
                error.set(Some(e.to_string()));
            }
        }
        loading.set(false);
    });

    view! {
        <div class="page bills-page">
            <div class="header">
                <h1 class="header__title">{"Mes notes de frais"}</h1>
                <div class="header__actions">
                    <button
                        class="button button--primary"
                        data-testid="btn-new-bill"
                        on:click=move |_| vm.get_value().handle_click_new_bill()
                    >
                        {"Nouvelle note de frais"}
                    </button>
                </div>
            </div>

            {move || error.get().map(|e| view! {
                <div class="warning-box" data-testid="error-message">
                    <span class="warning-box__text">{e}</span>
                </div>
            })}

            <Show when=move || loading.get()>
                <div class="loading" data-testid="loading">{"Chargement..."}</div>
            </Show>

            <div class="table">
                <table class="table__data table--striped">
                    <thead class="table__head">
                        <tr>
                            <th class="table__header-cell">{"Type"}</th>
                            <th class="table__header-cell">{"Nom"}</th>
                            <th class="table__header-cell">{"Date"}</th>
                            <th class="table__header-cell">{"Montant"}</th>
                            <th class="table__header-cell">{"Statut"}</th>
                            <th class="table__header-cell">{"Actions"}</th>
                        </tr>
                    </thead>
                    <tbody data-testid="tbody">
                        {move || rows.get().into_iter().map(|row| {
                            let url = row.bill.file_url.clone().unwrap_or_default();
                            let url_for_click = url.clone();
                            view! {
                                <tr class="table__row">
                                    <td class="table__cell">{row.bill.expense_type}</td>
                                    <td class="table__cell">{row.bill.name}</td>
                                    <td class="table__cell">{row.date}</td>
                                    <td class="table__cell">{format!("{} €", row.bill.amount)}</td>
                                    <td class="table__cell">{row.status}</td>
                                    <td class="table__cell">
                                        <div
                                            class="icon-actions"
                                            data-testid="icon-eye"
                                            data-bill-url=url
                                            on:click=move |_| {
                                                let shown = vm
                                                    .get_value()
                                                    .handle_click_icon_eye(&url_for_click, modal_width());
                                                preview.set(Some(shown));
                                            }
                                        >
                                            {icon("eye")}
                                        </div>
                                    </td>
                                </tr>
                            }
                        }).collect_view()}
                    </tbody>
                </table>
            </div>

            {move || preview.get().map(|shown| view! {
                <ReceiptModal
                    id="modaleFile"
                    preview=shown
                    on_close=Callback::new(move |_| preview.set(None))
                />
            })}
        </div>
    }
}
