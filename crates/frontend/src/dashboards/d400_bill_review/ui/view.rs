use crate::dashboards::d400_bill_review::dropdown::StatusBucket;
use crate::dashboards::d400_bill_review::filter::ExcludedAuthors;
use crate::dashboards::d400_bill_review::render::{BucketView, DetailPanel, ReviewForm};
use crate::dashboards::d400_bill_review::view_model::BillReviewViewModel;
use crate::domain::a001_bill::store::BillStore;
use crate::routes::paths::Navigate;
use crate::shared::icons::icon;
use crate::shared::modal::{modal_width, ReceiptModal, ReceiptPreview};
use contracts::domain::a001_bill::aggregate::Bill;
use leptos::prelude::*;
use std::rc::Rc;

#[component]
pub fn BillReviewDashboard(
    store: Rc<dyn BillStore>,
    on_navigate: Navigate,
    excluded: ExcludedAuthors,
) -> impl IntoView {
    let vm = StoredValue::new_local(Rc::new(BillReviewViewModel::new(
        Some(store),
        on_navigate,
        excluded,
    )));
    let bills = RwSignal::new(Vec::<Bill>::new());
    let error = RwSignal::new(None::<String>);
    // bumped after every dropdown/selection change so the view re-renders
    let revision = RwSignal::new(0u32);
    let preview = RwSignal::new(None::<ReceiptPreview>);
    let comment = RwSignal::new(String::new());
    let submitting = RwSignal::new(false);

    let loader = vm.get_value();
    leptos::task::spawn_local(async move {
        match loader.get_bills_all_users().await {
            Ok(list) => bills.set(list.unwrap_or_default()),
            Err(e) => {
                log::error!("Failed to load bills: {}", e);
                error.set(Some(e.to_string()));
            }
        }
    });

    let dashboard = Memo::new(move |_| {
        revision.track();
        bills.with(|list| vm.get_value().render(list))
    });

    let show_tickets = move |bucket: StatusBucket| {
        vm.get_value().handle_show_tickets(bucket);
        revision.update(|r| *r += 1);
    };

    let edit_ticket = move |bill_id: String, bucket: StatusBucket| {
        let bill = bills.with_untracked(|list| list.iter().find(|b| b.id == bill_id).cloned());
        if let Some(bill) = bill {
            vm.get_value().handle_edit_ticket(&bill, bucket);
            comment.set(bill.comment_admin.clone().unwrap_or_default());
            revision.update(|r| *r += 1);
        }
    };

    let submit = move |bill: Bill, accept: bool| {
        if submitting.get_untracked() {
            return;
        }
        submitting.set(true);
        let model = vm.get_value();
        let text = comment.get_untracked();
        leptos::task::spawn_local(async move {
            let updated = if accept {
                model.handle_accept_submit(&bill, &text).await
            } else {
                model.handle_refuse_submit(&bill, &text).await
            };
            if let Some(updated) = updated {
                bills.update(|list| {
                    if let Some(slot) = list.iter_mut().find(|b| b.id == updated.id) {
                        *slot = updated;
                    }
                });
            }
            submitting.set(false);
        });
    };

    let render_bucket = move |view: BucketView| {
        let index = view.bucket.index();
        let bucket = view.bucket;
        view! {
            <div class="status-bills">
                <div
                    class="status-bills__header"
                    id=format!("arrow-icon{}", index)
                    data-testid=format!("arrow-icon{}", index)
                    on:click=move |_| show_tickets(bucket)
                >
                    <span class="status-bills__title">{view.title}</span>
                    <span class="status-bills__count">{format!("({})", view.count)}</span>
                    <span class="status-bills__arrow" style=format!("transform: {}", view.arrow_rotation)>
                        {icon("arrow")}
                    </span>
                </div>
                <div
                    class="status-bills-container"
                    id=format!("status-bills-container{}", index)
                    data-testid=format!("status-bills-container{}", index)
                >
                    {view.cards.into_iter().map(|card| {
                        let card_id = card.id.clone();
                        view! {
                            <div
                                class="bill-card"
                                class:bill-card--highlighted=card.highlighted
                                id=format!("open-bill{}", card.id)
                                data-testid=format!("open-bill{}", card.id)
                                on:click=move |_| edit_ticket(card_id.clone(), bucket)
                            >
                                <div class="bill-card__name-container">
                                    <span class="bill-card__author">
                                        {format!("{} {}", card.first_name, card.last_name)}
                                    </span>
                                    <span class="bill-card__amount">{card.amount}</span>
                                </div>
                                <div class="bill-card__name-container">
                                    <span>{card.name}</span>
                                </div>
                                <div class="bill-card__date-type-container">
                                    <span>{card.date}</span>
                                    <span>{card.expense_type}</span>
                                </div>
                            </div>
                        }
                    }).collect_view()}
                </div>
            </div>
        }
    };

    let render_form = move |form: ReviewForm| {
        let url = form.bill.file_url.clone().unwrap_or_default();
        let url_for_click = url.clone();
        let accept_bill = form.bill.clone();
        let refuse_bill = form.bill.clone();
        view! {
            <div class="dashboard-form" data-testid="dashboard-form">
                <div class="dashboard-form__row">
                    <div class="form__group">
                        <label class="form__label">{"Type de dépense"}</label>
                        <div class="input-readonly">{form.bill.expense_type.clone()}</div>
                    </div>
                    <div class="form__group">
                        <label class="form__label">{"Nom de la dépense"}</label>
                        <div class="input-readonly">{form.bill.name.clone()}</div>
                    </div>
                    <div class="form__group">
                        <label class="form__label">{"Date"}</label>
                        <div class="input-readonly">{form.date.clone()}</div>
                    </div>
                    <div class="form__group">
                        <label class="form__label">{"Montant TTC"}</label>
                        <div class="input-readonly">{format!("{} €", form.bill.amount)}</div>
                    </div>
                    <div class="form__group">
                        <label class="form__label">{"TVA"}</label>
                        <div class="input-readonly">
                            {format!("{} € ({} %)", form.bill.vat, form.bill.pct)}
                        </div>
                    </div>
                </div>
                <div class="dashboard-form__row">
                    <div class="form__group">
                        <label class="form__label">{"Commentaire"}</label>
                        <div class="textarea-readonly">{form.bill.commentary.clone()}</div>
                    </div>
                    <div class="form__group">
                        <label class="form__label">{"Justificatif"}</label>
                        <div class="input-readonly">
                            <span>{form.bill.file_name.clone().unwrap_or_default()}</span>
                            <span
                                class="icon-actions"
                                id="icon-eye-d"
                                data-testid="icon-eye-d"
                                data-bill-url=url
                                on:click=move |_| {
                                    let shown = vm
                                        .get_value()
                                        .handle_click_icon_eye(&url_for_click, modal_width());
                                    preview.set(Some(shown));
                                }
                            >
                                {icon("eye")}
                            </span>
                        </div>
                    </div>
                    <div class="form__group">
                        <label class="form__label">{"Statut"}</label>
                        <div class="input-readonly">{form.status_label}</div>
                    </div>
                </div>
                {if form.reviewable {
                    view! {
                        <div class="dashboard-form__row">
                            <div class="form__group">
                                <label class="form__label" for="commentary2">{"Ajouter un commentaire"}</label>
                                <textarea
                                    id="commentary2"
                                    class="form__textarea"
                                    data-testid="commentary2"
                                    rows="5"
                                    prop:value=move || comment.get()
                                    on:input=move |ev| comment.set(event_target_value(&ev))
                                ></textarea>
                            </div>
                            <div class="form__actions">
                                <button
                                    id="btn-accept-bill"
                                    class="button button--primary"
                                    data-testid="btn-accept-bill"
                                    disabled=move || submitting.get()
                                    on:click=move |_| submit(accept_bill.clone(), true)
                                >
                                    {"Accepter"}
                                </button>
                                <button
                                    id="btn-refuse-bill"
                                    class="button button--secondary"
                                    data-testid="btn-refuse-bill"
                                    disabled=move || submitting.get()
                                    on:click=move |_| submit(refuse_bill.clone(), false)
                                >
                                    {"Refuser"}
                                </button>
                            </div>
                        </div>
                    }.into_any()
                } else {
                    view! {
                        <div class="dashboard-form__row">
                            <div class="form__group">
                                <label class="form__label">{"Commentaire administration"}</label>
                                <div class="textarea-readonly">
                                    {form.bill.comment_admin.clone().unwrap_or_default()}
                                </div>
                            </div>
                        </div>
                    }.into_any()
                }}
            </div>
        }
    };

    view! {
        <div class="page dashboard-page">
            {move || error.get().map(|e| view! {
                <div class="warning-box" data-testid="error-message">
                    <span class="warning-box__text">{e}</span>
                </div>
            })}
            <div class="dashboard">
                <div class="dashboard__left">
                    <div class="dashboard__title">{"Validations"}</div>
                    {move || dashboard.get().buckets.into_iter().map(render_bucket).collect_view()}
                </div>
                <div class="dashboard__right">
                    {move || match dashboard.get().detail {
                        DetailPanel::Form(form) => render_form(form).into_any(),
                        DetailPanel::Placeholder => view! {
                            <div class="dashboard__placeholder" data-testid="big-billed-icon">
                                {icon("billed")}
                            </div>
                        }.into_any(),
                    }}
                </div>
            </div>

            {move || preview.get().map(|shown| view! {
                <ReceiptModal
                    id="modaleFileAdmin1"
                    preview=shown
                    on_close=Callback::new(move |_| preview.set(None))
                />
            })}
        </div>
    }
}
