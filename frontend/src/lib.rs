//! The browser client for the expense tracker.
//!
//! A single-page Yew app. The root [App] component owns all of the state —
//! the in-memory expense list is the single source of truth for rendering —
//! and passes it down to the form, list and summary components explicitly.
//! Mutations call the REST API, then refetch and fully re-render.

use std::rc::Rc;

use gloo_events::EventListener;
use gloo_timers::callback::Timeout;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::{
    function_component, html, use_effect_with, use_mut_ref, use_reducer, use_state, Callback,
    Html, Reducible, TargetCast, UseStateHandle,
};

use common::{CategorySummary, DatabaseID, Expense, ExpenseDraft};

pub mod api;
mod form;
mod list;
mod summary;

use api::{ApiError, ListFilter};
use form::ExpenseForm;
use list::ExpenseList;
use summary::SummaryPanel;

/// Viewports narrower than this render the card layout instead of the
/// table.
const NARROW_BREAKPOINT_PX: f64 = 640.0;

/// How long a notice stays on screen before it expires on its own.
const NOTICE_LIFETIME_MS: u32 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq)]
enum NoticeKind {
    Success,
    Error,
}

/// A dismissible, auto-expiring message shown at the top of the page.
#[derive(Debug, Clone, PartialEq)]
struct Notice {
    id: usize,
    kind: NoticeKind,
    text: String,
}

#[derive(Default, PartialEq)]
struct Notices {
    items: Vec<Notice>,
}

enum NoticesAction {
    Push(Notice),
    Dismiss(usize),
}

impl Reducible for Notices {
    type Action = NoticesAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let items = match action {
            NoticesAction::Push(notice) => {
                let mut items = self.items.clone();
                items.push(notice);
                items
            }
            NoticesAction::Dismiss(id) => self
                .items
                .iter()
                .filter(|notice| notice.id != id)
                .cloned()
                .collect(),
        };

        Rc::new(Self { items })
    }
}

fn viewport_is_narrow() -> bool {
    let width = web_sys::window()
        .and_then(|window| window.inner_width().ok())
        .and_then(|width| width.as_f64())
        .unwrap_or(NARROW_BREAKPOINT_PX);

    width < NARROW_BREAKPOINT_PX
}

/// Refetch the expense list and the summary, replacing the client state.
fn refresh(
    filter: ListFilter,
    expenses: UseStateHandle<Vec<Expense>>,
    summary: UseStateHandle<Vec<CategorySummary>>,
    on_error: Callback<ApiError>,
) {
    spawn_local(async move {
        match api::list_expenses(&filter).await {
            Ok(data) => expenses.set(data),
            Err(error) => on_error.emit(error),
        }

        match api::get_summary().await {
            Ok(data) => summary.set(data),
            Err(error) => on_error.emit(error),
        }
    });
}

/// The root component.
#[function_component]
pub fn App() -> Html {
    let expenses = use_state(Vec::<Expense>::new);
    let categories = use_state(Vec::<String>::new);
    let summary = use_state(Vec::<CategorySummary>::new);
    let editing = use_state(|| Option::<Expense>::None);
    let filter = use_state(ListFilter::default);
    let narrow = use_state(viewport_is_narrow);

    let min_amount_text = use_state(String::new);
    let max_amount_text = use_state(String::new);

    let notices = use_reducer(Notices::default);
    let notice_counter = use_mut_ref(|| 0_usize);

    let push_notice = {
        let dispatcher = notices.dispatcher();
        let counter = notice_counter.clone();

        Callback::from(move |(kind, text): (NoticeKind, String)| {
            let id = {
                let mut counter = counter.borrow_mut();
                *counter += 1;
                *counter
            };

            dispatcher.dispatch(NoticesAction::Push(Notice { id, kind, text }));

            let dispatcher = dispatcher.clone();
            Timeout::new(NOTICE_LIFETIME_MS, move || {
                dispatcher.dispatch(NoticesAction::Dismiss(id));
            })
            .forget();
        })
    };

    let push_api_error = {
        let push_notice = push_notice.clone();
        Callback::from(move |error: ApiError| {
            push_notice.emit((NoticeKind::Error, error.message()));
        })
    };

    // Load the category list once.
    {
        let categories = categories.clone();
        let push_api_error = push_api_error.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                match api::get_categories().await {
                    Ok(data) => categories.set(data),
                    Err(error) => push_api_error.emit(error),
                }
            });
        });
    }

    // Load the list and summary on startup and whenever the filter changes.
    {
        let expenses = expenses.clone();
        let summary = summary.clone();
        let push_api_error = push_api_error.clone();

        use_effect_with((*filter).clone(), move |filter| {
            refresh(filter.clone(), expenses, summary, push_api_error);
        });
    }

    // Re-evaluate the layout choice on viewport resize.
    {
        let narrow = narrow.clone();

        use_effect_with((), move |_| {
            let window = web_sys::window().expect("no window");
            let listener = EventListener::new(&window, "resize", move |_| {
                narrow.set(viewport_is_narrow());
            });

            move || drop(listener)
        });
    }

    let on_submit = {
        let editing = editing.clone();
        let expenses = expenses.clone();
        let summary = summary.clone();
        let filter = filter.clone();
        let push_notice = push_notice.clone();
        let push_api_error = push_api_error.clone();

        Callback::from(move |draft: ExpenseDraft| {
            let editing = editing.clone();
            let expenses = expenses.clone();
            let summary = summary.clone();
            let filter_value = (*filter).clone();
            let push_notice = push_notice.clone();
            let push_api_error = push_api_error.clone();

            spawn_local(async move {
                let result = match &*editing {
                    Some(expense) => api::update_expense(expense.id, &draft)
                        .await
                        .map(|_| "Expense updated"),
                    None => api::create_expense(&draft).await.map(|_| "Expense added"),
                };

                match result {
                    Ok(text) => {
                        push_notice.emit((NoticeKind::Success, text.to_string()));
                        editing.set(None);
                        refresh(filter_value, expenses, summary, push_api_error);
                    }
                    Err(error) => push_api_error.emit(error),
                }
            });
        })
    };

    let on_delete = {
        let expenses = expenses.clone();
        let summary = summary.clone();
        let filter = filter.clone();
        let push_notice = push_notice.clone();
        let push_api_error = push_api_error.clone();

        Callback::from(move |id: DatabaseID| {
            let confirmed = web_sys::window()
                .map(|window| {
                    window
                        .confirm_with_message("Delete this expense?")
                        .unwrap_or(false)
                })
                .unwrap_or(false);

            if !confirmed {
                return;
            }

            let expenses = expenses.clone();
            let summary = summary.clone();
            let filter_value = (*filter).clone();
            let push_notice = push_notice.clone();
            let push_api_error = push_api_error.clone();

            spawn_local(async move {
                match api::delete_expense(id).await {
                    Ok(_) => {
                        push_notice.emit((NoticeKind::Success, "Expense deleted".to_string()));
                        refresh(filter_value, expenses, summary, push_api_error);
                    }
                    Err(error) => push_api_error.emit(error),
                }
            });
        })
    };

    let on_edit = {
        let editing = editing.clone();
        Callback::from(move |expense: Expense| editing.set(Some(expense)))
    };

    let on_cancel_edit = {
        let editing = editing.clone();
        Callback::from(move |_| editing.set(None))
    };

    let on_filter_category = {
        let filter = filter.clone();
        Callback::from(move |event: yew::events::Event| {
            let select: web_sys::HtmlSelectElement = event.target_unchecked_into();
            let value = select.value();

            filter.set(ListFilter {
                category: (!value.is_empty()).then_some(value),
                ..(*filter).clone()
            });
        })
    };

    let on_apply_amount_filter = {
        let filter = filter.clone();
        let min_amount_text = min_amount_text.clone();
        let max_amount_text = max_amount_text.clone();

        Callback::from(move |_| {
            filter.set(ListFilter {
                min_amount: min_amount_text.trim().parse().ok(),
                max_amount: max_amount_text.trim().parse().ok(),
                ..(*filter).clone()
            });
        })
    };

    let on_clear_filter = {
        let filter = filter.clone();
        let min_amount_text = min_amount_text.clone();
        let max_amount_text = max_amount_text.clone();

        Callback::from(move |_| {
            filter.set(ListFilter::default());
            min_amount_text.set(String::new());
            max_amount_text.set(String::new());
        })
    };

    let notice_items: Html = notices
        .items
        .iter()
        .map(|notice| {
            let class = match notice.kind {
                NoticeKind::Success => "notice notice-success",
                NoticeKind::Error => "notice notice-error",
            };

            let dismiss = {
                let dispatcher = notices.dispatcher();
                let id = notice.id;
                Callback::from(move |_| dispatcher.dispatch(NoticesAction::Dismiss(id)))
            };

            html! {
                <div class={class} key={notice.id}>
                    <span>{&notice.text}</span>
                    <button type="button" class="notice-dismiss" onclick={dismiss}>{"×"}</button>
                </div>
            }
        })
        .collect();

    html! {
        <div class="app">
            <h1>{"Expense Tracker"}</h1>

            <div class="notices">{notice_items}</div>

            <div class="layout">
                <aside>
                    <ExpenseForm
                        categories={(*categories).clone()}
                        editing={(*editing).clone()}
                        on_submit={on_submit}
                        on_cancel_edit={on_cancel_edit}
                    />
                    <SummaryPanel summary={(*summary).clone()} />
                </aside>

                <section>
                    <div class="filter-bar">
                        <select onchange={on_filter_category}>
                            <option value="" selected={filter.category.is_none()}>
                                {"All categories"}
                            </option>
                            { for categories.iter().map(|name| html! {
                                <option
                                    value={name.clone()}
                                    selected={filter.category.as_deref() == Some(name)}
                                >
                                    {name}
                                </option>
                            }) }
                        </select>

                        <input
                            type="text"
                            inputmode="decimal"
                            placeholder="Min amount"
                            value={(*min_amount_text).clone()}
                            oninput={text_setter(min_amount_text.clone())}
                        />
                        <input
                            type="text"
                            inputmode="decimal"
                            placeholder="Max amount"
                            value={(*max_amount_text).clone()}
                            oninput={text_setter(max_amount_text.clone())}
                        />
                        <button type="button" onclick={on_apply_amount_filter}>{"Apply"}</button>
                        <button type="button" onclick={on_clear_filter}>{"Clear"}</button>
                    </div>

                    <ExpenseList
                        expenses={(*expenses).clone()}
                        narrow={*narrow}
                        on_edit={on_edit}
                        on_delete={on_delete}
                    />
                </section>
            </div>
        </div>
    }
}

fn text_setter(state: UseStateHandle<String>) -> Callback<yew::events::InputEvent> {
    Callback::from(move |event: yew::events::InputEvent| {
        let input: HtmlInputElement = event.target_unchecked_into();
        state.set(input.value());
    })
}
