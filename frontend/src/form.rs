//! The expense entry form.
//!
//! Runs the shared sanitize/validate pipeline on submit, so nothing leaves
//! the browser that the server would reject for a rule the client already
//! knows about. The same component serves both creation and editing: when
//! an expense is being edited its fields pre-fill the inputs and submit
//! issues an update instead of a create.

use chrono::Local;
use common::{sanitize, validate, Expense, ExpenseDraft, FieldError, RawAmount};
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::{
    function_component, html, use_effect_with, use_state, Callback, Html, Properties, SubmitEvent,
    TargetCast,
};

#[derive(Properties, PartialEq)]
pub struct ExpenseFormProps {
    pub categories: Vec<String>,
    /// The expense being edited, or `None` when the form creates records.
    pub editing: Option<Expense>,
    pub on_submit: Callback<ExpenseDraft>,
    pub on_cancel_edit: Callback<()>,
}

#[function_component]
pub fn ExpenseForm(props: &ExpenseFormProps) -> Html {
    let date = use_state(String::new);
    let amount = use_state(String::new);
    let category = use_state(String::new);
    let description = use_state(String::new);
    let errors = use_state(Vec::<FieldError>::new);

    // Pre-fill or clear the inputs whenever the edited expense changes.
    {
        let date = date.clone();
        let amount = amount.clone();
        let category = category.clone();
        let description = description.clone();
        let errors = errors.clone();

        use_effect_with(props.editing.clone(), move |editing| {
            match editing {
                Some(expense) => {
                    date.set(expense.date.format("%Y-%m-%d").to_string());
                    amount.set(expense.amount.to_string());
                    category.set(expense.category.clone());
                    description.set(expense.description.clone().unwrap_or_default());
                }
                None => {
                    date.set(String::new());
                    amount.set(String::new());
                    category.set(String::new());
                    description.set(String::new());
                }
            }
            errors.set(Vec::new());
        });
    }

    let onsubmit = {
        let date = date.clone();
        let amount = amount.clone();
        let category = category.clone();
        let description = description.clone();
        let errors = errors.clone();
        let on_submit = props.on_submit.clone();

        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();

            let draft = ExpenseDraft {
                date: Some((*date).clone()),
                amount: Some(RawAmount::Text((*amount).clone())),
                category: Some((*category).clone()),
                description: Some(Some((*description).clone())),
            };

            let today = Local::now().date_naive();
            let outcome = validate(&sanitize(&draft), today);

            if outcome.is_valid {
                errors.set(Vec::new());
                on_submit.emit(draft);
                date.set(String::new());
                amount.set(String::new());
                category.set(String::new());
                description.set(String::new());
            } else {
                errors.set(outcome.errors);
            }
        })
    };

    let field_error = |field: &str| -> Html {
        match errors.iter().find(|error| error.field == field) {
            Some(error) => html!(<p class="field-error">{&error.message}</p>),
            None => html!(),
        }
    };

    let is_editing = props.editing.is_some();
    let on_cancel = {
        let on_cancel_edit = props.on_cancel_edit.clone();
        Callback::from(move |_| on_cancel_edit.emit(()))
    };

    html! {
        <form class="expense-form" onsubmit={onsubmit}>
            <h2>{if is_editing { "Edit expense" } else { "Add expense" }}</h2>

            <label for="date">{"Date"}</label>
            <input
                id="date"
                type="date"
                value={(*date).clone()}
                oninput={input_setter(date.clone())}
            />
            {field_error("date")}

            <label for="amount">{"Amount"}</label>
            <input
                id="amount"
                type="text"
                inputmode="decimal"
                placeholder="0.00"
                value={(*amount).clone()}
                oninput={input_setter(amount.clone())}
            />
            {field_error("amount")}

            <label for="category">{"Category"}</label>
            <select id="category" onchange={select_setter(category.clone())}>
                <option value="" selected={category.is_empty()}>{"Select a category"}</option>
                { for props.categories.iter().map(|name| html! {
                    <option value={name.clone()} selected={*category == *name}>{name}</option>
                }) }
            </select>
            {field_error("category")}

            <label for="description">{"Description (optional)"}</label>
            <textarea
                id="description"
                maxlength="255"
                value={(*description).clone()}
                oninput={textarea_setter(description.clone())}
            />
            {field_error("description")}

            <button type="submit">{if is_editing { "Save changes" } else { "Add expense" }}</button>
            if is_editing {
                <button type="button" onclick={on_cancel}>{"Cancel"}</button>
            }
        </form>
    }
}

fn input_setter(state: yew::UseStateHandle<String>) -> Callback<yew::events::InputEvent> {
    Callback::from(move |event: yew::events::InputEvent| {
        let input: HtmlInputElement = event.target_unchecked_into();
        state.set(input.value());
    })
}

fn textarea_setter(state: yew::UseStateHandle<String>) -> Callback<yew::events::InputEvent> {
    Callback::from(move |event: yew::events::InputEvent| {
        let textarea: HtmlTextAreaElement = event.target_unchecked_into();
        state.set(textarea.value());
    })
}

fn select_setter(state: yew::UseStateHandle<String>) -> Callback<yew::events::Event> {
    Callback::from(move |event: yew::events::Event| {
        let select: HtmlSelectElement = event.target_unchecked_into();
        state.set(select.value());
    })
}
