//! The expense listing, rendered as a table on wide viewports and as a
//! stack of cards on narrow ones. The whole list re-renders on every state
//! change; there is no incremental diffing beyond the virtual DOM.

use common::{DatabaseID, Expense};
use yew::{function_component, html, Callback, Html, Properties};

#[derive(Properties, PartialEq)]
pub struct ExpenseListProps {
    pub expenses: Vec<Expense>,
    /// Whether the viewport is below the card-layout breakpoint.
    pub narrow: bool,
    pub on_edit: Callback<Expense>,
    pub on_delete: Callback<DatabaseID>,
}

#[function_component]
pub fn ExpenseList(props: &ExpenseListProps) -> Html {
    if props.expenses.is_empty() {
        return html!(<p class="empty-list">{"No expenses yet."}</p>);
    }

    if props.narrow {
        render_cards(props)
    } else {
        render_table(props)
    }
}

fn render_table(props: &ExpenseListProps) -> Html {
    html! {
        <table class="expense-table">
            <thead>
                <tr>
                    <th>{"Date"}</th>
                    <th>{"Amount"}</th>
                    <th>{"Category"}</th>
                    <th>{"Description"}</th>
                    <th></th>
                </tr>
            </thead>
            <tbody>
                { for props.expenses.iter().map(|expense| {
                    let actions = row_actions(expense, props);
                    html! {
                        <tr key={expense.id}>
                            <td>{expense.date.format("%Y-%m-%d").to_string()}</td>
                            <td>{format_amount(expense.amount)}</td>
                            <td>{&expense.category}</td>
                            <td>{expense.description.clone().unwrap_or_default()}</td>
                            <td>{actions}</td>
                        </tr>
                    }
                }) }
            </tbody>
        </table>
    }
}

fn render_cards(props: &ExpenseListProps) -> Html {
    html! {
        <div class="expense-cards">
            { for props.expenses.iter().map(|expense| {
                let actions = row_actions(expense, props);
                html! {
                    <div class="expense-card" key={expense.id}>
                        <div class="card-header">
                            <span class="card-amount">{format_amount(expense.amount)}</span>
                            <span class="card-category">{&expense.category}</span>
                        </div>
                        <div class="card-date">{expense.date.format("%Y-%m-%d").to_string()}</div>
                        if let Some(description) = &expense.description {
                            <div class="card-description">{description}</div>
                        }
                        {actions}
                    </div>
                }
            }) }
        </div>
    }
}

fn row_actions(expense: &Expense, props: &ExpenseListProps) -> Html {
    let on_edit = {
        let on_edit = props.on_edit.clone();
        let expense = expense.clone();
        Callback::from(move |_| on_edit.emit(expense.clone()))
    };

    let on_delete = {
        let on_delete = props.on_delete.clone();
        let id = expense.id;
        Callback::from(move |_| on_delete.emit(id))
    };

    html! {
        <span class="row-actions">
            <button type="button" onclick={on_edit}>{"Edit"}</button>
            <button type="button" class="danger" onclick={on_delete}>{"Delete"}</button>
        </span>
    }
}

fn format_amount(amount: f64) -> String {
    format!("${amount:.2}")
}
